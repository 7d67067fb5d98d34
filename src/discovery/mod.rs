//! Course discovery pipeline
//!
//! A request flows through three stages:
//! - candidate selection by rating, workload and requirement filters
//! - semantic retrieval of review chunks scoped to those candidates
//! - per-course aggregation, threshold gating and top-N ranking
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use coursescout::config::AppConfig;
//! use coursescout::database::Database;
//! use coursescout::discovery::DiscoveryService;
//! use coursescout::models::DiscoveryRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let database = Arc::new(Database::from_config(&config).await?);
//!     let embedder = coursescout::embeddings::provider_from_config(&config)?;
//!     let service = DiscoveryService::from_database(database, embedder, config.discovery.clone());
//!
//!     let response = service
//!         .discover(&DiscoveryRequest {
//!             query: Some("easy class that teaches PyTorch".to_string()),
//!             min_course_rating: Some(4.0),
//!             ..DiscoveryRequest::default()
//!         })
//!         .await?;
//!     println!("{} of {} candidates", response.courses.len(), response.total_candidates);
//!
//!     Ok(())
//! }
//! ```

use std::future::Future;
use std::time::Duration;

pub mod candidates;
pub mod request;
pub mod scorer;
pub mod service;
pub mod traits;

pub use candidates::CandidateSelector;
pub use request::ValidatedRequest;
pub use scorer::rank_courses;
pub use scorer::RelevanceScorer;
pub use service::DiscoveryService;
pub use traits::ChunkStore;
pub use traits::EmbeddingProvider;
pub use traits::FilterStore;
pub use traits::RequirementIndex;

use crate::errors::CourseScoutError;
use crate::errors::Result;

/// Bound a remote call. Expiry fails the call; nothing is retried.
pub(crate) async fn with_timeout<T, F>(
    operation: &'static str,
    limit: Duration,
    call: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(CourseScoutError::Timeout {
            operation,
            after_ms: limit.as_millis() as u64,
        }),
    }
}
