//! Embeddings generation module
//!
//! Query embeddings come from one of two providers:
//! - OpenAI (text-embedding-3-small, 1536 dimensions)
//! - Ollama (local models)
//!
//! # Examples
//!
//! ```rust,no_run
//! use coursescout::config::AppConfig;
//! use coursescout::discovery::EmbeddingProvider;
//! use coursescout::embeddings::EmbeddingClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let client = EmbeddingClient::from_app_config(&config)?;
//!
//!     let embedding = client.embed("easy class that teaches PyTorch").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

pub mod cache;
pub mod client;
pub mod text_preprocessing;

pub use cache::CachedEmbeddingProvider;
pub use client::EmbeddingClient;
pub use text_preprocessing::preprocess_text_for_embedding;

use crate::discovery::EmbeddingProvider;
use crate::errors::Result;

/// Default embedding dimension for `OpenAI` text-embedding-3-small
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Supported embedding providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    /// `OpenAI` embeddings API
    #[serde(rename = "openai")]
    OpenAI,
    /// Ollama local embeddings
    Ollama,
}

/// Build the configured provider, wrapped in the query cache when enabled
pub fn provider_from_config(
    config: &crate::config::AppConfig,
) -> Result<Arc<dyn EmbeddingProvider>> {
    let client: Arc<dyn EmbeddingProvider> = Arc::new(EmbeddingClient::from_app_config(config)?);

    if config.embeddings.enable_cache {
        tracing::info!(
            "Query embedding cache enabled (capacity {})",
            config.embeddings.cache_capacity
        );
        Ok(Arc::new(CachedEmbeddingProvider::new(
            client,
            config.embeddings.cache_capacity,
        )))
    } else {
        Ok(client)
    }
}
