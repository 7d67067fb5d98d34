//! Seams between the discovery pipeline and the systems it reads from.
//!
//! `Database` implements the three store traits and `EmbeddingClient`
//! implements [`EmbeddingProvider`]. The pipeline only sees trait objects,
//! so tests can substitute in-memory fakes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::Result;
use crate::models::CandidateFilters;
use crate::models::ChunkMatch;
use crate::models::CourseMetricRecord;
use crate::models::RequirementLink;

/// Per-course aggregate metrics with range and set-membership queries
#[async_trait]
pub trait FilterStore: Send + Sync {
    /// Courses matching the rating bounds and workload buckets, at most `cap` rows.
    ///
    /// Requirement filters are ignored here.
    async fn query_candidates(
        &self,
        filters: &CandidateFilters,
        cap: usize,
    ) -> Result<Vec<CourseMetricRecord>>;
}

/// Course to distribution requirement links
#[async_trait]
pub trait RequirementIndex: Send + Sync {
    /// Links whose requirement is in `requirement_ids`, optionally restricted to `scope`
    async fn lookup(
        &self,
        requirement_ids: &[Uuid],
        scope: Option<&[Uuid]>,
    ) -> Result<Vec<RequirementLink>>;
}

/// Turns text into a fixed-length dense vector
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Length of every vector this provider returns
    fn dimension(&self) -> usize;
}

/// Embedded comment chunks searchable by vector similarity
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Chunks nearest to `embedding` among `course_ids`, with similarity of at
    /// least `similarity_floor`, ordered by similarity descending.
    async fn nearest(
        &self,
        embedding: &[f32],
        course_ids: &[Uuid],
        similarity_floor: f32,
        limit: usize,
    ) -> Result<Vec<ChunkMatch>>;
}
