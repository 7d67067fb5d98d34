//! Discovery orchestration: filter, then rank

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;
use tracing::info;
use uuid::Uuid;

use super::CandidateSelector;
use super::ChunkStore;
use super::EmbeddingProvider;
use super::FilterStore;
use super::RelevanceScorer;
use super::RequirementIndex;
use crate::config::DiscoveryConfig;
use crate::database::Database;
use crate::errors::Result;
use crate::models::CandidateFilters;
use crate::models::CourseMetricRecord;
use crate::models::CourseResult;
use crate::models::DiscoveryRequest;
use crate::models::DiscoveryResponse;

/// Sequences candidate selection and relevance scoring for one request.
///
/// Holds no per-request state; one instance serves concurrent requests.
pub struct DiscoveryService {
    selector: CandidateSelector,
    scorer: RelevanceScorer,
    config: Arc<DiscoveryConfig>,
}

impl DiscoveryService {
    pub fn new(
        filter_store: Arc<dyn FilterStore>,
        requirement_index: Arc<dyn RequirementIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
        chunk_store: Arc<dyn ChunkStore>,
        config: DiscoveryConfig,
    ) -> Self {
        let config = Arc::new(config);
        let selector = CandidateSelector::new(
            filter_store,
            requirement_index,
            config.max_candidates,
            config.remote_call_timeout(),
        );
        let scorer = RelevanceScorer::new(embedder, chunk_store, config.clone());

        Self {
            selector,
            scorer,
            config,
        }
    }

    /// Wire all three stores to one database
    pub fn from_database(
        database: Arc<Database>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: DiscoveryConfig,
    ) -> Self {
        Self::new(
            database.clone(),
            database.clone(),
            embedder,
            database,
            config,
        )
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Validate and run a discovery request
    pub async fn discover(&self, request: &DiscoveryRequest) -> Result<DiscoveryResponse> {
        let validated = request.validate(self.config.max_query_chars)?;
        self.discover_validated(validated.query.as_deref(), &validated.filters)
            .await
    }

    /// Run discovery on already-validated input
    #[tracing::instrument(skip(self, filters), fields(has_query = query.is_some()))]
    pub async fn discover_validated(
        &self,
        query: Option<&str>,
        filters: &CandidateFilters,
    ) -> Result<DiscoveryResponse> {
        let candidates = self.selector.select(filters).await?;
        let total_candidates = candidates.len();

        if candidates.is_empty() {
            debug!("No candidates; skipping semantic ranking");
            return Ok(DiscoveryResponse::empty());
        }

        let courses = match query.map(str::trim).filter(|q| !q.is_empty()) {
            None => self.rating_sorted_slice(candidates),
            Some(query) => self.ranked_by_relevance(query, &candidates).await?,
        };

        info!(
            "Discovery returned {} courses from {} candidates",
            courses.len(),
            total_candidates
        );

        Ok(DiscoveryResponse {
            courses,
            total_candidates,
        })
    }

    /// Query-less path: top slice by course rating, unrated courses last
    fn rating_sorted_slice(&self, mut candidates: Vec<CourseMetricRecord>) -> Vec<CourseResult> {
        candidates.sort_by(|a, b| {
            match (a.course_rating_avg, b.course_rating_avg) {
                (Some(x), Some(y)) => y.total_cmp(&x),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
            .then_with(|| a.code.cmp(&b.code))
        });

        candidates
            .iter()
            .take(self.config.no_query_result_limit)
            .map(CourseResult::from_record)
            .collect()
    }

    async fn ranked_by_relevance(
        &self,
        query: &str,
        candidates: &[CourseMetricRecord],
    ) -> Result<Vec<CourseResult>> {
        let scored = self.scorer.score(query, candidates).await?;

        let by_id: HashMap<Uuid, &CourseMetricRecord> =
            candidates.iter().map(|c| (c.course_id, c)).collect();

        Ok(scored
            .iter()
            .filter_map(|s| {
                by_id
                    .get(&s.course_id)
                    .map(|record| CourseResult::with_score(record, s))
            })
            .collect())
    }
}
