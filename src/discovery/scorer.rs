//! Semantic relevance scoring of candidate courses

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::with_timeout;
use super::ChunkStore;
use super::EmbeddingProvider;
use crate::config::DiscoveryConfig;
use crate::errors::CourseScoutError;
use crate::errors::Result;
use crate::models::ChunkMatch;
use crate::models::CourseMetricRecord;
use crate::models::ScoredCourse;

/// Embeds the query, retrieves similar chunks scoped to the candidates and
/// ranks courses by the mean similarity of their best chunks.
pub struct RelevanceScorer {
    embedder: Arc<dyn EmbeddingProvider>,
    chunk_store: Arc<dyn ChunkStore>,
    config: Arc<DiscoveryConfig>,
}

impl RelevanceScorer {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        chunk_store: Arc<dyn ChunkStore>,
        config: Arc<DiscoveryConfig>,
    ) -> Self {
        Self {
            embedder,
            chunk_store,
            config,
        }
    }

    /// Score candidates against `query`.
    ///
    /// Makes exactly one embedding call and one vector search. Neither is
    /// retried; an embedding failure fails the request.
    pub async fn score(
        &self,
        query: &str,
        candidates: &[CourseMetricRecord],
    ) -> Result<Vec<ScoredCourse>> {
        let timeout = self.config.remote_call_timeout();

        let embedding = with_timeout("query embedding", timeout, self.embedder.embed(query))
            .await
            .map_err(|e| match e {
                CourseScoutError::Timeout { .. }
                | CourseScoutError::EmbeddingProvider(_)
                | CourseScoutError::InvalidRequest(_) => e,
                other => CourseScoutError::EmbeddingProvider(other.to_string()),
            })?;

        if embedding.len() != self.embedder.dimension() {
            return Err(CourseScoutError::EmbeddingProvider(format!(
                "query embedding has {} dimensions, expected {}",
                embedding.len(),
                self.embedder.dimension()
            )));
        }

        let course_ids: Vec<Uuid> = candidates.iter().map(|c| c.course_id).collect();
        let chunks = with_timeout(
            "chunk vector search",
            timeout,
            self.chunk_store.nearest(
                &embedding,
                &course_ids,
                self.config.chunk_similarity_floor,
                self.config.chunk_search_limit,
            ),
        )
        .await
        .map_err(CourseScoutError::into_retrieval)?;

        debug!(
            "Retrieved {} chunks above floor {}",
            chunks.len(),
            self.config.chunk_similarity_floor
        );

        let ranked = rank_courses(chunks, candidates, &self.config);
        debug!("{} courses cleared the aggregate floor", ranked.len());
        Ok(ranked)
    }
}

/// Aggregate chunk similarities into ranked course scores.
///
/// Per course, the best `snippets_per_course` chunks are averaged (over the
/// chunks that exist, not over K). Courses without chunks are absent rather
/// than scored zero. Courses below `course_score_floor` are dropped, the rest
/// are ordered by score descending, then course code, then course id, and cut
/// to `max_results`. Chunks for courses outside `candidates` are ignored.
pub fn rank_courses(
    chunks: Vec<ChunkMatch>,
    candidates: &[CourseMetricRecord],
    config: &DiscoveryConfig,
) -> Vec<ScoredCourse> {
    let codes: HashMap<Uuid, &str> = candidates
        .iter()
        .map(|c| (c.course_id, c.code.as_str()))
        .collect();

    let mut grouped: HashMap<Uuid, Vec<ChunkMatch>> = HashMap::new();
    for chunk in chunks {
        if codes.contains_key(&chunk.course_id) {
            grouped.entry(chunk.course_id).or_default().push(chunk);
        }
    }

    let mut scored: Vec<ScoredCourse> = grouped
        .into_iter()
        .map(|(course_id, mut course_chunks)| {
            course_chunks.sort_by(|a, b| {
                b.similarity
                    .total_cmp(&a.similarity)
                    .then_with(|| a.chunk_id.cmp(&b.chunk_id))
            });
            course_chunks.truncate(config.snippets_per_course);

            let sum: f64 = course_chunks.iter().map(|c| f64::from(c.similarity)).sum();
            let score = (sum / course_chunks.len() as f64) as f32;

            ScoredCourse {
                course_id,
                score,
                top_chunks: course_chunks,
            }
        })
        .filter(|course| course.score >= config.course_score_floor)
        .collect();

    scored.sort_by(|a, b| compare_ranked(a, b, &codes));
    scored.truncate(config.max_results);
    scored
}

fn compare_ranked(a: &ScoredCourse, b: &ScoredCourse, codes: &HashMap<Uuid, &str>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| codes.get(&a.course_id).cmp(&codes.get(&b.course_id)))
        .then_with(|| a.course_id.cmp(&b.course_id))
}
