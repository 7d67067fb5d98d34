//! Candidate selection by structured filters

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use tracing::warn;
use uuid::Uuid;

use super::with_timeout;
use super::FilterStore;
use super::RequirementIndex;
use crate::errors::Result;
use crate::models::CandidateFilters;
use crate::models::CourseMetricRecord;
use crate::models::RequirementLink;

/// Applies rating, workload and requirement filters to produce the eligible course set
pub struct CandidateSelector {
    filter_store: Arc<dyn FilterStore>,
    requirement_index: Arc<dyn RequirementIndex>,
    max_candidates: usize,
    call_timeout: Duration,
}

impl CandidateSelector {
    pub fn new(
        filter_store: Arc<dyn FilterStore>,
        requirement_index: Arc<dyn RequirementIndex>,
        max_candidates: usize,
        call_timeout: Duration,
    ) -> Self {
        Self {
            filter_store,
            requirement_index,
            max_candidates,
            call_timeout,
        }
    }

    /// Select candidate courses.
    ///
    /// A filter store failure fails the request. A requirement index failure
    /// only skips the requirement filter, since that filter can narrow the
    /// set but never change a record.
    pub async fn select(&self, filters: &CandidateFilters) -> Result<Vec<CourseMetricRecord>> {
        let candidates = with_timeout(
            "filter store query",
            self.call_timeout,
            self.filter_store.query_candidates(filters, self.max_candidates),
        )
        .await
        .map_err(crate::CourseScoutError::into_retrieval)?;

        debug!("Step 1: {} courses matched metric filters", candidates.len());

        if candidates.is_empty() || filters.requirement_ids.is_empty() {
            return Ok(candidates);
        }

        let scope: Vec<Uuid> = candidates.iter().map(|c| c.course_id).collect();
        let links = with_timeout(
            "requirement index lookup",
            self.call_timeout,
            self.requirement_index.lookup(&filters.requirement_ids, Some(&scope)),
        )
        .await;

        match links {
            Ok(links) => {
                let retained = retain_satisfying_all(candidates, &filters.requirement_ids, &links);
                debug!(
                    "Step 2: {} courses satisfy all {} requirements",
                    retained.len(),
                    filters.requirement_ids.len()
                );
                Ok(retained)
            }
            Err(e) => {
                warn!("Requirement index unavailable, skipping requirement filter: {}", e);
                Ok(candidates)
            }
        }
    }
}

/// Keep candidates linked to every requested requirement (AND semantics)
pub fn retain_satisfying_all(
    candidates: Vec<CourseMetricRecord>,
    requirement_ids: &[Uuid],
    links: &[RequirementLink],
) -> Vec<CourseMetricRecord> {
    let required: HashSet<Uuid> = requirement_ids.iter().copied().collect();

    let mut satisfied: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
    for link in links {
        if required.contains(&link.requirement_id) {
            satisfied
                .entry(link.course_id)
                .or_default()
                .insert(link.requirement_id);
        }
    }

    candidates
        .into_iter()
        .filter(|c| {
            satisfied
                .get(&c.course_id)
                .is_some_and(|reqs| reqs.len() == required.len())
        })
        .collect()
}
