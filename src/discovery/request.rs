//! Validation of inbound discovery requests.
//!
//! Runs before any store or provider call, so a rejected request has no
//! side effects.

use std::collections::HashSet;

use uuid::Uuid;

use crate::embeddings::preprocess_text_for_embedding;
use crate::errors::CourseScoutError;
use crate::errors::Result;
use crate::models::CandidateFilters;
use crate::models::DiscoveryRequest;
use crate::models::HoursBucket;

/// A request that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    /// Trimmed query; `None` when absent or blank
    pub query: Option<String>,
    pub filters: CandidateFilters,
}

impl DiscoveryRequest {
    pub fn validate(&self, max_query_chars: usize) -> Result<ValidatedRequest> {
        // Normalized exactly as the embedder will see it; nothing left means no query
        let query = match self.query.as_deref().map(preprocess_text_for_embedding) {
            Some(Ok(q)) => {
                let chars = q.chars().count();
                if chars > max_query_chars {
                    return Err(CourseScoutError::InvalidRequest(format!(
                        "query is {chars} characters, limit is {max_query_chars}"
                    )));
                }
                Some(q)
            }
            _ => None,
        };

        for (name, value) in [
            ("min_course_rating", self.min_course_rating),
            ("max_course_rating", self.max_course_rating),
            ("min_instruction_rating", self.min_instruction_rating),
            ("max_instruction_rating", self.max_instruction_rating),
        ] {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(CourseScoutError::InvalidRequest(format!(
                    "{name} must be a finite number"
                )));
            }
        }

        let mut hours_buckets = Vec::with_capacity(self.hours_buckets.len());
        for label in &self.hours_buckets {
            let bucket: HoursBucket = label
                .parse()
                .map_err(CourseScoutError::InvalidRequest)?;
            if !hours_buckets.contains(&bucket) {
                hours_buckets.push(bucket);
            }
        }
        hours_buckets.sort();

        let mut seen = HashSet::new();
        let mut requirement_ids = Vec::with_capacity(self.requirement_ids.len());
        for raw in &self.requirement_ids {
            let id = Uuid::parse_str(raw.trim()).map_err(|e| {
                CourseScoutError::InvalidRequest(format!("invalid requirement id {raw:?}: {e}"))
            })?;
            if seen.insert(id) {
                requirement_ids.push(id);
            }
        }

        Ok(ValidatedRequest {
            query,
            filters: CandidateFilters {
                min_course_rating: self.min_course_rating,
                max_course_rating: self.max_course_rating,
                min_instruction_rating: self.min_instruction_rating,
                max_instruction_rating: self.max_instruction_rating,
                hours_buckets,
                requirement_ids,
            },
        })
    }
}
