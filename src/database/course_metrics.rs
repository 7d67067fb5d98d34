use async_trait::async_trait;
use tracing::debug;

use super::Database;
use crate::discovery::FilterStore;
use crate::models::CandidateFilters;
use crate::models::CourseMetricRecord;
use crate::Result;

impl Database {
    /// Courses whose aggregate metrics satisfy every set bound.
    ///
    /// An unset bound is bound as NULL and imposes no constraint; a set bound
    /// excludes courses whose metric is NULL. Rows are ordered by course code
    /// so the cap always keeps the same prefix.
    pub async fn filter_course_metrics(
        &self,
        filters: &CandidateFilters,
        cap: usize,
    ) -> Result<Vec<CourseMetricRecord>> {
        let hours: Option<Vec<String>> = if filters.hours_buckets.is_empty() {
            None
        } else {
            Some(filters.hours_labels())
        };

        let records = sqlx::query_as::<_, CourseMetricRecord>(
            r"
            SELECT
                cm.course_id,
                c.code,
                c.title,
                c.description,
                cm.course_rating_avg::float8 AS course_rating_avg,
                cm.instruction_rating_avg::float8 AS instruction_rating_avg,
                cm.hours_per_week_mode
            FROM course_metrics cm
            INNER JOIN courses c ON c.id = cm.course_id
            WHERE ($1::float8 IS NULL OR cm.course_rating_avg >= $1)
              AND ($2::float8 IS NULL OR cm.course_rating_avg <= $2)
              AND ($3::float8 IS NULL OR cm.instruction_rating_avg >= $3)
              AND ($4::float8 IS NULL OR cm.instruction_rating_avg <= $4)
              AND ($5::text[] IS NULL OR cm.hours_per_week_mode = ANY($5))
            ORDER BY c.code, cm.course_id
            LIMIT $6
            ",
        )
        .bind(filters.min_course_rating)
        .bind(filters.max_course_rating)
        .bind(filters.min_instruction_rating)
        .bind(filters.max_instruction_rating)
        .bind(hours)
        .bind(cap as i64)
        .fetch_all(&self.pool)
        .await?;

        debug!("Filter store matched {} courses (cap {})", records.len(), cap);
        Ok(records)
    }
}

#[async_trait]
impl FilterStore for Database {
    async fn query_candidates(
        &self,
        filters: &CandidateFilters,
        cap: usize,
    ) -> Result<Vec<CourseMetricRecord>> {
        self.filter_course_metrics(filters, cap).await
    }
}
