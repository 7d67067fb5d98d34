use async_trait::async_trait;
use uuid::Uuid;

use super::Database;
use crate::discovery::RequirementIndex;
use crate::models::RequirementLink;
use crate::Result;

impl Database {
    /// Course-requirement links for the given requirements
    pub async fn course_requirement_links(
        &self,
        requirement_ids: &[Uuid],
        scope: Option<&[Uuid]>,
    ) -> Result<Vec<RequirementLink>> {
        if requirement_ids.is_empty() {
            return Ok(Vec::new());
        }

        let links = sqlx::query_as::<_, RequirementLink>(
            r"
            SELECT course_id, requirement_id
            FROM course_requirements
            WHERE requirement_id = ANY($1)
              AND ($2::uuid[] IS NULL OR course_id = ANY($2))
            ",
        )
        .bind(requirement_ids)
        .bind(scope)
        .fetch_all(&self.pool)
        .await?;

        Ok(links)
    }
}

#[async_trait]
impl RequirementIndex for Database {
    async fn lookup(
        &self,
        requirement_ids: &[Uuid],
        scope: Option<&[Uuid]>,
    ) -> Result<Vec<RequirementLink>> {
        self.course_requirement_links(requirement_ids, scope).await
    }
}
