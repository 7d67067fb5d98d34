use async_trait::async_trait;
use pgvector::Vector;
use tracing::debug;
use uuid::Uuid;

use super::Database;
use crate::discovery::ChunkStore;
use crate::models::ChunkMatch;
use crate::Result;

impl Database {
    /// Nearest comment chunks to a query embedding, scoped to a set of courses.
    ///
    /// Similarity is `1 - cosine_distance`. Ordering by the raw distance lets
    /// the ivfflat index serve the query. The course scope is applied after
    /// the index scan, so `ivfflat.probes` is raised for this transaction to
    /// keep recall close to an exact search when candidates are few.
    pub async fn semantic_search_chunks(
        &self,
        query_embedding: &[f32],
        course_ids: &[Uuid],
        similarity_floor: f32,
        limit: usize,
    ) -> Result<Vec<ChunkMatch>> {
        if course_ids.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let embedding = Vector::from(query_embedding.to_vec());

        let mut tx = self.pool.begin().await?;
        sqlx::query(&set_probes_sql(self.ivfflat_probes))
            .execute(&mut *tx)
            .await?;

        let chunks = sqlx::query_as::<_, ChunkMatch>(
            r"
            SELECT
                cc.id AS chunk_id,
                cc.course_id,
                cc.content,
                (1 - (cc.embedding <=> $1))::float4 AS similarity
            FROM comment_chunks cc
            WHERE cc.course_id = ANY($2)
              AND cc.chunk_type = ANY($3)
              AND 1 - (cc.embedding <=> $1) >= $4
            ORDER BY cc.embedding <=> $1, cc.id
            LIMIT $5
            ",
        )
        .bind(embedding)
        .bind(course_ids)
        .bind(&self.chunk_types)
        .bind(f64::from(similarity_floor))
        .bind(limit as i64)
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;

        debug!(
            "Vector search returned {} chunks across {} candidate courses",
            chunks.len(),
            course_ids.len()
        );
        Ok(chunks)
    }
}

#[async_trait]
impl ChunkStore for Database {
    async fn nearest(
        &self,
        embedding: &[f32],
        course_ids: &[Uuid],
        similarity_floor: f32,
        limit: usize,
    ) -> Result<Vec<ChunkMatch>> {
        self.semantic_search_chunks(embedding, course_ids, similarity_floor, limit)
            .await
    }
}

/// `SET LOCAL` takes no bind parameters; the value is a plain integer
fn set_probes_sql(probes: u32) -> String {
    format!("SET LOCAL ivfflat.probes = {}", probes.max(1))
}
