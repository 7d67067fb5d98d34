use sqlx::PgPool;

use crate::Result;

mod chunks;
mod course_metrics;
mod requirements;
mod schema;

/// Database connection pool wrapper.
///
/// Serves as the filter store, requirement index and comment chunk store.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
    chunk_types: Vec<String>,
    embedding_dimension: usize,
    ivfflat_probes: u32,
}

impl Database {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            chunk_types: crate::config::default_chunk_types(),
            embedding_dimension: crate::embeddings::DEFAULT_EMBEDDING_DIM,
            ivfflat_probes: crate::config::default_ivfflat_probes(),
        }
    }

    /// Create a new database instance from configuration
    pub async fn from_config(config: &crate::config::AppConfig) -> Result<Self> {
        let pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections())
            .min_connections(config.min_connections())
            .acquire_timeout(std::time::Duration::from_secs(config.connection_timeout()));

        let pool = pool_options.connect(config.database_url()).await?;

        tracing::info!(
            "Database pool configured: max_connections={}, min_connections={}",
            config.max_connections(),
            config.min_connections()
        );

        Ok(Self::new(pool)
            .with_chunk_types(config.discovery.chunk_types.clone())
            .with_embedding_dimension(config.embedding_dimension())
            .with_ivfflat_probes(config.discovery.ivfflat_probes))
    }

    /// Restrict vector search to these chunk types
    #[must_use]
    pub fn with_chunk_types(mut self, chunk_types: Vec<String>) -> Self {
        self.chunk_types = chunk_types;
        self
    }

    /// Dimension of the `embedding` column created by `init_schema`
    #[must_use]
    pub fn with_embedding_dimension(mut self, dimension: usize) -> Self {
        self.embedding_dimension = dimension;
        self
    }

    /// Lists scanned per vector search
    #[must_use]
    pub fn with_ivfflat_probes(mut self, probes: u32) -> Self {
        self.ivfflat_probes = probes.max(1);
        self
    }
}
