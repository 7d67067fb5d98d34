use super::Database;
use crate::CourseScoutError;
use crate::Result;

/// Tables the discovery pipeline reads from
const REQUIRED_TABLES: [&str; 5] = [
    "courses",
    "course_metrics",
    "requirements",
    "course_requirements",
    "comment_chunks",
];

impl Database {
    /// Check if database schema is initialized
    /// Returns true if all required tables exist
    pub async fn is_schema_initialized(&self) -> Result<bool> {
        for table_name in REQUIRED_TABLES {
            let exists = sqlx::query_scalar::<_, bool>(
                r"
                SELECT EXISTS (
                    SELECT FROM information_schema.tables
                    WHERE table_schema = 'public'
                    AND table_name = $1
                )
                ",
            )
            .bind(table_name)
            .fetch_one(&self.pool)
            .await?;

            if !exists {
                tracing::debug!("Missing required table: {}", table_name);
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Verify database schema or return helpful error
    pub async fn verify_schema_or_error(&self) -> Result<()> {
        if !self.is_schema_initialized().await? {
            return Err(CourseScoutError::Config(
                "Database schema not initialized!\n\n\
                 Please run the following command to initialize the database:\n\n\
                 \x1b[1;32mcoursescout init --force\x1b[0m"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Initialize database schema
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS courses (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                code TEXT UNIQUE NOT NULL,
                title TEXT NOT NULL,
                description TEXT,
                prerequisites_text TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // One row per course; NULL metrics mean too few survey responses
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS course_metrics (
                course_id UUID PRIMARY KEY REFERENCES courses(id) ON DELETE CASCADE,
                course_rating_avg DOUBLE PRECISION,
                instruction_rating_avg DOUBLE PRECISION,
                learned_avg DOUBLE PRECISION,
                intellectually_challenging_avg DOUBLE PRECISION,
                instructor_interest_avg DOUBLE PRECISION,
                prior_interest_avg DOUBLE PRECISION,
                hours_per_week_mode TEXT CHECK (hours_per_week_mode IN (
                    '3 or fewer', '4 - 7', '8 - 11', '12 - 15', '16 - 19', '20 or more'
                ))
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS requirements (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                name TEXT UNIQUE NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS course_requirements (
                course_id UUID NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
                requirement_id UUID NOT NULL REFERENCES requirements(id) ON DELETE CASCADE,
                PRIMARY KEY (course_id, requirement_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // Chunks are immutable once embedded; re-embedding inserts a replacement row
        sqlx::query(&format!(
            r"
            CREATE TABLE IF NOT EXISTS comment_chunks (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                course_id UUID NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
                chunk_type TEXT NOT NULL DEFAULT 'comment',
                content TEXT NOT NULL,
                embedding vector({}) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            ",
            self.embedding_dimension
        ))
        .execute(&self.pool)
        .await?;

        self.create_indexes().await?;

        tracing::info!("Database schema initialized");
        Ok(())
    }

    async fn create_indexes(&self) -> Result<()> {
        let statements = [
            "CREATE INDEX IF NOT EXISTS idx_course_metrics_course_rating \
             ON course_metrics(course_rating_avg)",
            "CREATE INDEX IF NOT EXISTS idx_course_metrics_instruction_rating \
             ON course_metrics(instruction_rating_avg)",
            "CREATE INDEX IF NOT EXISTS idx_course_requirements_requirement \
             ON course_requirements(requirement_id)",
            "CREATE INDEX IF NOT EXISTS idx_comment_chunks_course ON comment_chunks(course_id)",
            "CREATE INDEX IF NOT EXISTS idx_comment_chunks_embedding ON comment_chunks \
             USING ivfflat (embedding vector_cosine_ops) WITH (lists = 100)",
        ];

        for statement in statements {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        Ok(())
    }

    /// Drop all discovery tables. Used by `init --reset`.
    pub async fn drop_schema(&self) -> Result<()> {
        for table_name in REQUIRED_TABLES.iter().rev() {
            sqlx::query(&format!("DROP TABLE IF EXISTS {table_name} CASCADE"))
                .execute(&self.pool)
                .await?;
        }
        tracing::warn!("Dropped discovery tables");
        Ok(())
    }
}
