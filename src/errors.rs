use thiserror::Error;

#[derive(Error, Debug)]
pub enum CourseScoutError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Filter Store or Comment Chunk Store failure; no partial result is usable
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Embedding provider error: {0}")]
    EmbeddingProvider(String),

    #[error("{operation} timed out after {after_ms}ms")]
    Timeout { operation: &'static str, after_ms: u64 },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CourseScoutError {
    /// Stable identifier surfaced to API clients. Never changes with the message text.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::Retrieval(_) => "retrieval_error",
            Self::EmbeddingProvider(_) => "embedding_provider_error",
            Self::Timeout { .. } => "timeout",
            Self::Database(_) => "database_error",
            Self::Http(_) => "http_error",
            Self::Config(_) | Self::TomlParsing(_) => "config_error",
            Self::Serialization(_) => "serialization_error",
            Self::Io(_) => "io_error",
        }
    }

    /// HTTP status code class for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) => 400,
            Self::EmbeddingProvider(_) => 502,
            Self::Timeout { .. } => 504,
            _ => 500,
        }
    }

    /// Whether the error came from the caller's input rather than a dependency
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }

    /// Re-tag a store failure as a retrieval error, keeping timeouts and
    /// already-classified errors intact.
    pub(crate) fn into_retrieval(self) -> Self {
        match self {
            Self::Timeout { .. } | Self::Retrieval(_) | Self::InvalidRequest(_) => self,
            other => Self::Retrieval(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CourseScoutError>;
