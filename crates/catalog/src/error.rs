use thiserror::Error;

/// Catalog pipeline error taxonomy (spec §7): validation, parsing, database,
/// security and not-found errors, each mapped onto the host crate's own
/// structured `Error` so retryability and severity stay centrally defined.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Bad input; never retried.
    #[error("validation error: {field}: {message}")]
    ValidationError { field: String, message: String },

    /// Source unreachable or malformed; retried up to `max_retries`.
    #[error("parser error: {0}")]
    ParserError(String),

    /// Transient connectivity; retried.
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Path traversal or unauthorized file access; fatal, never retried.
    #[error("security error: {0}")]
    SecurityError(String),

    /// Missing queue entry, review item, or job.
    #[error("not found: {0}")]
    NotFoundError(String),

    #[error("core error: {0}")]
    Core(#[from] catalog_core::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn parser(message: impl Into<String>) -> Self {
        Self::ParserError(message.into())
    }

    pub fn security(message: impl Into<String>) -> Self {
        Self::SecurityError(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFoundError(message.into())
    }

    /// Mirrors the ambient error framework's retry predicate (spec §7):
    /// security and validation failures are never retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::SecurityError(_) | Self::ValidationError { .. } => false,
            Self::ParserError(_) | Self::DatabaseError(_) => true,
            Self::NotFoundError(_) => false,
            Self::Core(e) => e.is_retryable(),
            Self::Serialization(_) | Self::Anyhow(_) => false,
        }
    }
}
