use thiserror::Error;

/// Centralized error types for the application
///
/// Storage, session and transport failures are converted to this enum so
/// handlers can report them to the chat in one place.
///
/// # Example
///
/// ```no_run
/// use fightcore::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Query or constraint failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Database connection pool errors
    #[error("Database pool error: {0}")]
    DatabasePool(#[from] r2d2::Error),

    /// Schema migration failure
    #[error("Migration error: {0}")]
    Migration(#[from] refinery::Error),

    /// Redis session backend errors
    #[error("Session store error: {0}")]
    Session(#[from] redis::RedisError),

    /// Session (de)serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Telegram API errors
    #[cfg(feature = "telegram")]
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Input rejected before reaching the database
    #[error("Validation error: {0}")]
    Validation(String),

    /// Lookup by id or name found nothing
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// True when the underlying failure came from the relational store.
    pub fn is_database(&self) -> bool {
        matches!(self, AppError::Database(_) | AppError::DatabasePool(_))
    }
}

impl From<crate::validation::ValidationError> for AppError {
    fn from(err: crate::validation::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
