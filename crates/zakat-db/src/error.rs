//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError (zakat-core)      SQLite Error (sqlx::Error)          │
//! │       │                                  │                              │
//! │       └──────────────┬───────────────────┘                              │
//! │                      ▼                                                  │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller (menu) shows a message and re-prompts                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Categories
//! | Category   | Variants                                              |
//! |------------|-------------------------------------------------------|
//! | connection | `ConnectionFailed`                                    |
//! | validation | `Validation`                                          |
//! | not found  | `NotFound`                                            |
//! | datastore  | `QueryFailed`, `TransactionFailed`, `MigrationFailed`, |
//! |            | `PoolExhausted`, `Internal`                           |

use thiserror::Error;
use zakat_core::ValidationError;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Caller input failed a field rule. No statement was sent.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Target row does not exist.
    ///
    /// ## When This Occurs
    /// - `update_status` or `delete` on an id that was never created
    /// - Second `delete` of the same id
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Database connection failed or was closed.
    ///
    /// ## When This Occurs
    /// - Database file can't be opened or created
    /// - File permissions issue
    /// - Any operation after `Database::close()`
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// The engine rejected a statement (constraint, syntax, decode).
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Begin, commit or rollback failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// No connection became free within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, DbError::ConnectionFailed(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DbError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }

    /// True when the engine itself failed after input was accepted.
    pub fn is_datastore(&self) -> bool {
        matches!(
            self,
            DbError::QueryFailed(_)
                | DbError::TransactionFailed(_)
                | DbError::MigrationFailed(_)
                | DbError::PoolExhausted
                | DbError::Internal(_)
        )
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → DbError::QueryFailed
/// sqlx::Error::ColumnDecode   → DbError::QueryFailed
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::ConnectionFailed
/// sqlx::Error::Io             → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => DbError::QueryFailed(db_err.message().to_string()),

            sqlx::Error::ColumnDecode { .. } | sqlx::Error::ColumnNotFound(_) => {
                DbError::QueryFailed(err.to_string())
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::Io(_) => DbError::ConnectionFailed(err.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

// =============================================================================
// Unit Tests
// =============================================================================
