//! # Store Error Types
//!
//! Error types for persistence operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / serde_json::Error                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization             │
//! │       │                                                                 │
//! │       ├──► OrderArchive: logged, turned into `false` / empty list       │
//! │       │                                                                 │
//! │       └──► Catalog reads: returned to the register app                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store refused a write.
    ///
    /// ## When This Occurs
    /// - Disk full or read-only database file
    /// - A test store configured to fail writes
    #[error("Write to '{key}' rejected: {reason}")]
    WriteRejected { key: String, reason: String },

    /// A stored value could not be decoded.
    ///
    /// ## When This Occurs
    /// - Hand-edited or truncated JSON under `orders` / `orderHistory`
    /// - A catalog record that is not valid JSON
    #[error("Corrupt value under '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal store error.
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn corrupt(key: impl Into<String>, reason: impl ToString) -> Self {
        StoreError::Corrupt {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → StoreError::QueryFailed (or WriteRejected
///                               for full / read-only databases)
/// sqlx::Error::PoolTimedOut   → StoreError::PoolExhausted
/// sqlx::Error::PoolClosed     → StoreError::ConnectionFailed
/// Other                       → StoreError::Internal
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                if msg.contains("database or disk is full") || msg.contains("readonly") {
                    StoreError::WriteRejected {
                        key: "kv_store".to_string(),
                        reason: msg.to_string(),
                    }
                } else {
                    StoreError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,

            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("Pool is closed".to_string()),

            _ => StoreError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
