//! # Register Error Types
//!
//! `RegisterError` is what session operations return; `ApiError` is what the
//! terminal front end shows.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Register                           │
//! │                                                                         │
//! │  OrderSession::complete_order()                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Empty ledger?        ─── RegisterError::EmptyOrder ─────────┐          │
//! │  Archive write failed? ── RegisterError::PersistenceFailed ──┤          │
//! │  Core rule broken?    ─── RegisterError::Core(CoreError) ────┤          │
//! │                                                              ▼          │
//! │                                          ApiError { code, message }     │
//! │                                                              │          │
//! │                                                              ▼          │
//! │                             "error [ORDER_ERROR]: Order has no items"   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use comanda_core::{CoreError, ValidationError};
use comanda_store::StoreError;

// =============================================================================
// Register Error
// =============================================================================

#[derive(Debug, Error)]
pub enum RegisterError {
    /// Items can only be added between `start` and `complete`/`cancel`.
    #[error("No order in progress")]
    NotInOrderMode,

    /// Completing an order with an empty ledger.
    #[error("Order has no items")]
    EmptyOrder,

    /// The archive refused the completed order. The cart is kept.
    ///
    /// ## When This Occurs
    /// - Disk full or read-only database
    /// - Database closed underneath the session
    #[error("Order {order_id} could not be saved; the cart was kept")]
    PersistenceFailed { order_id: String },

    /// Order-logic error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Store error outside the archive (catalog reads, startup).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Terminal input that is not a command.
    #[error("{0}")]
    InvalidCommand(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

impl From<ValidationError> for RegisterError {
    fn from(err: ValidationError) -> Self {
        RegisterError::Core(CoreError::Validation(err))
    }
}

pub type RegisterResult<T> = Result<T, RegisterError>;

// =============================================================================
// API Error
// =============================================================================

/// Error as presented to the operator.
///
/// ## Serialization
/// ```json
/// {
///   "code": "ORDER_ERROR",
///   "message": "Order has no items"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown order, product, or listing index
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Call made in the wrong customization state
    BusinessLogic,

    /// Order lifecycle error (no order started, empty order)
    OrderError,

    /// Database or archive failure
    DatabaseError,

    /// Configuration problem
    ConfigError,

    /// Unrecognized terminal input
    InvalidCommand,

    /// Internal error
    Internal,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::BusinessLogic => "BUSINESS_LOGIC",
            ErrorCode::OrderError => "ORDER_ERROR",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::InvalidCommand => "INVALID_COMMAND",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::WriteRejected { key, .. } => ApiError::new(
                ErrorCode::DatabaseError,
                format!("Could not write {}", key),
            ),
            StoreError::ConnectionFailed(_) | StoreError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database unavailable")
            }
            StoreError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            other => {
                tracing::error!(error = %other, "Store operation failed");
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
            other => ApiError::new(ErrorCode::BusinessLogic, other.to_string()),
        }
    }
}

impl From<RegisterError> for ApiError {
    fn from(err: RegisterError) -> Self {
        match err {
            RegisterError::NotInOrderMode | RegisterError::EmptyOrder => {
                ApiError::new(ErrorCode::OrderError, err.to_string())
            }
            RegisterError::PersistenceFailed { .. } => {
                ApiError::new(ErrorCode::DatabaseError, err.to_string())
            }
            RegisterError::Core(e) => e.into(),
            RegisterError::Store(e) => e.into(),
            RegisterError::Config(_)
            | RegisterError::ConfigParse(_)
            | RegisterError::ConfigSerialize(_) => {
                ApiError::new(ErrorCode::ConfigError, err.to_string())
            }
            RegisterError::InvalidCommand(message) => {
                ApiError::new(ErrorCode::InvalidCommand, message)
            }
            RegisterError::Io(e) => {
                tracing::error!(error = %e, "I/O failure");
                ApiError::internal(e.to_string())
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}
