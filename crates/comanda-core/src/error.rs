//! # Error Types
//!
//! Domain-specific error types for comanda-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  comanda-core errors (this file)                                       │
//! │  ├── CoreError        - Customization flow misuse                      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  comanda-store errors (separate crate)                                 │
//! │  └── StoreError       - Key-value store / catalog failures             │
//! │                                                                         │
//! │  register errors (app)                                                 │
//! │  └── RegisterError    - What the front end sees                        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → RegisterError → Front end         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Not Errors
//! Exceeding a mixer cap is a normal outcome of
//! [`SelectionCounter::increment`](crate::selection::SelectionCounter::increment)
//! (it returns `None`), never an error value.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core order logic errors.
///
/// These represent calls made in the wrong state of a customization flow.
/// Callers log them and leave the in-progress order untouched.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A dependent call was made while no product is selected.
    #[error("No product selected")]
    NoProductSelected,

    /// Meat and main-course dishes need a cooking term before confirming.
    #[error("A cooking term must be selected for {product}")]
    MissingCookingTerm { product: String },

    /// The confirm call does not match the flow the product requires.
    ///
    /// ## When This Occurs
    /// - Confirming drink options for a pizza
    /// - Confirming a cooking term for a bottle
    #[error("{product} requires the {expected} flow, not {requested}")]
    FlowMismatch {
        product: String,
        expected: String,
        requested: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
