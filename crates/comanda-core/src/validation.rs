//! # Validation Module
//!
//! Input checks applied before anything reaches the ledger.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Catalog normalization                                         │
//! │  ├── Coerces prices, fills missing names                                │
//! │  └── Never rejects a record                                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Order session                                                 │
//! │  └── THIS MODULE: rejects line items a ticket cannot carry             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Ledger (assumes valid input)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use comanda_core::validation::{validate_line_item, validate_product_name};
//! use comanda_core::{Money, NewLineItem};
//!
//! assert!(validate_product_name("Botella ABSOLUT AZUL").is_ok());
//!
//! let item = NewLineItem {
//!     name: "CORONA".into(),
//!     price: Money::from_cents(5500),
//!     category: "cervezas".into(),
//!     customizations: vec![],
//! };
//! assert!(validate_line_item(&item).is_ok());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::NewLineItem;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product name a ticket line can carry.
pub const MAX_NAME_CHARS: usize = 200;

/// Longest free-text modification (removed ingredients, garnish notes).
pub const MAX_MODIFICATION_CHARS: usize = 200;

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_CHARS {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_CHARS,
        });
    }

    Ok(())
}

/// Validates a line price. Zero is allowed (courtesy items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Validates free-text modifications. Empty text is fine.
pub fn validate_modifications(text: &str) -> ValidationResult<()> {
    if text.trim().chars().count() > MAX_MODIFICATION_CHARS {
        return Err(ValidationError::TooLong {
            field: "modifications".to_string(),
            max: MAX_MODIFICATION_CHARS,
        });
    }
    Ok(())
}

/// Validates a line item before it is added to the ledger.
pub fn validate_line_item(item: &NewLineItem) -> ValidationResult<()> {
    validate_product_name(&item.name)?;
    validate_price(item.price)?;
    for customization in &item.customizations {
        if customization.trim().is_empty() {
            return Err(ValidationError::InvalidFormat {
                field: "customizations".to_string(),
                reason: "entries must not be blank".to_string(),
            });
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
