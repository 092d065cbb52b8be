//! # comanda-core: Pure Order Logic for Comanda
//!
//! This crate is the **heart** of Comanda. It contains the order
//! customization engine as pure functions and plain state machines with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Comanda Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Register (apps/register)                        │   │
//! │  │   select product ─► mixers ─► counters ─► confirm ─► complete   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ comanda-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌───────────┐ ┌──────────────┐     │   │
//! │  │   │ pricing  │ │  liquor  │ │  drinks   │ │  selection   │     │   │
//! │  │   │  parse   │ │ classify │ │  resolve  │ │  counters    │     │   │
//! │  │   └──────────┘ └──────────┘ └───────────┘ └──────────────┘     │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌───────────┐ ┌──────────────┐     │   │
//! │  │   │formatter │ │   cart   │ │  catalog  │ │    flow      │     │   │
//! │  │   └──────────┘ └──────────┘ └───────────┘ └──────────────┘     │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NO RENDERING             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 comanda-store (Persistence)                     │   │
//! │  │          key-value store, order archive, catalog source         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, LineItem, Order, LiquorFamily, ...)
//! - [`money`] - Money type with integer cents
//! - [`pricing`] - Price extraction from display strings
//! - [`liquor`] - Liquor family classification
//! - [`drinks`] - Mixer option resolution
//! - [`selection`] - Counter/single-choice selection state machine
//! - [`formatter`] - Line item name and customization text
//! - [`cart`] - The order in progress
//! - [`catalog`] - Raw catalog record normalization
//! - [`flow`] - Which customization a selected product needs
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use comanda_core::drinks::DrinkOptionResolver;
//! use comanda_core::selection::SelectionCounter;
//! use comanda_core::{Money, PriceType, Product};
//!
//! let product = Product::new("BACARDI MANGO", Money::from_cents(85000), PriceType::Bottle, "ron");
//! let resolver = DrinkOptionResolver::default();
//! let drinks = resolver.resolve(&product);
//!
//! let mut counter = SelectionCounter::for_product(&product, &drinks.options);
//! assert_eq!(counter.increment("Jugo de Piña"), Some(1));
//! assert_eq!(counter.increment("Jugo de Piña"), Some(2));
//! // Two juice pitchers exclude any soda
//! assert_eq!(counter.increment("Sprite"), None);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod drinks;
pub mod error;
pub mod flow;
pub mod formatter;
pub mod liquor;
pub mod money;
pub mod pricing;
pub mod selection;
pub mod text;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::CartLedger;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of accompaniments for a bottle outside special mode.
pub const MAX_DRINK_COUNT: u32 = 5;

/// Maximum number of juice pitchers in special mode.
pub const MAX_JUICE_COUNT: u32 = 2;

/// Maximum number of sodas in special mode (with no juice pitcher).
pub const MAX_SODA_COUNT: u32 = 5;

/// Maximum sodas allowed alongside a single juice pitcher.
pub const MAX_SODA_WITH_ONE_JUICE: u32 = 2;

/// The option label meaning "no accompaniment".
pub const NO_ACCOMPANIMENT: &str = "Ninguno";

/// Customization text used when nothing was chosen.
pub const NO_ACCOMPANIMENTS_TEXT: &str = "Sin acompañamientos";
