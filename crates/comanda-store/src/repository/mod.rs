//! # Repository Module
//!
//! SQLite-backed implementations of the store traits.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OrderArchive ──► KeyValueStore ──► SqliteKvStore ──► kv_store          │
//! │  OrderSession ──► ProductSource ──► SqliteCatalog ──► catalog_products  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - [`kv::SqliteKvStore`] - string keys to JSON text
//! - [`catalog::SqliteCatalog`] - menu records per category

pub mod catalog;
pub mod kv;
