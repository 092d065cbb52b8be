//! # comanda-store: Persistence Layer for Comanda
//!
//! Everything the register keeps on disk: completed orders and the menu
//! catalog, both in one SQLite file.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Comanda Data Flow                                │
//! │                                                                         │
//! │  OrderSession (apps/register)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  comanda-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌───────────────┐   ┌──────────────────┐  │   │
//! │  │   │ OrderArchive │   │ ProductSource │   │    Migrations    │  │   │
//! │  │   │ (archive.rs) │   │  (source.rs)  │   │    (embedded)    │  │   │
//! │  │   └──────┬───────┘   └───────┬───────┘   └──────────────────┘  │   │
//! │  │          ▼                   ▼                                  │   │
//! │  │   KeyValueStore        SqliteCatalog                            │   │
//! │  │   ├── SqliteKvStore    MemoryCatalog                            │   │
//! │  │   └── MemoryStore                                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (WAL)   kv_store, catalog_products                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use comanda_store::{Database, OrderArchive, StoreConfig};
//!
//! let db = Database::new(StoreConfig::new("comanda.db")).await?;
//! let archive = OrderArchive::new(db.kv());
//! let active = archive.get_active().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod archive;
pub mod error;
pub mod kv;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod source;

// =============================================================================
// Re-exports
// =============================================================================

pub use archive::{OrderArchive, HISTORY_KEY, ORDERS_KEY};
pub use error::{StoreError, StoreResult};
pub use kv::{KeyValueStore, MemoryStore};
pub use pool::{Database, StoreConfig};
pub use repository::catalog::SqliteCatalog;
pub use repository::kv::SqliteKvStore;
pub use source::{MemoryCatalog, ProductSource};
