//! # Product Source
//!
//! Where menu records come from. Records leave this boundary already
//! normalized into [`CatalogEntry`] values, whatever spelling they were
//! stored in.

use std::collections::HashMap;

use async_trait::async_trait;
use comanda_core::catalog::{normalize_records, CatalogEntry};
use comanda_core::LiquorFamily;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::StoreResult;

/// Supplier of catalog records.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Every record filed under a menu section (`"pizzas"`, `"cervezas"`).
    async fn get_products_by_category(&self, category: &str) -> StoreResult<Vec<CatalogEntry>>;

    /// Sections that hold at least one record, sorted.
    async fn categories(&self) -> StoreResult<Vec<String>>;

    /// Every record of one liquor family. Families are stored under their
    /// lowercase tag (`"vodka"`, `"digestivos"`).
    async fn get_liquor_subcategory(&self, family: LiquorFamily) -> StoreResult<Vec<CatalogEntry>> {
        self.get_products_by_category(&family.as_str().to_lowercase())
            .await
    }
}

/// Normalized section key.
pub(crate) fn section_key(category: &str) -> String {
    category.trim().to_lowercase()
}

// =============================================================================
// Memory Catalog
// =============================================================================

/// In-memory catalog holding raw records per section.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    sections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the records of one section.
    pub async fn insert(&self, category: &str, records: Vec<Value>) {
        self.sections
            .write()
            .await
            .insert(section_key(category), records);
    }
}

#[async_trait]
impl ProductSource for MemoryCatalog {
    async fn get_products_by_category(&self, category: &str) -> StoreResult<Vec<CatalogEntry>> {
        let key = section_key(category);
        let sections = self.sections.read().await;
        Ok(sections
            .get(&key)
            .map(|records| normalize_records(records, &key))
            .unwrap_or_default())
    }

    async fn categories(&self) -> StoreResult<Vec<String>> {
        let sections = self.sections.read().await;
        let mut names: Vec<String> = sections
            .iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        Ok(names)
    }
}
