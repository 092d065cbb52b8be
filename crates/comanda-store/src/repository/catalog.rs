//! # Catalog Repository
//!
//! Menu records stored as raw JSON, one row per record, ordered by
//! `position` inside each category.
//!
//! ```text
//! catalog_products
//! ┌────┬───────────┬──────────┬──────────────────────────────────────────┐
//! │ id │ category  │ position │ record                                   │
//! ├────┼───────────┼──────────┼──────────────────────────────────────────┤
//! │  1 │ vodka     │    0     │ {"nombre":"ABSOLUT AZUL","precioBot...}  │
//! │  2 │ vodka     │    1     │ {"name":"Smirnoff","bottle_price":...}   │
//! │  3 │ cervezas  │    0     │ {"nombre":"CORONA","precio":55}          │
//! └────┴───────────┴──────────┴──────────────────────────────────────────┘
//! ```
//!
//! Records are kept as delivered; [`CatalogEntry::from_record`] normalizes
//! them on the way out.

use async_trait::async_trait;
use comanda_core::catalog::CatalogEntry;
use serde_json::Value;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::StoreResult;
use crate::source::{section_key, ProductSource};

#[derive(Debug, Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteCatalog { pool }
    }

    /// Replaces every record of `category` in one transaction. Returns the
    /// number of records written.
    pub async fn replace_category(&self, category: &str, records: &[Value]) -> StoreResult<usize> {
        let key = section_key(category);
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM catalog_products WHERE category = ?1")
            .bind(&key)
            .execute(&mut *tx)
            .await?;

        for (position, record) in records.iter().enumerate() {
            let position = i64::try_from(position).unwrap_or(i64::MAX);
            sqlx::query(
                "INSERT INTO catalog_products (category, position, record) VALUES (?1, ?2, ?3)",
            )
            .bind(&key)
            .bind(position)
            .bind(serde_json::to_string(record)?)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(category = %key, count = records.len(), "Catalog category replaced");
        Ok(records.len())
    }

    /// Number of stored records across all categories.
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog_products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl ProductSource for SqliteCatalog {
    async fn get_products_by_category(&self, category: &str) -> StoreResult<Vec<CatalogEntry>> {
        let key = section_key(category);

        let rows = sqlx::query(
            "SELECT id, record FROM catalog_products WHERE category = ?1 ORDER BY position, id",
        )
        .bind(&key)
        .fetch_all(&self.pool)
        .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.try_get("id")?;
            let raw: String = row.try_get("record")?;
            match serde_json::from_str::<Value>(&raw) {
                Ok(record) if record.is_object() => {
                    entries.push(CatalogEntry::from_record(&record, &key));
                }
                Ok(_) => warn!(id, category = %key, "Skipping non-object catalog record"),
                Err(err) => warn!(id, category = %key, error = %err, "Skipping unreadable catalog record"),
            }
        }

        debug!(category = %key, count = entries.len(), "Catalog records loaded");
        Ok(entries)
    }

    async fn categories(&self) -> StoreResult<Vec<String>> {
        let categories =
            sqlx::query_scalar("SELECT DISTINCT category FROM catalog_products ORDER BY category")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, StoreConfig};
    use comanda_core::{LiquorFamily, Money, PriceType};
    use serde_json::json;

    async fn catalog() -> SqliteCatalog {
        Database::new(StoreConfig::in_memory())
            .await
            .unwrap()
            .catalog()
    }

    #[tokio::test]
    async fn test_replace_and_read_category() {
        let catalog = catalog().await;
        let written = catalog
            .replace_category(
                "Vodka",
                &[
                    json!({"nombre": "ABSOLUT AZUL", "precioBotella": 850, "precioCopa": 95}),
                    json!({"name": "SMIRNOFF", "bottle_price": "700"}),
                ],
            )
            .await
            .unwrap();
        assert_eq!(written, 2);

        let entries = catalog.get_products_by_category("vodka").await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["ABSOLUT AZUL", "SMIRNOFF"]);
        assert_eq!(
            entries[1].offer(PriceType::Bottle).unwrap().price,
            Money::from_cents(70000)
        );

        let by_family = catalog
            .get_liquor_subcategory(LiquorFamily::Vodka)
            .await
            .unwrap();
        assert_eq!(by_family, entries);
    }

    #[tokio::test]
    async fn test_replace_drops_previous_records() {
        let catalog = catalog().await;
        catalog
            .replace_category("cervezas", &[json!({"nombre": "CORONA"}), json!({"nombre": "VICTORIA"})])
            .await
            .unwrap();
        catalog
            .replace_category("cervezas", &[json!({"nombre": "MODELO"})])
            .await
            .unwrap();
        catalog
            .replace_category("pizzas", &[json!({"nombre": "HAWAIANA"})])
            .await
            .unwrap();

        assert_eq!(catalog.count().await.unwrap(), 2);
        assert_eq!(catalog.categories().await.unwrap(), vec!["cervezas", "pizzas"]);
    }

    #[tokio::test]
    async fn test_unknown_category_is_empty() {
        let catalog = catalog().await;
        assert!(catalog
            .get_products_by_category("postres")
            .await
            .unwrap()
            .is_empty());
    }
}
