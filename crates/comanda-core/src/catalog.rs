//! # Catalog Normalization
//!
//! Catalog records reach us in several spellings: Spanish camelCase from the
//! web schema, snake_case columns straight from the database, English names
//! from older exports. This module turns any of them into one canonical
//! [`CatalogEntry`], and an entry into a [`Product`] per priced column.
//!
//! ## Alias Table
//! ```text
//! ┌──────────────────┬──────────────────────────────────────────────────────┐
//! │ Canonical        │ Accepted keys (first present wins)                   │
//! ├──────────────────┼──────────────────────────────────────────────────────┤
//! │ name             │ nombre, name                                         │
//! │ price            │ precio, price, precio_venta                          │
//! │ category         │ categoria, category                                  │
//! │ bottle price     │ precioBotella, precio_botella, bottlePrice,          │
//! │                  │ bottle_price                                         │
//! │ cup price        │ precioCopa, precio_copa, glassPrice, cup_price       │
//! │ liter price      │ precioLitro, precio_litro, literPrice, liter_price   │
//! │ bottle mixers    │ mixersBotella, mixers_botella, bottleMixers          │
//! │ cup mixers       │ mixersCopa, mixers_copa, glassMixers                 │
//! │ liter mixers     │ mixersLitro, mixers_litro, literMixers               │
//! └──────────────────┴──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Coercion
//! - Prices: numbers or price cells ("$1,250.00"); negative or digitless → absent
//! - Mixers: arrays or JSON-array strings; empty → absent
//! - Names shorter than 3 characters → "Producto Sin Nombre"

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::money::Money;
use crate::pricing::extract_price;
use crate::types::{PriceType, Product};

/// Name used when a record has no usable name.
pub const UNNAMED_PRODUCT: &str = "Producto Sin Nombre";

const MIN_NAME_CHARS: usize = 3;

/// Canonical catalog fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Price,
    Category,
    BottlePrice,
    CupPrice,
    LiterPrice,
    BottleMixers,
    CupMixers,
    LiterMixers,
}

/// The one place raw key spellings are resolved.
pub const FIELD_ALIASES: &[(Field, &[&str])] = &[
    (Field::Name, &["nombre", "name"]),
    (Field::Price, &["precio", "price", "precio_venta"]),
    (Field::Category, &["categoria", "category"]),
    (
        Field::BottlePrice,
        &["precioBotella", "precio_botella", "bottlePrice", "bottle_price"],
    ),
    (
        Field::CupPrice,
        &["precioCopa", "precio_copa", "glassPrice", "cup_price"],
    ),
    (
        Field::LiterPrice,
        &["precioLitro", "precio_litro", "literPrice", "liter_price"],
    ),
    (
        Field::BottleMixers,
        &["mixersBotella", "mixers_botella", "bottleMixers"],
    ),
    (Field::CupMixers, &["mixersCopa", "mixers_copa", "glassMixers"]),
    (
        Field::LiterMixers,
        &["mixersLitro", "mixers_litro", "literMixers"],
    ),
];

/// Returns the first non-null value stored under any alias of `field`.
pub fn lookup(record: &Value, field: Field) -> Option<&Value> {
    let aliases = FIELD_ALIASES
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, aliases)| *aliases)?;

    aliases
        .iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null())
}

// =============================================================================
// Coercion
// =============================================================================

fn coerce_price(value: Option<&Value>) -> Option<Money> {
    let amount = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let text = s.trim();
            let mut before_digits = text.chars().take_while(|c| !c.is_ascii_digit());
            if before_digits.any(|c| c == '-') || !text.chars().any(|c| c.is_ascii_digit()) {
                return None;
            }
            extract_price(text)
        }
        _ => return None,
    };
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }
    Some(Money::from_decimal(amount))
}

fn coerce_mixers(value: Option<&Value>) -> Option<Vec<String>> {
    let parsed;
    let array = match value? {
        Value::Array(items) => items,
        Value::String(s) if s.trim_start().starts_with('[') => {
            parsed = match serde_json::from_str::<Value>(s) {
                Ok(v) => v,
                Err(err) => {
                    warn!(mixers = %s, error = %err, "Failed to parse mixer list");
                    return None;
                }
            };
            parsed.as_array()?
        }
        _ => return None,
    };

    let mixers: Vec<String> = array
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if mixers.is_empty() {
        None
    } else {
        Some(mixers)
    }
}

fn coerce_name(value: Option<&Value>) -> String {
    match value.and_then(Value::as_str).map(str::trim) {
        Some(name) if name.chars().count() >= MIN_NAME_CHARS => name.to_string(),
        _ => UNNAMED_PRODUCT.to_string(),
    }
}

// =============================================================================
// Catalog Entry
// =============================================================================

/// One catalog record in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub name: String,
    pub category: String,
    pub price: Option<Money>,
    pub bottle_price: Option<Money>,
    pub cup_price: Option<Money>,
    pub liter_price: Option<Money>,
    pub bottle_mixers: Option<Vec<String>>,
    pub cup_mixers: Option<Vec<String>>,
    pub liter_mixers: Option<Vec<String>>,
}

impl CatalogEntry {
    /// Normalizes one raw record. `section` is the menu section the record
    /// was fetched for; it is used when the record carries no category.
    pub fn from_record(record: &Value, section: &str) -> Self {
        let category = lookup(record, Field::Category)
            .and_then(Value::as_str)
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| section.trim().to_lowercase());

        CatalogEntry {
            name: coerce_name(lookup(record, Field::Name)),
            category,
            price: coerce_price(lookup(record, Field::Price)),
            bottle_price: coerce_price(lookup(record, Field::BottlePrice)),
            cup_price: coerce_price(lookup(record, Field::CupPrice)),
            liter_price: coerce_price(lookup(record, Field::LiterPrice)),
            bottle_mixers: coerce_mixers(lookup(record, Field::BottleMixers)),
            cup_mixers: coerce_mixers(lookup(record, Field::CupMixers)),
            liter_mixers: coerce_mixers(lookup(record, Field::LiterMixers)),
        }
    }

    pub fn price_for(&self, price_type: PriceType) -> Option<Money> {
        match price_type {
            PriceType::Bottle => self.bottle_price,
            PriceType::Liter => self.liter_price,
            PriceType::Cup => self.cup_price,
            PriceType::Simple => self.price,
        }
    }

    pub fn mixers_for(&self, price_type: PriceType) -> Option<&Vec<String>> {
        match price_type {
            PriceType::Bottle => self.bottle_mixers.as_ref(),
            PriceType::Liter => self.liter_mixers.as_ref(),
            PriceType::Cup => self.cup_mixers.as_ref(),
            PriceType::Simple => None,
        }
    }

    /// The product sold at one price column, if that column has a price.
    pub fn offer(&self, price_type: PriceType) -> Option<Product> {
        let price = self.price_for(price_type)?;
        let product = Product::new(&self.name, price, price_type, &self.category);
        Some(match self.mixers_for(price_type) {
            Some(mixers) => product.with_mixers(mixers.clone()),
            None => product,
        })
    }

    /// Every priced column, bottle first.
    pub fn offers(&self) -> Vec<Product> {
        [
            PriceType::Bottle,
            PriceType::Liter,
            PriceType::Cup,
            PriceType::Simple,
        ]
        .into_iter()
        .filter_map(|price_type| self.offer(price_type))
        .collect()
    }
}

/// Normalizes a batch of raw records. Non-object values are skipped.
pub fn normalize_records(records: &[Value], section: &str) -> Vec<CatalogEntry> {
    records
        .iter()
        .filter(|record| {
            let ok = record.is_object();
            if !ok {
                warn!(section, "Skipping non-object catalog record");
            }
            ok
        })
        .map(|record| CatalogEntry::from_record(record, section))
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
