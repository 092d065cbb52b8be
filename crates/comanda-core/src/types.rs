//! # Domain Types
//!
//! Core domain types used throughout Comanda.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    LineItem     │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name (identity)│   │  id (UUID)      │   │  id order_<ms>_ │       │
//! │  │  price          │──►│  name           │──►│  items          │       │
//! │  │  price_type     │   │  price          │   │  total          │       │
//! │  │  category       │   │  customizations │   │  timestamp      │       │
//! │  │  mixers?        │   └─────────────────┘   │  completedAt?   │       │
//! │  └─────────────────┘                         │  deletedAt?     │       │
//! │                                              └─────────────────┘       │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   PriceType     │   │  LiquorFamily   │   │  CookingTerm    │       │
//! │  │  Bottle Liter   │   │  RON TEQUILA …  │   │  Medio          │       │
//! │  │  Cup Simple     │   │  … OTROS        │   │  TresCuartos    │       │
//! │  └─────────────────┘   └─────────────────┘   │  BienCocido     │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persisted Shape
//! `LineItem` and `Order` are written to the key-value store as camelCase
//! JSON with prices as plain decimal numbers. That layout is shared with the
//! rendering layer and must round-trip unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Price Type
// =============================================================================

/// Which price column of a catalog record a product was offered at.
///
/// The serde names are the catalog column names, so a price type can be read
/// straight from a menu button's data attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PriceType {
    #[serde(rename = "precioBotella")]
    Bottle,
    #[serde(rename = "precioLitro")]
    Liter,
    #[serde(rename = "precioCopa")]
    Cup,
    #[serde(rename = "precio")]
    Simple,
}

impl PriceType {
    /// Display prefix put in front of a line item name.
    pub const fn prefix(&self) -> &'static str {
        match self {
            PriceType::Bottle => "Botella",
            PriceType::Liter => "Litro",
            PriceType::Cup => "Copa",
            PriceType::Simple => "",
        }
    }

    /// Catalog column name for this price type.
    pub const fn column(&self) -> &'static str {
        match self {
            PriceType::Bottle => "precioBotella",
            PriceType::Liter => "precioLitro",
            PriceType::Cup => "precioCopa",
            PriceType::Simple => "precio",
        }
    }

    /// Parses a catalog column name. Unknown columns are `Simple`.
    pub fn from_column(column: &str) -> Self {
        match column {
            "precioBotella" => PriceType::Bottle,
            "precioLitro" => PriceType::Liter,
            "precioCopa" => PriceType::Cup,
            _ => PriceType::Simple,
        }
    }

    /// True for the three liquor servings (bottle, liter, cup).
    pub const fn is_liquor_serving(&self) -> bool {
        !matches!(self, PriceType::Simple)
    }
}

// =============================================================================
// Liquor Family
// =============================================================================

/// A liquor category used to select mixer rules.
///
/// Derived from a product's name or menu section, never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum LiquorFamily {
    Ron,
    Tequila,
    Brandy,
    Whisky,
    Vodka,
    Ginebra,
    Mezcal,
    Cognac,
    Digestivos,
    Espumosos,
    Otros,
}

impl LiquorFamily {
    /// All families in keyword-matching priority order. `Otros` is last.
    pub const ALL: [LiquorFamily; 11] = [
        LiquorFamily::Ron,
        LiquorFamily::Tequila,
        LiquorFamily::Brandy,
        LiquorFamily::Whisky,
        LiquorFamily::Vodka,
        LiquorFamily::Ginebra,
        LiquorFamily::Mezcal,
        LiquorFamily::Cognac,
        LiquorFamily::Digestivos,
        LiquorFamily::Espumosos,
        LiquorFamily::Otros,
    ];

    /// Canonical upper-case tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            LiquorFamily::Ron => "RON",
            LiquorFamily::Tequila => "TEQUILA",
            LiquorFamily::Brandy => "BRANDY",
            LiquorFamily::Whisky => "WHISKY",
            LiquorFamily::Vodka => "VODKA",
            LiquorFamily::Ginebra => "GINEBRA",
            LiquorFamily::Mezcal => "MEZCAL",
            LiquorFamily::Cognac => "COGNAC",
            LiquorFamily::Digestivos => "DIGESTIVOS",
            LiquorFamily::Espumosos => "ESPUMOSOS",
            LiquorFamily::Otros => "OTROS",
        }
    }

    /// Looks up a family by its tag, ignoring case and surrounding spaces.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|family| family.as_str().eq_ignore_ascii_case(tag))
    }
}

impl fmt::Display for LiquorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A menu product offered at one price column.
///
/// Identity is by name; the catalog has no stable product id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    pub price: Money,
    pub price_type: PriceType,
    /// Menu section the product was picked from (e.g. "vodka", "pizzas").
    pub category: String,
    /// Explicit mixer list from the catalog for this price column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mixers: Option<Vec<String>>,
}

impl Product {
    /// Creates a product without catalog mixers.
    pub fn new(
        name: impl Into<String>,
        price: Money,
        price_type: PriceType,
        category: impl Into<String>,
    ) -> Self {
        Product {
            name: name.into(),
            price,
            price_type,
            category: category.into(),
            mixers: None,
        }
    }

    /// Attaches a catalog mixer list.
    pub fn with_mixers(mut self, mixers: Vec<String>) -> Self {
        self.mixers = Some(mixers);
        self
    }

    /// The catalog mixer list, only when it has at least one entry.
    pub fn dynamic_mixers(&self) -> Option<&[String]> {
        self.mixers
            .as_deref()
            .filter(|mixers| !mixers.is_empty())
    }
}

// =============================================================================
// Cooking Term
// =============================================================================

/// Doneness for meat and main-course dishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum CookingTerm {
    Medio,
    TresCuartos,
    BienCocido,
}

impl CookingTerm {
    /// Key used by the front end (`medio`, `tres-cuartos`, `bien-cocido`).
    pub const fn key(&self) -> &'static str {
        match self {
            CookingTerm::Medio => "medio",
            CookingTerm::TresCuartos => "tres-cuartos",
            CookingTerm::BienCocido => "bien-cocido",
        }
    }

    /// Text printed on the ticket.
    pub const fn label(&self) -> &'static str {
        match self {
            CookingTerm::Medio => "Término ½",
            CookingTerm::TresCuartos => "Término ¾",
            CookingTerm::BienCocido => "Bien Cocido",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim() {
            "medio" => Some(CookingTerm::Medio),
            "tres-cuartos" => Some(CookingTerm::TresCuartos),
            "bien-cocido" => Some(CookingTerm::BienCocido),
            _ => None,
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// Line item data before the ledger assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLineItem {
    pub name: String,
    pub price: Money,
    pub category: String,
    pub customizations: Vec<String>,
}

/// One product instance (with its customizations) in an order.
///
/// Immutable once created; owned by the ledger until removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// UUID v4 assigned by the ledger.
    pub id: String,
    pub name: String,
    #[ts(as = "f64")]
    pub price: Money,
    pub category: String,
    #[serde(default)]
    pub customizations: Vec<String>,
}

// =============================================================================
// Order
// =============================================================================

/// A completed order as stored in the active list or the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    /// `order_<unix millis>_<9 random chars>`.
    pub id: String,
    pub items: Vec<LineItem>,
    #[ts(as = "f64")]
    pub total: Money,
    /// Creation time, ISO-8601.
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    /// Short local completion time ("17/10/26, 21:45") as shown on tickets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    /// Set when the order is moved to the history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Builds an order from the ledger snapshot. The total is the sum of the
    /// item prices.
    pub fn new(
        items: Vec<LineItem>,
        timestamp: DateTime<Utc>,
        completed_at: Option<String>,
    ) -> Self {
        let total = items.iter().map(|item| item.price).sum();
        Order {
            id: Self::generate_id(timestamp),
            items,
            total,
            timestamp,
            completed_at,
            deleted_at: None,
        }
    }

    fn generate_id(timestamp: DateTime<Utc>) -> String {
        let random = uuid::Uuid::new_v4().simple().to_string();
        format!("order_{}_{}", timestamp.timestamp_millis(), &random[..9])
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, cents: i64) -> LineItem {
        LineItem {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            price: Money::from_cents(cents),
            category: "cervezas".to_string(),
            customizations: vec![],
        }
    }

    #[test]
    fn test_price_type_prefix() {
        assert_eq!(PriceType::Bottle.prefix(), "Botella");
        assert_eq!(PriceType::Liter.prefix(), "Litro");
        assert_eq!(PriceType::Cup.prefix(), "Copa");
        assert_eq!(PriceType::Simple.prefix(), "");
    }

    #[test]
    fn test_price_type_columns() {
        for price_type in [
            PriceType::Bottle,
            PriceType::Liter,
            PriceType::Cup,
            PriceType::Simple,
        ] {
            assert_eq!(PriceType::from_column(price_type.column()), price_type);
        }
        assert_eq!(PriceType::from_column("precioJarra"), PriceType::Simple);
    }

    #[test]
    fn test_family_from_tag_ignores_case() {
        assert_eq!(LiquorFamily::from_tag("vodka"), Some(LiquorFamily::Vodka));
        assert_eq!(LiquorFamily::from_tag(" Ginebra "), Some(LiquorFamily::Ginebra));
        assert_eq!(LiquorFamily::from_tag("cervezas"), None);
    }

    #[test]
    fn test_cooking_term_keys() {
        assert_eq!(CookingTerm::from_key("tres-cuartos"), Some(CookingTerm::TresCuartos));
        assert_eq!(CookingTerm::BienCocido.label(), "Bien Cocido");
        assert_eq!(CookingTerm::from_key("crudo"), None);
    }

    #[test]
    fn test_dynamic_mixers_ignores_empty_list() {
        let product = Product::new("ABSOLUT", Money::from_cents(90000), PriceType::Bottle, "vodka");
        assert!(product.dynamic_mixers().is_none());

        let product = product.with_mixers(vec![]);
        assert!(product.dynamic_mixers().is_none());

        let product = product.with_mixers(vec!["Sprite".to_string()]);
        assert_eq!(product.dynamic_mixers().map(|m| m.len()), Some(1));
    }

    #[test]
    fn test_order_total_and_id() {
        let now = Utc::now();
        let order = Order::new(vec![item("A", 10000), item("B", 5550)], now, None);

        assert_eq!(order.total, Money::from_decimal(155.50));
        let prefix = format!("order_{}_", now.timestamp_millis());
        assert!(order.id.starts_with(&prefix));
        assert_eq!(order.id.len(), prefix.len() + 9);
    }

    #[test]
    fn test_order_json_layout() {
        let order = Order::new(vec![item("A", 5550)], Utc::now(), Some("17/10/26, 21:45".into()));
        let json = serde_json::to_value(&order).unwrap();

        assert_eq!(json["total"], serde_json::json!(55.5));
        assert_eq!(json["items"][0]["price"], serde_json::json!(55.5));
        assert_eq!(json["completedAt"], "17/10/26, 21:45");
        assert!(json.get("deletedAt").is_none());
        assert!(json["timestamp"].is_string());

        let back: Order = serde_json::from_value(json).unwrap();
        assert_eq!(back, order);
    }
}
