//! # Drink Option Resolver
//!
//! Decides which mixers (accompaniments) a liquor product offers and which
//! guidance message goes with them.
//!
//! ## Precedence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  resolve(product)                    first applicable rule wins         │
//! │                                                                         │
//! │  1. Catalog mixers      product.mixers non-empty ──► returned verbatim  │
//! │  2. Special products    "BACARDI MANGO" ⊂ name   ──► fixed list         │
//! │  3. Digestivos          bottle: name table, else "Ninguno"              │
//! │                         cup:    BAILEYS ► Rocas, else "Ninguno"         │
//! │  4. Espumosos           always "Ninguno"                                │
//! │  5. Family table        family × (LITER | CUP | DEFAULT)                │
//! │                         no entry ──► [Mineral, Coca, Manzana]           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All rule data lives in a [`RuleBook`] that is built once and never
//! mutated. The resolver never fails: a product without a usable name gets
//! `["Ninguno"]` and an error message.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use ts_rs::TS;

use crate::liquor::classify;
use crate::text::normalize;
use crate::types::{LiquorFamily, PriceType, Product};
use crate::NO_ACCOMPANIMENT;

// =============================================================================
// Messages
// =============================================================================

/// Shown for products under the combined pitcher/soda cap.
pub const MESSAGE_SPECIAL: &str =
    "Puedes elegir: 2 Jarras de jugo ó 5 Refrescos ó 1 Jarra de jugo y 2 Refrescos";
/// Shown when every option is a soda.
pub const MESSAGE_ONLY_SODAS: &str = "Puedes elegir hasta 5 refrescos";
pub const MESSAGE_DEFAULT: &str = "Puedes elegir hasta 5 acompañamientos";
pub const MESSAGE_NO_SODAS: &str = "Este producto no incluye refrescos";
pub const MESSAGE_DIGESTIVO_BOTTLE: &str = "Seleccione acompañamiento:";
pub const MESSAGE_CUP: &str = "Acompañamientos para copa";
pub const MESSAGE_INVALID_PRODUCT: &str = "Error: Producto no válido";

/// Substrings that mark an option as a juice pitcher.
const JUICE_KEYWORDS: [&str; 4] = ["JUGO", "PINA", "ARANDANO", "JARRA"];

/// RON products that fall under the combined cap.
pub const SPECIAL_RON: [&str; 3] = ["BACARDI MANGO", "BACARDI RASPBERRY", "MALIBU"];

// =============================================================================
// Classification Helpers
// =============================================================================

/// True when an option label names a juice (pitcher) rather than a soda.
pub fn is_juice_option(option: &str) -> bool {
    let label = normalize(option);
    JUICE_KEYWORDS.iter().any(|kw| label.contains(kw))
}

/// True when every option is a soda and "Ninguno" is not offered.
pub fn is_soda_only(options: &[String]) -> bool {
    !options.is_empty()
        && options
            .iter()
            .all(|option| !is_juice_option(option) && option != NO_ACCOMPANIMENT)
}

/// True for products under the combined juice-pitcher/soda cap: every VODKA
/// and GINEBRA, plus the RON brands in [`SPECIAL_RON`].
pub fn is_special_mode(family: LiquorFamily, product_name: &str) -> bool {
    match family {
        LiquorFamily::Vodka | LiquorFamily::Ginebra => true,
        LiquorFamily::Ron => {
            let name = normalize(product_name);
            SPECIAL_RON.iter().any(|special| name.contains(special))
        }
        _ => false,
    }
}

// =============================================================================
// Result Type
// =============================================================================

/// Mixer options for one product plus the guidance line shown above them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DrinkOptions {
    pub options: Vec<String>,
    pub message: String,
}

impl DrinkOptions {
    fn new(options: Vec<String>, message: &str) -> Self {
        DrinkOptions {
            options,
            message: message.to_string(),
        }
    }

    fn none(message: &str) -> Self {
        Self::new(vec![NO_ACCOMPANIMENT.to_string()], message)
    }

    /// True when the only option is "Ninguno".
    pub fn is_none_only(&self) -> bool {
        self.options.len() == 1 && self.options[0] == NO_ACCOMPANIMENT
    }
}

// =============================================================================
// Rule Book
// =============================================================================

/// Options per price-type sub-key for one family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyOptions {
    pub default: Vec<String>,
    #[serde(default)]
    pub liter: Option<Vec<String>>,
    #[serde(default)]
    pub cup: Option<Vec<String>>,
}

impl FamilyOptions {
    fn for_price_type(&self, price_type: PriceType) -> &[String] {
        let sub = match price_type {
            PriceType::Liter => self.liter.as_deref(),
            PriceType::Cup => self.cup.as_deref(),
            _ => None,
        };
        sub.unwrap_or(&self.default)
    }
}

/// A name-substring rule: products whose normalized name contains `key` get
/// `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRule {
    pub key: String,
    pub options: Vec<String>,
}

/// Immutable mixer rule tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleBook {
    pub special_products: Vec<NameRule>,
    pub digestivo_bottle: Vec<NameRule>,
    pub digestivo_cup: Vec<NameRule>,
    pub families: HashMap<LiquorFamily, FamilyOptions>,
    pub fallback: Vec<String>,
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn rule(key: &str, options: &[&str]) -> NameRule {
    NameRule {
        key: key.to_string(),
        options: labels(options),
    }
}

fn find_rule<'a>(rules: &'a [NameRule], normalized_name: &str) -> Option<&'a NameRule> {
    rules
        .iter()
        .find(|rule| normalized_name.contains(&normalize(&rule.key)))
}

impl RuleBook {
    /// The house rules.
    pub fn builtin() -> Self {
        let mut families = HashMap::new();
        families.insert(
            LiquorFamily::Tequila,
            FamilyOptions {
                default: labels(&["Squirt", "Coca", "Mineral", "Sprite"]),
                liter: None,
                cup: None,
            },
        );
        families.insert(
            LiquorFamily::Vodka,
            FamilyOptions {
                default: labels(&[
                    "Jugo de Naranja",
                    "Jugo de Arándano",
                    "Sprite",
                    "Mineral",
                    "Tónica",
                ]),
                liter: Some(labels(&["Jugo de Naranja", "Jugo de Arándano", "Sprite"])),
                cup: Some(labels(&["Rocas", "Derecho"])),
            },
        );
        families.insert(
            LiquorFamily::Ginebra,
            FamilyOptions {
                default: labels(&["Tónica", "Jugo de Toronja", "Sprite", "Mineral"]),
                liter: None,
                cup: None,
            },
        );
        families.insert(
            LiquorFamily::Ron,
            FamilyOptions {
                default: labels(&["Coca", "Sprite", "Mineral", "Manzana"]),
                liter: None,
                cup: None,
            },
        );
        families.insert(
            LiquorFamily::Whisky,
            FamilyOptions {
                default: labels(&["Mineral", "Agua", "Coca", "Ginger Ale"]),
                liter: None,
                cup: Some(labels(&["Rocas", "Derecho", "Mineral"])),
            },
        );

        RuleBook {
            special_products: vec![
                rule("BACARDI MANGO", &["Sprite", "Mineral", "Jugo de Piña"]),
                rule("BACARDI RASPBERRY", &["Sprite", "Mineral", "Jugo de Arándano"]),
                rule("MALIBU", &["Jugo de Piña", "Sprite", "Mineral"]),
            ],
            digestivo_bottle: vec![
                rule("LICOR 43", &["Botella de Agua", "Mineral"]),
                rule("CADENAS DULCE", &["Botella de Agua", "Mineral"]),
                rule("ZAMBUCA NEGRO", &["Botella de Agua", "Mineral"]),
            ],
            digestivo_cup: vec![rule("BAILEYS", &["Rocas"])],
            families,
            fallback: labels(&["Mineral", "Coca", "Manzana"]),
        }
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves mixer options against a [`RuleBook`].
#[derive(Debug, Clone)]
pub struct DrinkOptionResolver {
    rules: RuleBook,
}

impl Default for DrinkOptionResolver {
    fn default() -> Self {
        Self::new(RuleBook::builtin())
    }
}

impl DrinkOptionResolver {
    pub fn new(rules: RuleBook) -> Self {
        DrinkOptionResolver { rules }
    }

    /// Options for a selected product.
    pub fn resolve(&self, product: &Product) -> DrinkOptions {
        self.resolve_name(&product.name, Some(product))
    }

    /// Options for a product name, using the currently selected product (if
    /// any) for category, price type and catalog mixers. Without one the
    /// price type is taken to be a bottle.
    pub fn resolve_name(&self, product_name: &str, current: Option<&Product>) -> DrinkOptions {
        if product_name.trim().is_empty() {
            error!("Cannot resolve drink options for an empty product name");
            return DrinkOptions::none(MESSAGE_INVALID_PRODUCT);
        }

        // 1. Catalog mixers
        if let Some(mixers) = current.and_then(Product::dynamic_mixers) {
            let message = if is_soda_only(mixers) {
                MESSAGE_ONLY_SODAS
            } else {
                MESSAGE_DEFAULT
            };
            return DrinkOptions::new(mixers.to_vec(), message);
        }

        let family = classify(product_name, current.map(|p| p.category.as_str()));
        let name = normalize(product_name);
        let price_type = current.map_or(PriceType::Bottle, |p| p.price_type);
        debug!(product = product_name, %family, ?price_type, "Resolving drink options");

        // 2. Special products
        if let Some(rule) = find_rule(&self.rules.special_products, &name) {
            return DrinkOptions::new(rule.options.clone(), MESSAGE_SPECIAL);
        }

        match family {
            // 3. Digestivos
            LiquorFamily::Digestivos => return self.digestivo_options(&name, current),
            // 4. Espumosos
            LiquorFamily::Espumosos => return DrinkOptions::none(MESSAGE_NO_SODAS),
            _ => {}
        }

        // 5. Family table
        let options = match self.rules.families.get(&family) {
            Some(entry) => entry.for_price_type(price_type).to_vec(),
            None => self.rules.fallback.clone(),
        };

        let message = if matches!(family, LiquorFamily::Vodka | LiquorFamily::Ginebra) {
            MESSAGE_SPECIAL
        } else if is_soda_only(&options) {
            MESSAGE_ONLY_SODAS
        } else {
            MESSAGE_DEFAULT
        };

        DrinkOptions::new(options, message)
    }

    fn digestivo_options(&self, name: &str, current: Option<&Product>) -> DrinkOptions {
        let Some(product) = current else {
            return DrinkOptions::none(crate::NO_ACCOMPANIMENTS_TEXT);
        };

        match product.price_type {
            PriceType::Bottle => match find_rule(&self.rules.digestivo_bottle, name) {
                Some(rule) => DrinkOptions::new(rule.options.clone(), MESSAGE_DIGESTIVO_BOTTLE),
                None => DrinkOptions::none(MESSAGE_NO_SODAS),
            },
            PriceType::Cup => match find_rule(&self.rules.digestivo_cup, name) {
                Some(rule) => DrinkOptions::new(rule.options.clone(), MESSAGE_CUP),
                None => DrinkOptions::none(MESSAGE_NO_SODAS),
            },
            _ => DrinkOptions::none(MESSAGE_NO_SODAS),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use proptest::prelude::*;
    use rstest::rstest;

    fn product(name: &str, price_type: PriceType, category: &str) -> Product {
        Product::new(name, Money::from_cents(80000), price_type, category)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        labels(items)
    }

    #[test]
    fn test_bacardi_mango_bottle() {
        let resolver = DrinkOptionResolver::default();
        let result = resolver.resolve(&product("BACARDI MANGO", PriceType::Bottle, "ron"));

        assert_eq!(result.options, strings(&["Sprite", "Mineral", "Jugo de Piña"]));
        assert_eq!(result.message, MESSAGE_SPECIAL);
    }

    #[test]
    fn test_catalog_mixers_win() {
        let resolver = DrinkOptionResolver::default();
        let sodas = product("BACARDI MANGO", PriceType::Bottle, "ron")
            .with_mixers(strings(&["Coca", "Sprite"]));
        let result = resolver.resolve(&sodas);
        assert_eq!(result.options, strings(&["Coca", "Sprite"]));
        assert_eq!(result.message, MESSAGE_ONLY_SODAS);

        let mixed = product("ABSOLUT", PriceType::Bottle, "vodka")
            .with_mixers(strings(&["Jugo de Naranja", "Sprite"]));
        assert_eq!(resolver.resolve(&mixed).message, MESSAGE_DEFAULT);
    }

    #[test]
    fn test_empty_catalog_mixers_are_ignored() {
        let resolver = DrinkOptionResolver::default();
        let item = product("DON JULIO 70", PriceType::Bottle, "tequila").with_mixers(vec![]);
        let result = resolver.resolve(&item);
        assert_eq!(result.options, strings(&["Squirt", "Coca", "Mineral", "Sprite"]));
        assert_eq!(result.message, MESSAGE_ONLY_SODAS);
    }

    #[rstest]
    #[case("LICOR 43", PriceType::Bottle, &["Botella de Agua", "Mineral"], MESSAGE_DIGESTIVO_BOTTLE)]
    #[case("JAGERMEISTER", PriceType::Bottle, &["Ninguno"], MESSAGE_NO_SODAS)]
    #[case("BAILEYS", PriceType::Cup, &["Rocas"], MESSAGE_CUP)]
    #[case("FRANGELICO", PriceType::Cup, &["Ninguno"], MESSAGE_NO_SODAS)]
    #[case("LICOR 43", PriceType::Liter, &["Ninguno"], MESSAGE_NO_SODAS)]
    fn test_digestivos(
        #[case] name: &str,
        #[case] price_type: PriceType,
        #[case] expected: &[&str],
        #[case] message: &str,
    ) {
        let resolver = DrinkOptionResolver::default();
        let result = resolver.resolve(&product(name, price_type, "digestivos"));
        assert_eq!(result.options, strings(expected));
        assert_eq!(result.message, message);
    }

    #[test]
    fn test_espumosos_have_no_accompaniment() {
        let resolver = DrinkOptionResolver::default();
        let result = resolver.resolve(&product("MOET CHANDON", PriceType::Bottle, "espumosos"));
        assert!(result.is_none_only());
        assert_eq!(result.message, MESSAGE_NO_SODAS);
    }

    #[rstest]
    #[case(PriceType::Bottle, &["Jugo de Naranja", "Jugo de Arándano", "Sprite", "Mineral", "Tónica"])]
    #[case(PriceType::Liter, &["Jugo de Naranja", "Jugo de Arándano", "Sprite"])]
    #[case(PriceType::Cup, &["Rocas", "Derecho"])]
    fn test_family_sub_keys(#[case] price_type: PriceType, #[case] expected: &[&str]) {
        let resolver = DrinkOptionResolver::default();
        let result = resolver.resolve(&product("ABSOLUT AZUL", price_type, "vodka"));
        assert_eq!(result.options, strings(expected));
    }

    #[test]
    fn test_family_without_entry_uses_fallback() {
        let resolver = DrinkOptionResolver::default();
        let result = resolver.resolve(&product("HENNESSY VS", PriceType::Bottle, "cognac"));
        assert_eq!(result.options, strings(&["Mineral", "Coca", "Manzana"]));
        assert_eq!(result.message, MESSAGE_ONLY_SODAS);
    }

    #[test]
    fn test_whisky_options_count_as_sodas() {
        let resolver = DrinkOptionResolver::default();
        let result = resolver.resolve(&product("CHIVAS 12", PriceType::Bottle, "whisky"));
        // "Agua" is not a juice, so every option is a soda
        assert_eq!(result.message, MESSAGE_ONLY_SODAS);
    }

    #[test]
    fn test_invalid_name() {
        let resolver = DrinkOptionResolver::default();
        let result = resolver.resolve_name("  ", None);
        assert_eq!(result.options, strings(&["Ninguno"]));
        assert_eq!(result.message, MESSAGE_INVALID_PRODUCT);
    }

    #[test]
    fn test_resolve_name_without_current_product_assumes_bottle() {
        let resolver = DrinkOptionResolver::default();
        let result = resolver.resolve_name("SMIRNOFF", None);
        assert_eq!(result.options.len(), 5);
        assert_eq!(result.message, MESSAGE_SPECIAL);
    }

    #[rstest]
    #[case("Jugo de Piña", true)]
    #[case("JARRA DE NARANJA", true)]
    #[case("Arandano", true)]
    #[case("Sprite", false)]
    #[case("Mineral", false)]
    fn test_is_juice_option(#[case] option: &str, #[case] expected: bool) {
        assert_eq!(is_juice_option(option), expected);
    }

    #[test]
    fn test_is_soda_only() {
        assert!(is_soda_only(&strings(&["Coca", "Sprite"])));
        assert!(!is_soda_only(&strings(&["Coca", "Jugo de Piña"])));
        assert!(!is_soda_only(&strings(&["Ninguno"])));
        assert!(!is_soda_only(&[]));
    }

    #[test]
    fn test_special_mode() {
        assert!(is_special_mode(LiquorFamily::Vodka, "ABSOLUT"));
        assert!(is_special_mode(LiquorFamily::Ginebra, "BOMBAY"));
        assert!(is_special_mode(LiquorFamily::Ron, "Malibú"));
        assert!(!is_special_mode(LiquorFamily::Ron, "BACARDI BLANCO"));
        assert!(!is_special_mode(LiquorFamily::Tequila, "MALIBU"));
    }

    proptest! {
        #[test]
        fn prop_vodka_and_ginebra_get_special_message(
            name in "[A-Z][A-Z ]{2,19}",
            gin in any::<bool>(),
            price_type in prop_oneof![
                Just(PriceType::Bottle),
                Just(PriceType::Liter),
                Just(PriceType::Cup),
            ],
        ) {
            let category = if gin { "ginebra" } else { "vodka" };
            let resolver = DrinkOptionResolver::default();
            let result = resolver.resolve(&product(&name, price_type, category));
            prop_assert_eq!(result.message, MESSAGE_SPECIAL);
        }
    }
}
