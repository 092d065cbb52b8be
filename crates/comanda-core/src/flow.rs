//! # Customization Flows
//!
//! Which customization a product needs before it can go on the ticket.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  category pizzas/alitas/sopas/ensaladas ──► Food       "Con todo" or    │
//! │                                                        "Sin: <text>"    │
//! │  category carnes ─────────────────────────► Meat       cooking term +   │
//! │                                                        garnish          │
//! │  category platos fuertes ─────────────────► MainCourse garnish only     │
//! │  bottle/liter/cup and (family ≠ OTROS                                   │
//! │                        or catalog mixers) ► Drinks     mixer selection  │
//! │  anything else ───────────────────────────► Direct     added as is      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::liquor::classify;
use crate::text::fold_accents;
use crate::types::{CookingTerm, LiquorFamily, Product};
use crate::validation::validate_modifications;

pub const FOOD_CATEGORIES: [&str; 4] = ["pizzas", "alitas", "sopas", "ensaladas"];
pub const MEAT_CATEGORY: &str = "carnes";
pub const MAIN_COURSE_CATEGORY: &str = "platos fuertes";

pub const KEEP_EVERYTHING: &str = "Con todo";
pub const STANDARD_GARNISH: &str = "Guarnición estándar";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Flow {
    Food,
    Meat,
    MainCourse,
    Drinks,
    Direct,
}

impl Flow {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Flow::Food => "food",
            Flow::Meat => "meat",
            Flow::MainCourse => "main-course",
            Flow::Drinks => "drinks",
            Flow::Direct => "direct",
        }
    }

    /// True for the flows that need a cooking term.
    pub const fn needs_cooking_term(&self) -> bool {
        matches!(self, Flow::Meat)
    }

    /// Fails with `FlowMismatch` unless `self` is one of `allowed`.
    pub fn ensure(&self, product: &Product, allowed: &[Flow], requested: Flow) -> CoreResult<()> {
        if allowed.contains(self) {
            Ok(())
        } else {
            Err(CoreError::FlowMismatch {
                product: product.name.clone(),
                expected: self.to_string(),
                requested: requested.to_string(),
            })
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized menu section: accents folded, lower case, trimmed.
pub fn normalize_category(category: &str) -> String {
    fold_accents(category.trim()).to_lowercase()
}

/// Decides the flow for a selected product.
pub fn customization_flow(product: &Product) -> Flow {
    let category = normalize_category(&product.category);

    if FOOD_CATEGORIES.contains(&category.as_str()) {
        return Flow::Food;
    }
    if category == MEAT_CATEGORY {
        return Flow::Meat;
    }
    if category == MAIN_COURSE_CATEGORY {
        return Flow::MainCourse;
    }
    if product.price_type.is_liquor_serving() {
        let family = classify(&product.name, Some(&product.category));
        if family != LiquorFamily::Otros || product.dynamic_mixers().is_some() {
            return Flow::Drinks;
        }
    }
    Flow::Direct
}

/// Customizations for a food dish. `None` keeps every ingredient; otherwise
/// the text lists what to leave out.
pub fn food_customizations(removed: Option<&str>) -> CoreResult<Vec<String>> {
    match removed {
        None => Ok(vec![KEEP_EVERYTHING.to_string()]),
        Some(text) => {
            let text = text.trim();
            validate_modifications(text)?;
            if text.is_empty() {
                Ok(Vec::new())
            } else {
                Ok(vec![format!("Sin: {}", text)])
            }
        }
    }
}

/// Customizations for meat: the cooking term, then the garnish.
///
/// `None` keeps the standard garnish. Blank text adds nothing after the
/// term; any other text is the requested change.
pub fn meat_customizations(term: CookingTerm, garnish: Option<&str>) -> CoreResult<Vec<String>> {
    let mut customizations = vec![term.label().to_string()];
    match garnish.map(str::trim) {
        None => customizations.push(STANDARD_GARNISH.to_string()),
        Some("") => {}
        Some(text) => {
            validate_modifications(text)?;
            customizations.push(format!("Guarnición: {}", text));
        }
    }
    Ok(customizations)
}

/// Customizations for a main course. No cooking term; `None` or blank text
/// keeps the standard garnish.
pub fn main_course_customizations(garnish: Option<&str>) -> CoreResult<Vec<String>> {
    match garnish.map(str::trim).filter(|g| !g.is_empty()) {
        None => Ok(vec![STANDARD_GARNISH.to_string()]),
        Some(text) => {
            validate_modifications(text)?;
            Ok(vec![format!("Guarnición: {}", text)])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::PriceType;
    use rstest::rstest;

    fn product(name: &str, price_type: PriceType, category: &str) -> Product {
        Product::new(name, Money::from_cents(10000), price_type, category)
    }

    #[rstest]
    #[case("PIZZA HAWAIANA", PriceType::Simple, "pizzas", Flow::Food)]
    #[case("ALITAS BBQ", PriceType::Simple, "Alitas", Flow::Food)]
    #[case("RIB EYE", PriceType::Simple, "carnes", Flow::Meat)]
    #[case("MOLCAJETE", PriceType::Simple, "Platos Fuertes", Flow::MainCourse)]
    #[case("ABSOLUT", PriceType::Bottle, "vodka", Flow::Drinks)]
    #[case("DON JULIO", PriceType::Cup, "licores", Flow::Drinks)]
    #[case("HIPNOTIQ", PriceType::Bottle, "licores", Flow::Direct)]
    #[case("CORONA", PriceType::Simple, "cervezas", Flow::Direct)]
    fn test_customization_flow(
        #[case] name: &str,
        #[case] price_type: PriceType,
        #[case] category: &str,
        #[case] expected: Flow,
    ) {
        assert_eq!(customization_flow(&product(name, price_type, category)), expected);
    }

    #[test]
    fn test_catalog_mixers_force_drinks_flow() {
        let item = product("HIPNOTIQ", PriceType::Bottle, "licores")
            .with_mixers(vec!["Sprite".to_string()]);
        assert_eq!(customization_flow(&item), Flow::Drinks);
    }

    #[test]
    fn test_food_customizations() {
        assert_eq!(food_customizations(None).unwrap(), vec!["Con todo"]);
        assert_eq!(
            food_customizations(Some(" cebolla, chile ")).unwrap(),
            vec!["Sin: cebolla, chile"]
        );
        assert!(food_customizations(Some("  ")).unwrap().is_empty());
    }

    #[test]
    fn test_meat_customizations() {
        assert_eq!(
            meat_customizations(CookingTerm::Medio, None).unwrap(),
            vec!["Término ½", "Guarnición estándar"]
        );
        assert_eq!(
            meat_customizations(CookingTerm::BienCocido, Some("papas en vez de arroz")).unwrap(),
            vec!["Bien Cocido", "Guarnición: papas en vez de arroz"]
        );
    }

    #[test]
    fn test_meat_with_blank_garnish_keeps_only_the_term() {
        assert_eq!(
            meat_customizations(CookingTerm::TresCuartos, Some("   ")).unwrap(),
            vec!["Término ¾"]
        );
    }

    #[rstest]
    #[case(None, "Guarnición estándar")]
    #[case(Some(""), "Guarnición estándar")]
    #[case(Some(" arroz blanco "), "Guarnición: arroz blanco")]
    fn test_main_course_customizations(#[case] garnish: Option<&str>, #[case] expected: &str) {
        assert_eq!(main_course_customizations(garnish).unwrap(), vec![expected]);
    }

    #[test]
    fn test_only_meat_needs_a_cooking_term() {
        assert!(Flow::Meat.needs_cooking_term());
        assert!(!Flow::MainCourse.needs_cooking_term());
        assert!(!Flow::Food.needs_cooking_term());
    }

    #[test]
    fn test_long_modification_is_rejected() {
        let text = "x".repeat(201);
        assert!(matches!(
            food_customizations(Some(&text)),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_flow_ensure() {
        let pizza = product("PIZZA", PriceType::Simple, "pizzas");
        assert!(Flow::Food.ensure(&pizza, &[Flow::Food], Flow::Food).is_ok());

        let err = Flow::Food
            .ensure(&pizza, &[Flow::Drinks], Flow::Drinks)
            .unwrap_err();
        assert_eq!(err.to_string(), "PIZZA requires the food flow, not drinks");
    }
}
