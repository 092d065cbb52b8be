//! # Liquor Classifier
//!
//! Maps a product to its [`LiquorFamily`].
//!
//! ## Lookup Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Menu section     category "Vodka" ──────────────────► VODKA         │
//! │                      (case-insensitive family tag)                      │
//! │                                                                         │
//! │  2. Brand keywords   "SMIRNOFF TAMARINDO" ─ contains ──► VODKA          │
//! │                      families tried in fixed priority order,            │
//! │                      first match wins                                   │
//! │                                                                         │
//! │  3. Nothing matched / empty name ───────────────────────► OTROS         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Keyword matching is a plain substring test on the normalized name, so
//! short keywords catch more than their brand ("GIN" also matches
//! "GINGER"). Callers that know the menu section should pass it.

use crate::text::normalize;
use crate::types::LiquorFamily;

/// Brand and keyword lists per family, in matching priority order.
pub const FAMILY_KEYWORDS: &[(LiquorFamily, &[&str])] = &[
    (
        LiquorFamily::Ron,
        &["RON", "BACARDI", "MATUSALEM", "CAPITAN MORGAN", "MALIBU", "ZACAPA"],
    ),
    (
        LiquorFamily::Tequila,
        &[
            "TEQUILA",
            "DON JULIO",
            "HERRADURA",
            "JOSE CUERVO",
            "1800",
            "MAESTRO DOBEL",
            "CENTENARIO",
            "TRADICIONAL",
        ],
    ),
    (
        LiquorFamily::Brandy,
        &["BRANDY", "TORRES", "TERRY", "DON PEDRO", "AZTECA DE ORO"],
    ),
    (
        LiquorFamily::Whisky,
        &[
            "WHISKY",
            "WHISKEY",
            "BUCHANANS",
            "JOHNNIE WALKER",
            "CHIVAS",
            "JACK DANIELS",
            "JAMESON",
            "MACALLAN",
            "OLD PARR",
            "BLACK & WHITE",
        ],
    ),
    (
        LiquorFamily::Vodka,
        &["VODKA", "ABSOLUT", "SMIRNOFF", "GREY GOOSE", "STOLICHNAYA", "WYBOROWA"],
    ),
    (
        LiquorFamily::Ginebra,
        &["GINEBRA", "GIN", "BOMBAY", "TANQUERAY", "BEEFEATER", "HENDRICKS"],
    ),
    (
        LiquorFamily::Mezcal,
        &["MEZCAL", "400 CONEJOS", "ALIPUS", "MONTELOBOS", "UNION"],
    ),
    (
        LiquorFamily::Cognac,
        &["COGNAC", "MARTELL", "HENNESSY", "REMY MARTIN"],
    ),
    (
        LiquorFamily::Digestivos,
        &[
            "LICOR 43",
            "BAILEYS",
            "JAGERMEISTER",
            "SAMBUCA",
            "ANIS",
            "CHINCHON",
            "VACCARI",
            "FRANGELICO",
            "AMARETTO",
            "KAHLUA",
            "MIDORI",
            "CONTROY",
            "LICOR DE MELON",
            "LICOR DE CACAO",
            "LICOR DE CAFE",
            "LICOR DE MENTA",
            "LICOR DE DURAZNO",
            "LICOR DE FRESA",
            "LICOR DE PLATANO",
            "LICOR DE CASIS",
            "LICOR DE COCO",
            "LICOR DE MANZANA",
            "LICOR DE FRAMBUESA",
            "LICOR DE ZARZAMORA",
            "LICOR DE ARANDANO",
            "LICOR DE GRANADA",
            "LICOR DE MANDARINA",
            "LICOR DE NARANJA",
            "LICOR DE LIMON",
            "LICOR DE TORONJA",
            "LICOR DE PINA",
            "LICOR DE GUAYABA",
            "LICOR DE MANGO",
            "LICOR DE TAMARINDO",
            "LICOR DE JAMAICA",
            "LICOR DE HORCHATA",
            "LICOR DE VAINILLA",
            "LICOR DE CHOCOLATE",
            "LICOR DE ALMENDRA",
            "LICOR DE AVELLANA",
            "LICOR DE NUEZ",
            "LICOR DE CAJETA",
            "LICOR DE ROMPOPE",
            "LICOR DE CREMA",
            "LICOR DE LECHE",
            "LICOR DE MIEL",
            "LICOR DE AGAVE",
            "LICOR DE CANA",
        ],
    ),
    (
        LiquorFamily::Espumosos,
        &[
            "CHAMPAGNE",
            "ESPUMOSO",
            "CAVA",
            "PROSECCO",
            "MOET",
            "DOM PERIGNON",
            "VEUVE CLICQUOT",
            "MUMM",
            "CHANDON",
            "FREIXENET",
            "ASTI",
            "LAMBRUSCO",
            "SIDRA",
        ],
    ),
];

/// Classifies a product into a liquor family.
///
/// `category` is the menu section the product came from. When it names a
/// family it is authoritative.
///
/// ## Example
/// ```rust
/// use comanda_core::liquor::classify;
/// use comanda_core::LiquorFamily;
///
/// assert_eq!(classify("Absolut Azul", None), LiquorFamily::Vodka);
/// assert_eq!(classify("Casa Madero", Some("brandy")), LiquorFamily::Brandy);
/// assert_eq!(classify("Agua Mineral", Some("refrescos")), LiquorFamily::Otros);
/// ```
pub fn classify(product_name: &str, category: Option<&str>) -> LiquorFamily {
    if let Some(family) = category.and_then(LiquorFamily::from_tag) {
        if family != LiquorFamily::Otros {
            return family;
        }
    }

    let name = normalize(product_name);
    if name.is_empty() {
        return LiquorFamily::Otros;
    }

    FAMILY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| name.contains(kw)))
        .map(|(family, _)| *family)
        .unwrap_or(LiquorFamily::Otros)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("BACARDI BLANCO", LiquorFamily::Ron)]
    #[case("Malibu", LiquorFamily::Ron)]
    #[case("DON JULIO 70", LiquorFamily::Tequila)]
    #[case("TORRES 10", LiquorFamily::Brandy)]
    #[case("Buchanans 12", LiquorFamily::Whisky)]
    #[case("ABSOLUT AZUL 750 ML", LiquorFamily::Vodka)]
    #[case("TANQUERAY", LiquorFamily::Ginebra)]
    #[case("400 CONEJOS", LiquorFamily::Mezcal)]
    #[case("HENNESSY VS", LiquorFamily::Cognac)]
    #[case("Jägermeister", LiquorFamily::Digestivos)]
    #[case("Licor de Piña", LiquorFamily::Digestivos)]
    #[case("MOET CHANDON", LiquorFamily::Espumosos)]
    #[case("AGUA NATURAL", LiquorFamily::Otros)]
    fn test_classify_by_name(#[case] name: &str, #[case] expected: LiquorFamily) {
        assert_eq!(classify(name, None), expected);
    }

    #[rstest]
    #[case("vodka", LiquorFamily::Vodka)]
    #[case("GINEBRA", LiquorFamily::Ginebra)]
    #[case("Digestivos", LiquorFamily::Digestivos)]
    fn test_category_wins_over_name(#[case] category: &str, #[case] expected: LiquorFamily) {
        // "BACARDI" would match RON by keyword
        assert_eq!(classify("BACARDI", Some(category)), expected);
    }

    #[test]
    fn test_unknown_category_falls_back_to_keywords() {
        assert_eq!(classify("SMIRNOFF", Some("licores")), LiquorFamily::Vodka);
        assert_eq!(classify("SMIRNOFF", Some("otros")), LiquorFamily::Vodka);
    }

    #[test]
    fn test_empty_name_is_otros() {
        assert_eq!(classify("", None), LiquorFamily::Otros);
        assert_eq!(classify("   ", Some("cervezas")), LiquorFamily::Otros);
    }

    #[test]
    fn test_priority_order_first_match_wins() {
        // Contains both a RON and a VODKA keyword
        assert_eq!(classify("BACARDI VODKA MIX", None), LiquorFamily::Ron);
    }

    #[test]
    fn test_keyword_table_covers_every_family_but_otros() {
        let families: Vec<_> = FAMILY_KEYWORDS.iter().map(|(f, _)| *f).collect();
        assert_eq!(&families[..], &LiquorFamily::ALL[..10]);
    }
}
