//! # Text Normalization
//!
//! Menu names arrive in whatever case and accenting the catalog was typed in
//! ("Jägermeister", "Tequila Añejo", "jugo de piña"). Every rule lookup in
//! this crate compares **normalized** text: accents folded to their base
//! letter, then uppercased.
//!
//! ```text
//! "Jägermeister 700 ml"  ──►  "JAGERMEISTER 700 ML"
//! "Jugo de Piña"         ──►  "JUGO DE PINA"
//! ```

/// Folds a single accented Latin letter to its unaccented base letter.
/// Covers the Latin-1 accents found on Spanish menus; any other character
/// is returned unchanged.
fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' | 'å' => 'a',
        'Á' | 'À' | 'Ä' | 'Â' | 'Ã' | 'Å' => 'A',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'É' | 'È' | 'Ë' | 'Ê' => 'E',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'Ó' | 'Ò' | 'Ö' | 'Ô' | 'Õ' => 'O',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ç' => 'c',
        'Ç' => 'C',
        other => other,
    }
}

/// Removes diacritics from Spanish/Latin text, keeping case.
pub fn fold_accents(input: &str) -> String {
    input.chars().map(fold_char).collect()
}

/// Accent-folds, uppercases and trims. The key form for every rule table.
///
/// ## Example
/// ```rust
/// use comanda_core::text::normalize;
///
/// assert_eq!(normalize("  Jugo de Piña "), "JUGO DE PINA");
/// ```
pub fn normalize(input: &str) -> String {
    fold_accents(input.trim()).to_uppercase()
}
