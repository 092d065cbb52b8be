//! # Product Name Formatter
//!
//! Builds what goes on the ticket for a customized drink:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Product  "ABSOLUT AZUL 750 ML" @ precioBotella                         │
//! │  Counts   Sprite ×2, Jugo de Arándano ×1                                │
//! │                                                                         │
//! │  prefix              "Botella"                                          │
//! │  name                "ABSOLUT AZUL"          (size suffix stripped)     │
//! │  customization_text  "Con: 2x Sprite, 1x Jugo de Arándano"              │
//! │  customizations      ["2x Sprite", "1x Jugo de Arándano"]               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::selection::SelectionState;
use crate::text::normalize;
use crate::types::{PriceType, Product};
use crate::{NO_ACCOMPANIMENT, NO_ACCOMPANIMENTS_TEXT};

/// The bottle that may carry a "2 Boost" add-on.
const JAGER: &str = "JAGERMEISTER";
const JAGER_BOOST: &str = "2 Boost";

/// Ticket text for one customized product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedProduct {
    pub prefix: String,
    pub name: String,
    pub customization_text: String,
    /// The individual entries stored on the line item.
    pub customizations: Vec<String>,
}

impl FormattedProduct {
    /// `"Botella ABSOLUT AZUL"`, or just the name when there is no prefix.
    pub fn display_name(&self) -> String {
        display_name(&self.prefix, &self.name)
    }
}

fn display_name(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{} {}", prefix, name)
    }
}

/// Line item name for a liquor served without customization.
pub fn plain_display_name(product: &Product) -> String {
    display_name(product.price_type.prefix(), &strip_size_suffix(&product.name))
}

/// Removes the first `NN ML` size marker (with its surrounding spaces) from a
/// product name. Case-insensitive.
///
/// ## Example
/// ```rust
/// use comanda_core::formatter::strip_size_suffix;
///
/// assert_eq!(strip_size_suffix("ABSOLUT AZUL 750 ML"), "ABSOLUT AZUL");
/// assert_eq!(strip_size_suffix("Buchanans 12 años 1000ml"), "Buchanans 12 años");
/// ```
pub fn strip_size_suffix(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();

    for start in 0..chars.len() {
        let mut idx = start;
        while idx < chars.len() && chars[idx].is_whitespace() {
            idx += 1;
        }
        let digits_start = idx;
        while idx < chars.len() && chars[idx].is_ascii_digit() {
            idx += 1;
        }
        if idx == digits_start {
            continue;
        }
        while idx < chars.len() && chars[idx].is_whitespace() {
            idx += 1;
        }
        let is_ml = idx + 1 < chars.len()
            && chars[idx].eq_ignore_ascii_case(&'m')
            && chars[idx + 1].eq_ignore_ascii_case(&'l');
        if is_ml {
            let mut out: String = chars[..start].iter().collect();
            out.extend(&chars[idx + 2..]);
            return out.trim().to_string();
        }
    }

    name.trim().to_string()
}

/// Formats a product and its selection for the ticket.
pub fn format(product: &Product, selection: &SelectionState) -> FormattedProduct {
    let prefix = product.price_type.prefix().to_string();
    let name = strip_size_suffix(&product.name);
    let selected = &selection.selected_options;

    let is_jager_bottle =
        product.price_type == PriceType::Bottle && normalize(&product.name).contains(JAGER);

    let entries: Vec<String> = if is_jager_bottle
        && selected.iter().any(|s| s == JAGER_BOOST)
    {
        vec![JAGER_BOOST.to_string()]
    } else if selection.option_counts.values().any(|count| *count > 0) {
        selected
            .iter()
            .filter_map(|option| {
                selection
                    .option_counts
                    .get(option)
                    .filter(|count| **count > 0)
                    .map(|count| format!("{}x {}", count, option))
            })
            .collect()
    } else {
        match selected.first() {
            Some(option) if option != NO_ACCOMPANIMENT => vec![option.clone()],
            _ => Vec::new(),
        }
    };

    let customization_text = match entries.as_slice() {
        [] => NO_ACCOMPANIMENTS_TEXT.to_string(),
        [single] if selection.option_counts.is_empty() => match product.price_type {
            PriceType::Liter => format!("Mezclador: {}", single),
            PriceType::Cup => format!("Estilo: {}", single),
            _ => format!("Con: {}", single),
        },
        many => format!("Con: {}", many.join(", ")),
    };

    // A drink with no mixer still says so on the ticket
    let customizations = if entries.is_empty() {
        vec![NO_ACCOMPANIMENTS_TEXT.to_string()]
    } else {
        entries
    };

    FormattedProduct {
        prefix,
        name,
        customization_text,
        customizations,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
