//! # Selection Counter
//!
//! Accumulates the mixer choices for the product being customized.
//!
//! ## Modes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Counter (bottles)                                                      │
//! │    Sprite   [-] 2 [+]          increments are checked against a cap     │
//! │    Mineral  [-] 1 [+]                                                   │
//! │                                                                         │
//! │    Cap::Total(5)   sum of all counts ≤ 5                                │
//! │    Cap::Combined   (juice, soda) must stay inside:                      │
//! │                                                                         │
//! │         soda │ 0  1  2  3  4  5                                         │
//! │       juice ─┼──────────────────                                        │
//! │          0   │ ✓  ✓  ✓  ✓  ✓  ✓     2 pitchers                          │
//! │          1   │ ✓  ✓  ✓  ✗  ✗  ✗     OR 5 sodas                          │
//! │          2   │ ✓  ✗  ✗  ✗  ✗  ✗     OR 1 pitcher + 2 sodas              │
//! │                                                                         │
//! │  Single (liters, cups, "Ninguno"-only lists)                            │
//! │    ( ) Rocas  (•) Derecho      choosing replaces the selection          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariant
//! In counter mode `selected_options` is exactly the set of options with a
//! count above zero, in the order they were first incremented. In single
//! mode it holds at most one option and there are no counts.
//!
//! A rejected increment is not an error. The caller gets `None` and leaves
//! its display unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::drinks::{is_juice_option, is_soda_only, is_special_mode};
use crate::liquor::classify;
use crate::types::{CookingTerm, PriceType, Product};
use crate::{
    MAX_DRINK_COUNT, MAX_JUICE_COUNT, MAX_SODA_COUNT, MAX_SODA_WITH_ONE_JUICE, NO_ACCOMPANIMENT,
};

// =============================================================================
// Mode
// =============================================================================

/// Limit applied to counter-mode increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cap {
    /// The juice-pitcher/soda combination rule.
    Combined,
    /// A plain limit on the sum of all counts.
    Total(u32),
}

impl Cap {
    /// Whether a (juice, soda) pair is inside this cap.
    pub fn allows(&self, juice: u32, soda: u32) -> bool {
        match self {
            Cap::Combined => {
                juice <= MAX_JUICE_COUNT
                    && soda <= MAX_SODA_COUNT
                    && !(juice == MAX_JUICE_COUNT && soda > 0)
                    && !(juice == 1 && soda > MAX_SODA_WITH_ONE_JUICE)
            }
            Cap::Total(max) => juice + soda <= *max,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMode {
    Counter(Cap),
    Single,
}

// =============================================================================
// State
// =============================================================================

/// The choices made so far for one in-progress customization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub selected_options: Vec<String>,
    pub option_counts: BTreeMap<String, u32>,
    pub cooking_term: Option<CookingTerm>,
}

/// Reducer actions accepted by [`SelectionCounter::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionAction {
    Increment(String),
    Decrement(String),
    Choose(String),
    SetCookingTerm(CookingTerm),
    Reset,
}

/// What a dispatched action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The option's count after the action.
    Count(u32),
    /// The action was refused; state is unchanged.
    Rejected,
    /// The state changed and there is no count to report.
    Updated,
}

impl From<Option<u32>> for SelectionOutcome {
    fn from(count: Option<u32>) -> Self {
        count.map_or(SelectionOutcome::Rejected, SelectionOutcome::Count)
    }
}

// =============================================================================
// Counter
// =============================================================================

/// Selection state machine for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionCounter {
    mode: SelectionMode,
    offered: Vec<String>,
    soda_only: bool,
    state: SelectionState,
}

impl SelectionCounter {
    /// Creates a counter over an explicit option list.
    pub fn new(mode: SelectionMode, offered: Vec<String>) -> Self {
        let soda_only = is_soda_only(&offered);
        SelectionCounter {
            mode,
            offered,
            soda_only,
            state: SelectionState::default(),
        }
    }

    /// Picks the mode for a product and its resolved options.
    ///
    /// Liters and cups choose a single option, as do lists that only offer
    /// "Ninguno". Bottles count, under the combined cap when the product is
    /// in special mode and under the total cap otherwise.
    pub fn for_product(product: &Product, options: &[String]) -> Self {
        let none_only = options.len() == 1 && options[0] == NO_ACCOMPANIMENT;
        let mode = match product.price_type {
            PriceType::Liter | PriceType::Cup => SelectionMode::Single,
            _ if none_only => SelectionMode::Single,
            _ => {
                let family = classify(&product.name, Some(&product.category));
                if is_special_mode(family, &product.name) {
                    SelectionMode::Counter(Cap::Combined)
                } else {
                    SelectionMode::Counter(Cap::Total(MAX_DRINK_COUNT))
                }
            }
        };
        debug!(product = %product.name, ?mode, "Selection counter created");
        Self::new(mode, options.to_vec())
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn offered(&self) -> &[String] {
        &self.offered
    }

    /// True when every offered option is a soda.
    pub fn is_soda_only(&self) -> bool {
        self.soda_only
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selected_options(&self) -> &[String] {
        &self.state.selected_options
    }

    pub fn count(&self, option: &str) -> u32 {
        self.state.option_counts.get(option).copied().unwrap_or(0)
    }

    pub fn cooking_term(&self) -> Option<CookingTerm> {
        self.state.cooking_term
    }

    /// Sum of all counts.
    pub fn total_count(&self) -> u32 {
        self.state.option_counts.values().sum()
    }

    /// Sum of counts for juice options.
    pub fn total_juice_count(&self) -> u32 {
        self.state
            .option_counts
            .iter()
            .filter(|(option, _)| is_juice_option(option))
            .map(|(_, count)| count)
            .sum()
    }

    fn is_offered(&self, option: &str) -> bool {
        self.offered.iter().any(|offered| offered == option)
    }

    /// Adds one of `option`. Returns the new count, or `None` when the
    /// increment would break the cap (or the option cannot be counted).
    pub fn increment(&mut self, option: &str) -> Option<u32> {
        let SelectionMode::Counter(cap) = self.mode else {
            return None;
        };
        if option == NO_ACCOMPANIMENT || !self.is_offered(option) {
            return None;
        }

        let juice = self.total_juice_count();
        let soda = self.total_count() - juice;
        let (juice, soda) = if is_juice_option(option) {
            (juice + 1, soda)
        } else {
            (juice, soda + 1)
        };
        if !cap.allows(juice, soda) {
            debug!(option, juice, soda, ?cap, "Increment rejected");
            return None;
        }

        // A counted option replaces an explicit "Ninguno"
        self.state
            .selected_options
            .retain(|selected| selected != NO_ACCOMPANIMENT);

        let count = self.state.option_counts.entry(option.to_string()).or_insert(0);
        *count += 1;
        let count = *count;
        if !self.state.selected_options.iter().any(|s| s == option) {
            self.state.selected_options.push(option.to_string());
        }
        Some(count)
    }

    /// Removes one of `option`. Returns the new count, or `None` when the
    /// count was already zero.
    pub fn decrement(&mut self, option: &str) -> Option<u32> {
        let current = self.count(option);
        if current == 0 {
            return None;
        }

        let next = current - 1;
        if next == 0 {
            self.state.option_counts.remove(option);
            self.state.selected_options.retain(|selected| selected != option);
        } else {
            self.state.option_counts.insert(option.to_string(), next);
        }
        Some(next)
    }

    /// Makes `option` the only selection and clears every count. "Ninguno"
    /// can always be chosen; other options must be offered.
    pub fn choose(&mut self, option: &str) -> bool {
        if option != NO_ACCOMPANIMENT && !self.is_offered(option) {
            return false;
        }
        self.state.selected_options = vec![option.to_string()];
        self.state.option_counts.clear();
        true
    }

    pub fn set_cooking_term(&mut self, term: CookingTerm) {
        self.state.cooking_term = Some(term);
    }

    /// Clears counts, selections and the cooking term.
    pub fn reset(&mut self) {
        self.state = SelectionState::default();
    }

    /// Applies one action, reducer style.
    pub fn dispatch(&mut self, action: SelectionAction) -> SelectionOutcome {
        match action {
            SelectionAction::Increment(option) => self.increment(&option).into(),
            SelectionAction::Decrement(option) => self.decrement(&option).into(),
            SelectionAction::Choose(option) => {
                if self.choose(&option) {
                    SelectionOutcome::Updated
                } else {
                    SelectionOutcome::Rejected
                }
            }
            SelectionAction::SetCookingTerm(term) => {
                self.set_cooking_term(term);
                SelectionOutcome::Updated
            }
            SelectionAction::Reset => {
                self.reset();
                SelectionOutcome::Updated
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
