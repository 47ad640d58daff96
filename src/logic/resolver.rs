//! Combination Resolver
//!
//! Given the valid combinations of a product and a (possibly partial)
//! selection, decides which values stay selectable per attribute, whether the
//! selection has a price, and how to auto-correct an invalid selection.
//!
//! # Design
//!
//! - **Pure logic**: No I/O, no hidden state. Every call is a function of its inputs
//! - **Order preserving**: Availability lists keep catalog order, first-seen wins
//! - **Never fails**: Unset values are unconstrained, an empty catalog is just empty
//!
//! # Resolution Rules
//!
//! | Operation          | Filters on | Result |
//! |--------------------|------------|--------|
//! | `available_values` | the other three attributes | distinct target values |
//! | `is_priceable`     | all four attributes | exact row exists |
//! | `reconcile`        | other three, then preceding attributes | corrected selection |

use tracing::{debug, warn};

use crate::types::{Attribute, AttributeValue, Combination, Selection};

/// Upper bound on full correction passes in [`reconcile`].
pub const MAX_RECONCILE_PASSES: usize = 4;

// ============================================================================
// Availability
// ============================================================================

/// Values of `target` that, together with the other three selected values,
/// appear in at least one combination.
///
/// The current value of `target` is never used as a filter. Unset attributes
/// match every row. The result keeps catalog order and holds no duplicates;
/// an empty result means no combination exists for any value of `target`.
pub fn available_values(
    catalog: &[Combination],
    selection: &Selection,
    target: Attribute,
) -> Vec<AttributeValue> {
    distinct_values(
        catalog
            .iter()
            .filter(|row| target.others().all(|a| row.agrees_with(selection, a))),
        target,
    )
}

/// Values of `target` consistent with the attributes that precede it in
/// correction order. Used by [`reconcile`] when the strict view is empty.
fn prefix_values(
    catalog: &[Combination],
    selection: &Selection,
    target: Attribute,
) -> Vec<AttributeValue> {
    distinct_values(
        catalog
            .iter()
            .filter(|row| target.preceding().all(|a| row.agrees_with(selection, a))),
        target,
    )
}

fn distinct_values<'a>(
    rows: impl Iterator<Item = &'a Combination>,
    target: Attribute,
) -> Vec<AttributeValue> {
    let mut values: Vec<AttributeValue> = Vec::new();
    for row in rows {
        let value = row.value(target);
        if !values.contains(&value) {
            values.push(value);
        }
    }
    values
}

/// All four availability lists for a selection, typed per axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct AvailabilityView {
    pub sizes: Vec<String>,
    pub papers: Vec<String>,
    pub colors: Vec<String>,
    pub quantities: Vec<u32>,
}

impl AvailabilityView {
    /// The list for one attribute as generic values
    pub fn values(&self, attribute: Attribute) -> Vec<AttributeValue> {
        match attribute {
            Attribute::Size => self.sizes.iter().map(|s| s.as_str().into()).collect(),
            Attribute::Paper => self.papers.iter().map(|s| s.as_str().into()).collect(),
            Attribute::Color => self.colors.iter().map(|s| s.as_str().into()).collect(),
            Attribute::Quantity => self.quantities.iter().map(|q| (*q).into()).collect(),
        }
    }

    /// True if no attribute has any selectable value
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
            && self.papers.is_empty()
            && self.colors.is_empty()
            && self.quantities.is_empty()
    }
}

/// Compute [`available_values`] for every attribute at once.
pub fn availability(catalog: &[Combination], selection: &Selection) -> AvailabilityView {
    let texts = |attribute: Attribute| -> Vec<String> {
        available_values(catalog, selection, attribute)
            .into_iter()
            .filter_map(|v| match v {
                AttributeValue::Text(s) => Some(s),
                AttributeValue::Quantity(_) => None,
            })
            .collect()
    };

    AvailabilityView {
        sizes: texts(Attribute::Size),
        papers: texts(Attribute::Paper),
        colors: texts(Attribute::Color),
        quantities: available_values(catalog, selection, Attribute::Quantity)
            .iter()
            .filter_map(AttributeValue::as_quantity)
            .collect(),
    }
}

// ============================================================================
// Priceability
// ============================================================================

/// True iff the selection equals some combination on all four attributes.
///
/// A selection with any unset attribute is never priceable.
pub fn is_priceable(catalog: &[Combination], selection: &Selection) -> bool {
    selection.is_complete() && catalog.iter().any(|row| row.matches_exactly(selection))
}

// ============================================================================
// Reconciliation
// ============================================================================

/// Outcome of [`reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// The corrected selection
    pub selection: Selection,
    /// Whether any attribute was changed
    pub changed: bool,
    /// Number of full passes that ran (0 for an empty catalog)
    pub passes: usize,
}

/// Auto-correct a selection against the catalog.
///
/// Attributes are checked in the fixed order size, paper, color, quantity.
/// For each one the strict view ([`available_values`]) is computed against
/// the current values of the other three; when it is non-empty and lacks the
/// current value, the first element replaces it. When the strict view is
/// empty the other values contradict each other, and the view narrowed only
/// by the preceding attributes is used instead, so the selection still moves
/// onto an existing combination.
///
/// Passes repeat until one changes nothing, bounded by
/// [`MAX_RECONCILE_PASSES`]. The input selection is not modified.
pub fn reconcile(catalog: &[Combination], selection: &Selection) -> Reconciled {
    let mut current = selection.clone();
    let mut changed = false;
    let mut passes = 0;

    if catalog.is_empty() {
        return Reconciled {
            selection: current,
            changed,
            passes,
        };
    }

    while passes < MAX_RECONCILE_PASSES {
        passes += 1;
        let mut pass_changed = false;

        for attribute in Attribute::ORDER {
            let mut candidates = available_values(catalog, &current, attribute);
            if candidates.is_empty() {
                candidates = prefix_values(catalog, &current, attribute);
            }

            let Some(first) = candidates.first() else {
                continue;
            };
            if candidates.iter().any(|v| current.holds(attribute, v)) {
                continue;
            }

            debug!(
                %attribute,
                from = ?current.get(attribute),
                to = %first,
                pass = passes,
                "Auto-correcting selection"
            );
            current.set(attribute, first.clone());
            pass_changed = true;
        }

        if !pass_changed {
            break;
        }
        changed = true;

        if passes == MAX_RECONCILE_PASSES {
            warn!(
                passes,
                "Selection did not settle within the pass limit; catalog may be contradictory"
            );
        }
    }

    Reconciled {
        selection: current,
        changed,
        passes,
    }
}

// ============================================================================
// Tests
// ============================================================================
