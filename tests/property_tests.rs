//! Property-Based Tests for printquote
//!
//! These tests verify resolver invariants over small random catalogs:
//! - Availability lists are exactly the consistent values, each once
//! - Priceability is exact-row membership
//! - Reconcile is idempotent, bounded, and lands on a priced row

use proptest::prelude::*;

use printquote::types::{Attribute, AttributeValue, Combination, Selection};
use printquote::{MAX_RECONCILE_PASSES, available_values, is_priceable, reconcile};

// =============================================================================
// Strategies
// =============================================================================

const SIZES: &[&str] = &["A6", "A5", "A4"];
const PAPERS: &[&str] = &["130g", "170g"];
const COLORS: &[&str] = &["1+0", "4+0", "4+4"];
const QUANTITIES: &[u32] = &[100, 250, 500, 1000];

fn combination_strategy() -> impl Strategy<Value = Combination> {
    (
        prop::sample::select(SIZES),
        prop::sample::select(PAPERS),
        prop::sample::select(COLORS),
        prop::sample::select(QUANTITIES),
    )
        .prop_map(|(s, p, c, q)| Combination::new(s, p, c, q))
}

fn catalog_strategy() -> impl Strategy<Value = Vec<Combination>> {
    prop::collection::vec(combination_strategy(), 0..12)
}

/// Values include one outside every catalog domain ("B1" / 7)
fn selection_strategy() -> impl Strategy<Value = Selection> {
    let text = |domain: &'static [&'static str]| {
        prop::option::of(prop_oneof![
            prop::sample::select(domain).prop_map(str::to_string),
            Just("B1".to_string()),
        ])
    };
    (
        text(SIZES),
        text(PAPERS),
        text(COLORS),
        prop::option::of(prop_oneof![prop::sample::select(QUANTITIES), Just(7u32)]),
    )
        .prop_map(|(size, paper, color, quantity)| Selection {
            size,
            paper,
            color,
            quantity,
        })
}

fn attribute_strategy() -> impl Strategy<Value = Attribute> {
    prop::sample::select(Attribute::ORDER.to_vec())
}

/// Brute-force reference for `available_values`
fn consistent_values(
    catalog: &[Combination],
    selection: &Selection,
    target: Attribute,
) -> Vec<AttributeValue> {
    let mut out = Vec::new();
    for row in catalog {
        let consistent = target.others().all(|a| match selection.get(a) {
            None => true,
            Some(v) => row.value(a) == v,
        });
        if consistent && !out.contains(&row.value(target)) {
            out.push(row.value(target));
        }
    }
    out
}

// =============================================================================
// Availability
// =============================================================================

proptest! {
    /// Every consistent value appears exactly once, nothing else appears
    #[test]
    fn available_values_exact(
        catalog in catalog_strategy(),
        selection in selection_strategy(),
        target in attribute_strategy(),
    ) {
        let got = available_values(&catalog, &selection, target);
        let expected = consistent_values(&catalog, &selection, target);
        prop_assert_eq!(got, expected);
    }

    /// The target's own value never narrows its list
    #[test]
    fn available_values_ignore_own_value(
        catalog in catalog_strategy(),
        selection in selection_strategy(),
        target in attribute_strategy(),
    ) {
        let mut cleared = selection.clone();
        cleared.clear(target);
        prop_assert_eq!(
            available_values(&catalog, &selection, target),
            available_values(&catalog, &cleared, target)
        );
    }
}

// =============================================================================
// Priceability
// =============================================================================

proptest! {
    /// Priceable iff the exact tuple is a row
    #[test]
    fn priceable_iff_row_member(
        catalog in catalog_strategy(),
        selection in selection_strategy(),
    ) {
        let member = selection
            .to_combination()
            .is_some_and(|c| catalog.contains(&c));
        prop_assert_eq!(is_priceable(&catalog, &selection), member);
    }

    /// Quantity typed as text prices the same as the number
    #[test]
    fn priceable_with_text_quantity(
        catalog in catalog_strategy(),
        selection in selection_strategy(),
    ) {
        let mut texted = selection.clone();
        if let Some(q) = selection.quantity {
            texted.set_text(Attribute::Quantity, &q.to_string());
        }
        prop_assert_eq!(is_priceable(&catalog, &texted), is_priceable(&catalog, &selection));
    }
}

// =============================================================================
// Reconciliation
// =============================================================================

proptest! {
    /// Reconciling twice equals reconciling once
    #[test]
    fn reconcile_idempotent(
        catalog in catalog_strategy(),
        selection in selection_strategy(),
    ) {
        let once = reconcile(&catalog, &selection);
        let twice = reconcile(&catalog, &once.selection);
        prop_assert_eq!(&twice.selection, &once.selection);
        prop_assert!(!twice.changed);
    }

    /// Reconcile never exceeds the pass limit
    #[test]
    fn reconcile_bounded(
        catalog in catalog_strategy(),
        selection in selection_strategy(),
    ) {
        let outcome = reconcile(&catalog, &selection);
        prop_assert!(outcome.passes <= MAX_RECONCILE_PASSES);
    }

    /// A non-empty catalog always reconciles onto one of its rows
    #[test]
    fn reconcile_reaches_priced_row(
        catalog in catalog_strategy().prop_filter("non-empty", |c| !c.is_empty()),
        selection in selection_strategy(),
    ) {
        let outcome = reconcile(&catalog, &selection);
        prop_assert!(is_priceable(&catalog, &outcome.selection));
    }

    /// A priceable selection is left untouched
    #[test]
    fn reconcile_keeps_priced_selection(
        catalog in catalog_strategy().prop_filter("non-empty", |c| !c.is_empty()),
        index in any::<prop::sample::Index>(),
    ) {
        let row = index.get(&catalog);
        let selection = Selection::from_combination(row);
        let outcome = reconcile(&catalog, &selection);
        prop_assert!(!outcome.changed);
        prop_assert_eq!(outcome.selection, selection);
    }

    /// Empty catalog: nothing selectable, nothing priced, nothing changed
    #[test]
    fn empty_catalog_is_inert(
        selection in selection_strategy(),
        target in attribute_strategy(),
    ) {
        prop_assert!(available_values(&[], &selection, target).is_empty());
        prop_assert!(!is_priceable(&[], &selection));
        let outcome = reconcile(&[], &selection);
        prop_assert!(!outcome.changed);
        prop_assert_eq!(outcome.selection, selection);
    }
}
