//! Algebraic properties of the pure cart math.

use cartsync::domain::{item_lists_equal, merge_item_lists, Cart};
use cartsync::testkit::{legacy_item, variant_item};
use rust_decimal_macros::dec;

#[test]
fn aggregates_are_decimal_safe_sums() {
    let cart = Cart::from_items(vec![
        variant_item("v1", 3, "0.10"),
        variant_item("v2", 1, "19.99"),
        variant_item("v3", 2, "0.01"),
    ]);
    // 0.30 + 19.99 + 0.02 - exact, no float drift.
    assert_eq!(cart.total(), dec!(20.31));
    assert_eq!(cart.item_count(), 6);
}

#[test]
fn merge_is_commutative_in_quantities() {
    let a = vec![variant_item("v1", 2, "1.00"), variant_item("v2", 1, "2.00")];
    let b = vec![variant_item("v2", 4, "2.50"), variant_item("v3", 1, "3.00")];

    let ab = merge_item_lists(&a, &b);
    let ba = merge_item_lists(&b, &a);

    // Same quantities per key either way; only metadata snapshots differ.
    assert!(item_lists_equal(&ab, &ba));

    let v2 = ab.iter().find(|item| item.key() == "v2").unwrap();
    assert_eq!(v2.quantity, 5);
}

#[test]
fn merge_keeps_first_occurrence_metadata() {
    let remote = vec![variant_item("v1", 1, "10.00")];
    let local = vec![variant_item("v1", 1, "12.00")];
    let merged = merge_item_lists(&remote, &local);
    assert_eq!(merged[0].price.amount, "10.00");
}

#[test]
fn merge_against_empty_is_identity_for_clean_lists() {
    // A filtered, deduplicated list is a fixed point of merging with nothing.
    let clean = vec![variant_item("v1", 2, "1.00"), variant_item("v2", 1, "2.00")];
    assert!(item_lists_equal(&merge_item_lists(&clean, &[]), &clean));
    assert!(item_lists_equal(&merge_item_lists(&[], &clean), &clean));
}

#[test]
fn merging_a_list_with_itself_doubles_quantities() {
    // The additive policy double-counts without an intervening equality
    // check; hydration relies on that check to stay idempotent.
    let x = vec![variant_item("v1", 2, "1.00")];
    let doubled = merge_item_lists(&x, &x);
    assert_eq!(doubled[0].quantity, 4);
    assert!(!item_lists_equal(&doubled, &x));
}

#[test]
fn merge_dedups_duplicate_keys_within_one_side() {
    let messy = vec![variant_item("v1", 1, "1.00"), variant_item("v1", 2, "1.00")];
    let merged = merge_item_lists(&messy, &[]);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].quantity, 3);
}

#[test]
fn merge_filters_items_that_cannot_check_out() {
    let merged = merge_item_lists(
        &[legacy_item("old-handle", 2)],
        &[variant_item("v1", 0, "1.00")],
    );
    assert!(merged.is_empty());
}

#[test]
fn validity_rejects_zero_quantity_and_unresolved_identity() {
    assert!(!variant_item("v1", 0, "1.00").is_valid_for_checkout());
    assert!(!legacy_item("just-a-handle", 3).is_valid_for_checkout());
    assert!(variant_item("v1", 1, "1.00").is_valid_for_checkout());
}

#[test]
fn equality_is_order_insensitive_and_quantity_sensitive() {
    let a = vec![variant_item("v1", 1, "1.00"), variant_item("v2", 2, "2.00")];
    let shuffled = vec![variant_item("v2", 2, "2.00"), variant_item("v1", 1, "1.00")];
    let bumped = vec![variant_item("v1", 1, "1.00"), variant_item("v2", 3, "2.00")];
    assert!(item_lists_equal(&a, &shuffled));
    assert!(!item_lists_equal(&a, &bumped));
}
