//! The cart aggregate and the pure list algebra behind reconciliation.
//!
//! Totals are derived state: the only way to build a [`Cart`] is from its
//! items, and deserialization rebuilds the aggregates rather than trusting
//! whatever was stored or received.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::item::CartItem;

/// An order-irrelevant collection of cart items plus derived aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCart")]
pub struct Cart {
    items: Vec<CartItem>,
    total: Decimal,
    #[serde(rename = "itemCount")]
    item_count: u32,
}

impl Cart {
    /// Build a cart from items, recomputing `total` and `item_count`.
    ///
    /// Pure and deterministic. Unparsable price amounts contribute zero to
    /// the total rather than poisoning it.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let total = items
            .iter()
            .map(|item| {
                item.price.decimal().unwrap_or(Decimal::ZERO) * Decimal::from(item.quantity)
            })
            .sum();
        let item_count = items.iter().map(|item| item.quantity).sum();
        Self {
            items,
            total,
            item_count,
        }
    }

    /// An empty cart.
    pub fn empty() -> Self {
        Self::from_items(Vec::new())
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn item_count(&self) -> u32 {
        self.item_count
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Stored/wire shape; aggregates present in the source are discarded.
#[derive(Debug, Deserialize)]
struct RawCart {
    #[serde(default)]
    items: Vec<CartItem>,
}

impl From<RawCart> for Cart {
    fn from(raw: RawCart) -> Self {
        Cart::from_items(raw.items)
    }
}

/// Compare two item lists by normalized key and quantity, ignoring order
/// and metadata. Used to skip redundant remote writes.
pub fn item_lists_equal(a: &[CartItem], b: &[CartItem]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut left: Vec<(&str, u32)> = a.iter().map(|item| (item.key(), item.quantity)).collect();
    let mut right: Vec<(&str, u32)> = b.iter().map(|item| (item.key(), item.quantity)).collect();
    left.sort_unstable();
    right.sort_unstable();
    left == right
}

/// Additively merge a remote item list with a local one.
///
/// Items are grouped by normalized key; on collision quantities are summed
/// (remote + local) while the first occurrence's metadata is kept, so the
/// remote snapshot wins metadata when both sides hold the same variant.
/// Invalid items are filtered out of the result. Insertion order of first
/// occurrences is preserved.
pub fn merge_item_lists(remote: &[CartItem], local: &[CartItem]) -> Vec<CartItem> {
    let mut merged: Vec<CartItem> = Vec::with_capacity(remote.len() + local.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in remote.iter().chain(local.iter()) {
        match index.get(item.key()) {
            Some(&slot) => {
                let existing = &mut merged[slot];
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            }
            None => {
                index.insert(item.key().to_string(), merged.len());
                merged.push(item.clone());
            }
        }
    }

    merged.retain(CartItem::is_valid_for_checkout);
    merged
}
