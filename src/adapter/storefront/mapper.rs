//! Projection between the platform's cart shape and the normalized domain.

use serde::Serialize;
use tracing::debug;

use crate::domain::{Cart, CartItem, ItemIdentity, RemoteCartId, VariantId};

use super::schema::RemoteCart;

/// Wire shape of one line sent to the platform's line mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    pub merchandise_id: String,
    pub quantity: u32,
}

/// Project checkout-valid items into remote line inputs.
///
/// Invalid items (zero quantity, unresolved identity) are dropped here as a
/// final guard; the store heals them out earlier on its own paths.
pub fn to_cart_lines(items: &[CartItem]) -> Vec<CartLineInput> {
    items
        .iter()
        .filter(|item| item.is_valid_for_checkout())
        .map(|item| CartLineInput {
            merchandise_id: item.key().to_string(),
            quantity: item.quantity,
        })
        .collect()
}

/// Translate a remote cart into the normalized domain cart.
///
/// Lines whose merchandise snapshot is null (variant or product deleted
/// upstream) are silently excluded. Aggregates are recomputed locally;
/// remote-supplied totals are never trusted.
pub fn map_remote_cart(cart: &RemoteCart) -> Cart {
    let items = cart
        .lines
        .edges
        .iter()
        .filter_map(|edge| {
            let line = &edge.node;
            let Some(merchandise) = &line.merchandise else {
                debug!(line_id = %line.id, "dropping cart line with deleted merchandise");
                return None;
            };
            Some(CartItem {
                identity: ItemIdentity::ResolvedVariant(VariantId::new(&merchandise.id)),
                product_id: None,
                title: merchandise.product.title.clone(),
                variant_title: Some(merchandise.title.clone()),
                handle: merchandise.product.handle.clone(),
                price: merchandise.price_v2.clone(),
                featured_image: merchandise.image.as_ref().map(|image| image.url.clone()),
                quantity: line.quantity.max(0) as u32,
            })
        })
        .collect();

    Cart::from_items(items)
}

/// The remote cart's id as a domain id.
pub fn remote_cart_id(cart: &RemoteCart) -> RemoteCartId {
    RemoteCartId::new(&cart.id)
}
