//! Cart items and their identity.
//!
//! An item's identity is modelled explicitly: either the variant id is known
//! (directly, or because the raw id is itself a recognizable variant
//! identifier), or the item carries a legacy id that never resolved. Only
//! resolved items are eligible for checkout; legacy ones are healed away
//! rather than sent to the remote platform.

use serde::{Deserialize, Serialize};

use super::ids::{ProductId, VariantId};
use super::money::Money;

/// Substring that marks a raw id as a variant identifier on the remote
/// platform (global ids look like `gid://shop/ProductVariant/123`).
const VARIANT_ID_MARKER: &str = "ProductVariant/";

/// How a cart item is identified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemIdentity {
    /// The variant id is known; this is the item's dedup key.
    ResolvedVariant(VariantId),
    /// A raw id from legacy persisted data that does not resolve to a
    /// variant. Such items are invalid for checkout.
    LegacyUnresolved(String),
}

impl ItemIdentity {
    /// Resolve an identity from a raw id and an optional explicit variant id.
    ///
    /// The explicit variant id wins; otherwise a raw id that is itself a
    /// variant identifier is accepted; anything else stays unresolved.
    pub fn resolve(raw_id: &str, variant_id: Option<&VariantId>) -> Self {
        if let Some(variant) = variant_id {
            Self::ResolvedVariant(variant.clone())
        } else if raw_id.contains(VARIANT_ID_MARKER) {
            Self::ResolvedVariant(VariantId::new(raw_id))
        } else {
            Self::LegacyUnresolved(raw_id.to_string())
        }
    }

    /// The normalized key used for dedup, comparisons and map lookups.
    pub fn key(&self) -> &str {
        match self {
            Self::ResolvedVariant(id) => id.as_str(),
            Self::LegacyUnresolved(raw) => raw.as_str(),
        }
    }

    /// The resolved variant id, if any.
    pub fn variant_id(&self) -> Option<&VariantId> {
        match self {
            Self::ResolvedVariant(id) => Some(id),
            Self::LegacyUnresolved(_) => None,
        }
    }

    /// Returns true when the identity resolves to a variant.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::ResolvedVariant(_))
    }
}

/// One selected purchasable variant and its quantity.
///
/// Serialization goes through the wire shape the storefront historically
/// persisted (`id` + optional `variantId`), so deserializing re-normalizes
/// the identity of legacy data for free.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCartItem", into = "RawCartItem")]
pub struct CartItem {
    pub identity: ItemIdentity,
    pub product_id: Option<ProductId>,
    pub title: String,
    pub variant_title: Option<String>,
    pub handle: String,
    pub price: Money,
    pub featured_image: Option<String>,
    pub quantity: u32,
}

impl CartItem {
    /// An item may be checked out iff its quantity is positive and its
    /// identity resolves to a variant. Items failing this are silently
    /// dropped during healing and never sent to the remote platform.
    pub fn is_valid_for_checkout(&self) -> bool {
        self.quantity > 0 && self.identity.is_resolved()
    }

    /// The normalized dedup key.
    pub fn key(&self) -> &str {
        self.identity.key()
    }

    /// Copy of the item with a different quantity.
    pub fn with_quantity(&self, quantity: u32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }
}

/// Wire/storage shape of a cart item (camelCase JSON, optional variant id).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCartItem {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    variant_id: Option<VariantId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    product_id: Option<ProductId>,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    variant_title: Option<String>,
    handle: String,
    price: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    featured_image: Option<ImageRef>,
    // Legacy data may carry zero or negative quantities; clamped on load.
    quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ImageRef {
    url: String,
}

impl From<RawCartItem> for CartItem {
    fn from(raw: RawCartItem) -> Self {
        let identity = ItemIdentity::resolve(&raw.id, raw.variant_id.as_ref());
        Self {
            identity,
            product_id: raw.product_id,
            title: raw.title,
            variant_title: raw.variant_title,
            handle: raw.handle,
            price: raw.price,
            featured_image: raw.featured_image.map(|image| image.url),
            quantity: raw.quantity.max(0) as u32,
        }
    }
}

impl From<CartItem> for RawCartItem {
    fn from(item: CartItem) -> Self {
        let variant_id = item.identity.variant_id().cloned();
        Self {
            id: item.identity.key().to_string(),
            variant_id,
            product_id: item.product_id,
            title: item.title,
            variant_title: item.variant_title,
            handle: item.handle,
            price: item.price,
            featured_image: item.featured_image.map(|url| ImageRef { url }),
            quantity: i64::from(item.quantity),
        }
    }
}
