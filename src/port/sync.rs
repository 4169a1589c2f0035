//! Ports through which the local store reaches the persistent remote cart.
//!
//! These mirror the original server routes the browser store talked to:
//! a read/replace pair for the persistent cart and a checkout creator.

use async_trait::async_trait;

use crate::domain::{Cart, CartItem, Money, RemoteCartId};
use crate::error::Result;

/// The store's view of the server-persisted cart.
#[async_trait]
pub trait PersistentCartGateway: Send + Sync {
    /// Fetch the authoritative remote cart for the current session.
    ///
    /// `Ok(None)` means there is no session or no remote cart; the caller
    /// leaves local state untouched.
    async fn fetch_cart(&self) -> Result<Option<Cart>>;

    /// Replace the remote cart's lines wholesale with the given items,
    /// returning the cart the platform echoed back.
    async fn replace_cart(&self, items: &[CartItem]) -> Result<Cart>;
}

/// Handle to a checkout created on the remote platform.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSession {
    pub id: RemoteCartId,
    pub checkout_url: String,
    /// Estimated total as reported by the platform, when available.
    pub total: Option<Money>,
}

/// Creates a checkout from a validated item list.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    async fn create_checkout(&self, items: &[CartItem]) -> Result<CheckoutSession>;
}
