//! Typed application surface mirroring the original server routes.
//!
//! `CartApi` composes session resolution with the storefront adapter. It
//! also implements the store-facing gateways, so a [`CartStore`] wired to a
//! `CartApi` reproduces the browser-store-to-routes loop of the original
//! deployment.
//!
//! [`CartStore`]: crate::store::CartStore

use async_trait::async_trait;
use tracing::info;

use crate::adapter::storefront::schema::RemoteCart;
use crate::adapter::storefront::{
    map_remote_cart, remote_cart_id, to_cart_lines, CartService,
};
use crate::domain::{Cart, CartItem, RemoteCartId};
use crate::error::{CheckoutError, Error, Result};
use crate::port::{CheckoutGateway, CheckoutSession, PersistentCartGateway};
use crate::session::{CartSessionContext, SessionResolver};

/// Result of a session check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatus {
    pub authenticated: bool,
}

/// Result of reading the persistent cart.
#[derive(Debug, Clone)]
pub enum CartReadResponse {
    /// No authenticated customer; the local cart is on its own.
    Anonymous,
    /// The customer's active remote cart.
    Active {
        cart: Cart,
        cart_id: RemoteCartId,
        checkout_url: String,
    },
}

/// Result of replacing the persistent cart's lines.
#[derive(Debug, Clone)]
pub struct CartReplaceResponse {
    pub cart: Cart,
    pub cart_id: RemoteCartId,
    pub checkout_url: String,
}

pub struct CartApi {
    session: SessionResolver,
    carts: CartService,
}

impl CartApi {
    pub fn new(session: SessionResolver, carts: CartService) -> Self {
        Self { session, carts }
    }

    /// Whether the current session belongs to a confirmed customer.
    pub async fn session_check(&self) -> SessionStatus {
        SessionStatus {
            authenticated: self.session.resolve_authenticated_context().await.is_some(),
        }
    }

    /// Read (or lazily create) the customer's persistent cart.
    pub async fn read_cart(&self) -> Result<CartReadResponse> {
        let Some(context) = self.session.resolve_authenticated_context().await else {
            return Ok(CartReadResponse::Anonymous);
        };

        let preferred = self
            .session
            .resolve_preferred_cart_id(&context.customer_id)
            .await;
        let cart = self
            .carts
            .get_or_create_customer_cart(preferred.as_ref(), &context.customer_access_token, None)
            .await?;

        self.remember_cart(&context, &cart).await;
        Ok(CartReadResponse::Active {
            cart: map_remote_cart(&cart),
            cart_id: remote_cart_id(&cart),
            checkout_url: cart.checkout_url,
        })
    }

    /// Replace the persistent cart's lines with the given items.
    pub async fn replace_cart(&self, items: &[CartItem]) -> Result<CartReplaceResponse> {
        let Some(context) = self.session.resolve_authenticated_context().await else {
            return Err(Error::Unauthenticated);
        };

        let lines = to_cart_lines(items);
        let preferred = self
            .session
            .resolve_preferred_cart_id(&context.customer_id)
            .await;
        let cart = self
            .carts
            .get_or_create_customer_cart(
                preferred.as_ref(),
                &context.customer_access_token,
                Some(&lines),
            )
            .await?;

        self.remember_cart(&context, &cart).await;
        Ok(CartReplaceResponse {
            cart: map_remote_cart(&cart),
            cart_id: remote_cart_id(&cart),
            checkout_url: cart.checkout_url,
        })
    }

    /// Create a checkout from the given items. Anonymous checkout is
    /// allowed; when authenticated, the checkout cart becomes the customer's
    /// active cart reference.
    ///
    /// An invalid item anywhere in the list rejects the whole request;
    /// items are never silently dropped here. The store heals its cart
    /// before submitting, so a rejection means the caller skipped that.
    pub async fn checkout(&self, items: &[CartItem]) -> Result<CheckoutSession> {
        let lines = to_cart_lines(items);
        if lines.is_empty() {
            return Err(CheckoutError::NoValidItems.into());
        }
        if lines.len() != items.len() {
            return Err(CheckoutError::InvalidItem.into());
        }

        let context = self.session.resolve_authenticated_context().await;
        let token = context
            .as_ref()
            .map(|context| context.customer_access_token.as_str());
        let cart = self.carts.create_cart(token, Some(&lines)).await?;

        if let Some(context) = &context {
            self.remember_cart(context, &cart).await;
        }

        info!(checkout_url = %cart.checkout_url, lines = lines.len(), "checkout cart created");
        Ok(CheckoutSession {
            id: remote_cart_id(&cart),
            checkout_url: cart.checkout_url.clone(),
            total: cart
                .estimated_cost
                .as_ref()
                .map(|cost| cost.total_amount.clone()),
        })
    }

    async fn remember_cart(&self, context: &CartSessionContext, cart: &RemoteCart) {
        self.session
            .persist_cart_reference(&context.customer_id, &remote_cart_id(cart))
            .await;
    }
}

#[async_trait]
impl PersistentCartGateway for CartApi {
    async fn fetch_cart(&self) -> Result<Option<Cart>> {
        match self.read_cart().await? {
            CartReadResponse::Anonymous => Ok(None),
            CartReadResponse::Active { cart, .. } => Ok(Some(cart)),
        }
    }

    async fn replace_cart(&self, items: &[CartItem]) -> Result<Cart> {
        Ok(CartApi::replace_cart(self, items).await?.cart)
    }
}

#[async_trait]
impl CheckoutGateway for CartApi {
    async fn create_checkout(&self, items: &[CartItem]) -> Result<CheckoutSession> {
        CartApi::checkout(self, items).await
    }
}
