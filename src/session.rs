//! Per-request session and cart reference resolution.
//!
//! Decides which customer (if any) is acting and which remote cart id is
//! authoritative, and writes the winning reference back to both mirrors.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{CustomerId, RemoteCartId};
use crate::port::{
    AccessTokenSource, CartReferenceStore, ClientCartReference, CustomerAuth, CLIENT_REFERENCE_TTL,
};

/// Ephemeral per-request authentication context. Supplied to the adapter,
/// never persisted by this subsystem.
#[derive(Debug, Clone)]
pub struct CartSessionContext {
    pub customer_id: CustomerId,
    pub customer_access_token: String,
}

pub struct SessionResolver {
    auth: Arc<dyn CustomerAuth>,
    tokens: Arc<dyn AccessTokenSource>,
    client_reference: Arc<dyn ClientCartReference>,
    server_reference: Arc<dyn CartReferenceStore>,
}

impl SessionResolver {
    pub fn new(
        auth: Arc<dyn CustomerAuth>,
        tokens: Arc<dyn AccessTokenSource>,
        client_reference: Arc<dyn ClientCartReference>,
        server_reference: Arc<dyn CartReferenceStore>,
    ) -> Self {
        Self {
            auth,
            tokens,
            client_reference,
            server_reference,
        }
    }

    /// Resolve the acting customer. Anything short of a confirmed customer
    /// (no token, lookup failure, unknown token) is anonymous — never an
    /// error.
    pub async fn resolve_authenticated_context(&self) -> Option<CartSessionContext> {
        let access_token = self.tokens.access_token()?;

        match self.auth.customer_by_access_token(&access_token).await {
            Ok(Some(customer)) => Some(CartSessionContext {
                customer_id: customer.id,
                customer_access_token: access_token,
            }),
            Ok(None) => None,
            Err(error) => {
                debug!(error = %error, "customer lookup failed, treating session as anonymous");
                None
            }
        }
    }

    /// The authoritative cart id for this customer.
    ///
    /// The client-held reference wins over the server-stored one: it
    /// reflects the most recent browser-side activity, which may be more
    /// current than a slower-to-update server record.
    pub async fn resolve_preferred_cart_id(
        &self,
        customer_id: &CustomerId,
    ) -> Option<RemoteCartId> {
        if let Some(cart_id) = self.client_reference.get() {
            return Some(cart_id);
        }

        match self.server_reference.get(customer_id).await {
            Ok(stored) => stored,
            Err(error) => {
                warn!(error = %error, customer = %customer_id,
                    "failed to read stored cart reference");
                None
            }
        }
    }

    /// Persist the winning cart id to both mirrors. The client write always
    /// happens; the server write is best-effort — the client reference alone
    /// is sufficient for same-browser continuity.
    pub async fn persist_cart_reference(&self, customer_id: &CustomerId, cart_id: &RemoteCartId) {
        self.client_reference.set(cart_id, CLIENT_REFERENCE_TTL);

        if let Err(error) = self.server_reference.set(customer_id, cart_id).await {
            warn!(error = %error, customer = %customer_id,
                "failed to store customer cart reference");
        }
    }
}
