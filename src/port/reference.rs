//! Cart reference stores.
//!
//! The active remote cart id is mirrored in two places: a client-held
//! reference (cookie-shaped, fast path, reflects the most recent browser
//! activity) and a server-side per-customer store. Resolution prefers the
//! client reference; persistence writes both, the server side best-effort.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{CustomerId, RemoteCartId};
use crate::error::Result;

/// Lifetime of the client-held cart reference.
pub const CLIENT_REFERENCE_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 30);

/// Client-held cart reference (cookie semantics: synchronous, scoped to the
/// current request/session).
pub trait ClientCartReference: Send + Sync {
    fn get(&self) -> Option<RemoteCartId>;

    fn set(&self, cart_id: &RemoteCartId, ttl: Duration);
}

/// Server-side per-customer cart reference store (metafield-shaped).
///
/// References are never explicitly deleted; a reference to a cart that no
/// longer exists is healed by the adapter's create-on-missing fallback.
#[async_trait]
pub trait CartReferenceStore: Send + Sync {
    async fn get(&self, customer_id: &CustomerId) -> Result<Option<RemoteCartId>>;

    async fn set(&self, customer_id: &CustomerId, cart_id: &RemoteCartId) -> Result<()>;
}
