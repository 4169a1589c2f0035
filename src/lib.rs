//! cartsync - cart state and reconciliation engine for headless storefronts.
//!
//! This crate owns the one stateful piece of a headless storefront: the
//! shopper's cart. Locally it is an optimistic, durably persisted store;
//! remotely it is a cart held by the commerce platform, authoritative once
//! the customer is signed in. The engine keeps the two eventually consistent
//! across devices and sessions while tolerating partial failures of the
//! remote calls.
//!
//! # Architecture
//!
//! - **[`domain`]** - platform-agnostic cart types and the pure list
//!   algebra: identity normalization, checkout validity, additive merge,
//!   key/quantity equality.
//! - **[`store`]** - the local optimistic store: synchronous mutations,
//!   drawer flags, versioned snapshot persistence, fire-and-forget
//!   background syncs, the hydration merge protocol, and checkout.
//! - **[`adapter`]** - the remote platform adapter: GraphQL transport,
//!   explicit response schemas, the find-or-create/rebind/replace-lines
//!   reconciliation state machine, and the cart mapping.
//! - **[`session`]** - per-request resolution of the acting customer and of
//!   the authoritative remote cart id (client-held reference wins).
//! - **[`app`]** - typed equivalents of the original server routes, wired
//!   so a [`store::CartStore`] talking to a [`app::CartApi`] reproduces the
//!   original browser-to-routes loop.
//! - **[`port`]** - trait seams for every external collaborator.
//!
//! # Consistency model
//!
//! Mutations apply to local state first and never block on the network.
//! Background syncs are not queued or serialized: the remote cart converges
//! to the last-initiated sync's snapshot of local state ("last writer wins,
//! no distributed lock"). The remote cart is a per-customer convenience
//! cache, not a transactional ledger.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cartsync::store::{CartStore, SnapshotStore};
//! # use cartsync::port::{PersistentCartGateway, CheckoutGateway};
//! # fn gateways() -> (Arc<dyn PersistentCartGateway>, Arc<dyn CheckoutGateway>) { unimplemented!() }
//!
//! # async fn demo() {
//! let (gateway, checkout) = gateways();
//! let store = CartStore::with_snapshots(gateway, checkout, SnapshotStore::new("cart-state.json"));
//! store.hydrate_persistent_cart().await;
//! # }
//! ```

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
pub mod session;
pub mod store;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use error::{Error, Result};
