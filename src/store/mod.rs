//! The local optimistic cart store.
//!
//! All UI-visible state lives here. Mutations apply synchronously to local
//! state, then fire an independent background sync toward the persistent
//! remote cart; the caller is never blocked on the network and never sees a
//! sync failure. The remote side converges to the last-initiated call's
//! snapshot of local state; overlapping syncs are neither queued nor
//! cancelled.

mod persistence;

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{item_lists_equal, merge_item_lists, Cart, CartItem};
use crate::error::CheckoutError;
use crate::port::{CheckoutGateway, CheckoutSession, PersistentCartGateway};

pub use persistence::{PersistedState, SnapshotStore};

/// UI-visible store state.
#[derive(Debug, Clone)]
pub struct CartState {
    pub cart: Cart,
    /// Cart drawer open/closed.
    pub is_open: bool,
    /// True only while `hydrate_persistent_cart` runs; steady-state syncs
    /// are not reflected here.
    pub is_syncing_persistent_cart: bool,
    /// Set once hydration has established that a remote cart exists. Guards
    /// background syncs so anonymous-session mutations cannot create
    /// spurious remote carts.
    pub has_persistent_cart_session: bool,
}

impl CartState {
    fn new() -> Self {
        Self {
            cart: Cart::empty(),
            is_open: false,
            is_syncing_persistent_cart: false,
            has_persistent_cart_session: false,
        }
    }
}

struct Inner {
    state: Mutex<CartState>,
    gateway: Arc<dyn PersistentCartGateway>,
    checkout: Arc<dyn CheckoutGateway>,
    snapshots: Option<SnapshotStore>,
}

/// The optimistic cart store.
///
/// Constructed once per application instance (or per test) and shared by
/// cloning. Mutating operations spawn background sync tasks, so the store
/// must live inside a Tokio runtime.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<Inner>,
}

impl CartStore {
    pub fn new(
        gateway: Arc<dyn PersistentCartGateway>,
        checkout: Arc<dyn CheckoutGateway>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(CartState::new()),
                gateway,
                checkout,
                snapshots: None,
            }),
        }
    }

    /// Attach durable persistence, restoring (and healing) any previous
    /// snapshot. Load failures are logged and leave the store empty rather
    /// than propagating.
    pub fn with_snapshots(
        gateway: Arc<dyn PersistentCartGateway>,
        checkout: Arc<dyn CheckoutGateway>,
        snapshots: SnapshotStore,
    ) -> Self {
        let mut state = CartState::new();
        match snapshots.load() {
            Ok(Some(persisted)) => {
                state.cart = persisted.cart;
                state.is_open = persisted.is_open;
            }
            Ok(None) => {}
            Err(error) => {
                warn!(error = %error, path = %snapshots.path().display(),
                    "failed to restore cart snapshot, starting empty");
            }
        }
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                gateway,
                checkout,
                snapshots: Some(snapshots),
            }),
        }
    }

    /// Replace the item list directly, bypassing normalization and healing.
    /// Test seam for reproducing legacy persisted carts.
    #[cfg(any(test, feature = "testkit"))]
    pub fn seed_items(&self, items: Vec<CartItem>) {
        let mut state = self.inner.state.lock();
        state.cart = Cart::from_items(items);
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> CartState {
        self.inner.state.lock().clone()
    }

    /// Current cart.
    pub fn cart(&self) -> Cart {
        self.inner.state.lock().cart.clone()
    }

    /// Add one unit of the given item. If an item with the same normalized
    /// key already exists its quantity is incremented; otherwise the item
    /// is appended with quantity 1. Opens the drawer.
    pub fn add_to_cart(&self, item: CartItem) {
        self.mutate_and_sync(|items| {
            match items.iter_mut().find(|existing| existing.key() == item.key()) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(1);
                }
                None => items.push(item.with_quantity(1)),
            }
            true
        });
    }

    /// Remove the entry whose normalized key equals `key`.
    pub fn remove_from_cart(&self, key: &str) {
        self.mutate_and_sync(|items| {
            items.retain(|item| item.key() != key);
            false
        });
    }

    /// Set an item's quantity; non-positive quantities remove the item,
    /// oversized ones saturate.
    pub fn update_quantity(&self, key: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(key);
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        self.mutate_and_sync(|items| {
            if let Some(item) = items.iter_mut().find(|item| item.key() == key) {
                item.quantity = quantity;
            }
            false
        });
    }

    /// Empty the cart and sync the emptiness to the remote cart.
    pub fn clear_cart(&self) {
        self.mutate_and_sync(|items| {
            items.clear();
            false
        });
    }

    /// Empty the cart without syncing. Used after checkout, where the
    /// remote cart has just been consumed and a sync would recreate state.
    fn clear_cart_skipping_sync(&self) {
        let mut state = self.inner.state.lock();
        state.cart = Cart::empty();
        self.persist_locked(&state);
    }

    pub fn toggle_cart(&self) {
        let mut state = self.inner.state.lock();
        state.is_open = !state.is_open;
        self.persist_locked(&state);
    }

    pub fn close_cart(&self) {
        let mut state = self.inner.state.lock();
        state.is_open = false;
        self.persist_locked(&state);
    }

    /// Forget the persistent-cart session, e.g. on logout, so subsequent
    /// local mutations do not leak into a stale remote cart.
    pub fn disable_persistent_cart(&self) {
        let mut state = self.inner.state.lock();
        state.has_persistent_cart_session = false;
        state.is_syncing_persistent_cart = false;
    }

    /// Reconcile the local cart with the server-persisted one. Called once
    /// per session bootstrap, after authentication is confirmed.
    ///
    /// If local and remote already agree the remote cart is adopted as-is;
    /// otherwise the additive merge is computed and, when it differs from
    /// the remote items, pushed back. A failed push falls back to adopting
    /// the locally-computed merge (optimistic). Fetch failures leave local
    /// state untouched and the session unestablished.
    pub async fn hydrate_persistent_cart(&self) {
        self.inner.state.lock().is_syncing_persistent_cart = true;

        let fetched = self.inner.gateway.fetch_cart().await;

        let remote_cart = match fetched {
            Ok(Some(cart)) => cart,
            Ok(None) => {
                debug!("no persistent cart session available");
                let mut state = self.inner.state.lock();
                state.has_persistent_cart_session = false;
                state.is_syncing_persistent_cart = false;
                return;
            }
            Err(error) => {
                warn!(error = %error, "failed to fetch persistent cart");
                let mut state = self.inner.state.lock();
                state.has_persistent_cart_session = false;
                state.is_syncing_persistent_cart = false;
                return;
            }
        };

        let local_items = self.valid_local_items();
        let remote_items = remote_cart.items().to_vec();

        let adopted = if item_lists_equal(&local_items, &remote_items) {
            remote_cart
        } else {
            let merged = merge_item_lists(&remote_items, &local_items);
            if item_lists_equal(&merged, &remote_items) {
                remote_cart
            } else {
                match self.inner.gateway.replace_cart(&merged).await {
                    Ok(cart) => cart,
                    Err(error) => {
                        warn!(error = %error, "failed to push merged cart, keeping local merge");
                        Cart::from_items(merged)
                    }
                }
            }
        };

        info!(items = adopted.items().len(), "persistent cart hydrated");
        let mut state = self.inner.state.lock();
        state.cart = adopted;
        state.has_persistent_cart_session = true;
        state.is_syncing_persistent_cart = false;
        self.persist_locked(&state);
    }

    /// Push the current local items to the remote cart, replacing its lines
    /// wholesale. No-op until a persistent-cart session is established;
    /// failures are logged, never surfaced — local state stays authoritative
    /// from the user's point of view.
    pub async fn sync_persistent_cart(&self) {
        if !self.inner.state.lock().has_persistent_cart_session {
            return;
        }
        let items = self.valid_local_items();
        if let Err(error) = self.inner.gateway.replace_cart(&items).await {
            warn!(error = %error, "background cart sync failed");
        }
    }

    /// Create a checkout from the current cart.
    ///
    /// Heals invalid items out of the cart before proceeding; an empty or
    /// fully-invalid cart is a user-facing error, not a crash. On success
    /// the cart is cleared (without a redundant sync — the remote cart has
    /// been superseded) and the drawer closed; on failure local state is
    /// preserved so the user can retry.
    pub async fn checkout(&self) -> Result<CheckoutSession, CheckoutError> {
        let items = {
            let state = self.inner.state.lock();
            if state.cart.is_empty() {
                return Err(CheckoutError::EmptyCart);
            }
            state.cart.items().to_vec()
        };

        let valid: Vec<CartItem> = items
            .iter()
            .filter(|item| item.is_valid_for_checkout())
            .cloned()
            .collect();

        if valid.len() != items.len() {
            debug!(
                dropped = items.len() - valid.len(),
                "healed outdated items out of cart before checkout"
            );
            let mut state = self.inner.state.lock();
            state.cart = Cart::from_items(valid.clone());
            self.persist_locked(&state);
        }

        if valid.is_empty() {
            return Err(CheckoutError::NoValidItems);
        }

        match self.inner.checkout.create_checkout(&valid).await {
            Ok(session) => {
                self.clear_cart_skipping_sync();
                self.close_cart();
                info!(checkout_url = %session.checkout_url, "checkout created");
                Ok(session)
            }
            Err(error) => Err(CheckoutError::Gateway {
                message: error.to_string(),
            }),
        }
    }

    /// Current local items, filtered to checkout-valid ones, for pushing to
    /// the remote cart.
    fn valid_local_items(&self) -> Vec<CartItem> {
        self.inner
            .state
            .lock()
            .cart
            .items()
            .iter()
            .filter(|item| item.is_valid_for_checkout())
            .cloned()
            .collect()
    }

    /// Apply a mutation to the item list, rebuild the cart, persist, then
    /// fire a background sync. `open_drawer` comes from the closure.
    fn mutate_and_sync(&self, mutation: impl FnOnce(&mut Vec<CartItem>) -> bool) {
        {
            let mut state = self.inner.state.lock();
            let mut items = state.cart.items().to_vec();
            let open_drawer = mutation(&mut items);
            state.cart = Cart::from_items(items);
            if open_drawer {
                state.is_open = true;
            }
            self.persist_locked(&state);
        }
        self.spawn_sync();
    }

    /// Fire-and-forget sync of the local snapshot at call time. The task's
    /// outcome is discarded except for logging. The remote cart converges
    /// to the last-initiated call's snapshot; overlapping tasks are not
    /// serialized.
    fn spawn_sync(&self) {
        if !self.inner.state.lock().has_persistent_cart_session {
            return;
        }
        let items = self.valid_local_items();
        let gateway = Arc::clone(&self.inner.gateway);
        tokio::spawn(async move {
            if let Err(error) = gateway.replace_cart(&items).await {
                warn!(error = %error, "background cart sync failed");
            }
        });
    }

    fn persist_locked(&self, state: &CartState) {
        if let Some(snapshots) = &self.inner.snapshots {
            if let Err(error) = snapshots.save(&state.cart, state.is_open) {
                warn!(error = %error, "failed to persist cart snapshot");
            }
        }
    }
}
