//! Durable snapshot of the local cart store.
//!
//! The snapshot is a small versioned JSON document. Loading is a healing
//! step: item identities are re-normalized (via the item wire shape), items
//! that are invalid for checkout are dropped, and aggregates are recomputed.
//! Stored aggregates are never trusted.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Cart, CartItem};
use crate::error::Result;

/// Current snapshot schema version. Version 1 predates identity
/// normalization; its items are healed by the same load path.
const SNAPSHOT_VERSION: u32 = 2;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    saved_at: DateTime<Utc>,
    cart: Cart,
    is_open: bool,
}

/// What a snapshot restores.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedState {
    pub cart: Cart,
    pub is_open: bool,
}

/// File-backed snapshot store with atomic writes.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and migrate the persisted state. `Ok(None)` when no snapshot
    /// exists yet.
    pub fn load(&self) -> Result<Option<PersistedState>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        let snapshot: Snapshot = serde_json::from_str(&content)?;
        Ok(Some(migrate(snapshot)))
    }

    /// Persist the state, replacing any previous snapshot. Writes to a
    /// sibling temp file first so a crash mid-write cannot corrupt the
    /// snapshot.
    pub fn save(&self, cart: &Cart, is_open: bool) -> Result<()> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            cart: cart.clone(),
            is_open,
        };
        let content = serde_json::to_vec_pretty(&snapshot)?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Re-normalize and filter persisted items, then rebuild aggregates.
///
/// Identity normalization already happened during deserialization (the item
/// wire shape resolves `variantId`/`id`); this drops whatever still fails
/// checkout validity, healing legacy persisted carts.
fn migrate(snapshot: Snapshot) -> PersistedState {
    let before = snapshot.cart.items().len();
    let items: Vec<CartItem> = snapshot
        .cart
        .items()
        .iter()
        .filter(|item| item.is_valid_for_checkout())
        .cloned()
        .collect();

    if items.len() != before {
        debug!(
            dropped = before - items.len(),
            version = snapshot.version,
            "healed invalid items out of persisted cart"
        );
    }

    PersistedState {
        cart: Cart::from_items(items),
        is_open: snapshot.is_open,
    }
}
