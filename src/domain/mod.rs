//! Platform-agnostic cart domain: items, identity, money, and the pure
//! list algebra used by reconciliation.

mod cart;
mod ids;
mod item;
mod money;

pub use cart::{item_lists_equal, merge_item_lists, Cart};
pub use ids::{CustomerId, ProductId, RemoteCartId, VariantId};
pub use item::{CartItem, ItemIdentity};
pub use money::Money;
