//! Outbound adapters: production implementations of the ports.

pub mod reference;
pub mod storefront;

pub use reference::MetafieldReferenceStore;
