//! Trait seams for every external collaborator.
//!
//! Implementations must be thread-safe (`Send + Sync`); adapters provide
//! the production implementations, the testkit provides fakes.

mod auth;
mod reference;
mod sync;

pub use auth::{
    AccessTokenGrant, AccessTokenSource, Customer, CustomerAuth, CustomerCreation, NewCustomer,
};
pub use reference::{CartReferenceStore, ClientCartReference, CLIENT_REFERENCE_TTL};
pub use sync::{CheckoutGateway, CheckoutSession, PersistentCartGateway};
