//! Adapter for the remote commerce platform's storefront GraphQL API.

mod auth;
mod mapper;
pub(crate) mod queries;
pub mod schema;
mod service;
mod transport;

pub use auth::CustomerAuthService;
pub use mapper::{map_remote_cart, remote_cart_id, to_cart_lines, CartLineInput};
pub use service::CartService;
pub use transport::{GraphqlTransport, HttpGraphqlClient};
