use thiserror::Error;

use crate::domain::RemoteCartId;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors from the remote commerce platform's cart API.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The platform rejected the operation with a user-facing error.
    #[error("remote platform rejected the operation: {message}")]
    Rejected { message: String },

    /// The platform returned neither a cart nor an error for a mutation.
    #[error("remote platform returned no cart for {operation}")]
    MissingCart { operation: &'static str },

    /// A cart referenced mid-operation no longer exists upstream.
    #[error("cart {cart_id} no longer exists on the remote platform")]
    CartVanished { cart_id: RemoteCartId },

    /// A response did not match the expected schema.
    #[error("unexpected {operation} response shape: {source}")]
    Schema {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The GraphQL layer itself reported an error.
    #[error("remote API error: {message}")]
    Api { message: String },
}

/// Errors surfaced to the user by the checkout operation.
///
/// These are recoverable conditions; the local cart is preserved (beyond
/// healing) so the user can retry.
#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("your cart had outdated items and was refreshed, please add products again")]
    NoValidItems,

    /// The submitted list mixes valid and invalid items. Healing is the
    /// store's job; at this boundary the whole request is rejected.
    #[error("cart contains an invalid item, please remove it and add the product again")]
    InvalidItem,

    #[error("{message}")]
    Gateway { message: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error("not authenticated")]
    Unauthenticated,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
