//! Explicit response schemas for the remote platform's GraphQL payloads.
//!
//! Every adapter operation deserializes into one of these shapes; anything
//! that does not fit is a remote consistency error, never a silent guess.

use serde::Deserialize;

use crate::domain::Money;

/// Relay-style connection wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

/// The platform's cart representation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCart {
    pub id: String,
    pub checkout_url: String,
    #[serde(default)]
    pub estimated_cost: Option<EstimatedCost>,
    pub lines: Connection<RemoteCartLine>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedCost {
    pub total_amount: Money,
}

/// One remote cart line. `merchandise` is null when the variant or product
/// was deleted upstream after the line was created.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCartLine {
    pub id: String,
    pub quantity: i64,
    pub merchandise: Option<Merchandise>,
}

/// The platform's denormalized variant snapshot attached to a cart line.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchandise {
    pub id: String,
    pub title: String,
    pub price_v2: Money,
    pub image: Option<ImageNode>,
    pub product: ProductNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageNode {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductNode {
    pub title: String,
    pub handle: String,
}

/// User-facing error attached to a mutation payload.
#[derive(Debug, Clone, Deserialize)]
pub struct UserError {
    pub message: String,
}

/// Common shape of every cart mutation payload: an optional cart plus a
/// list of user errors. Absence of both is also a failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
    pub cart: Option<RemoteCart>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
pub struct GetCartData {
    pub cart: Option<RemoteCart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCreateData {
    pub cart_create: CartPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesRemoveData {
    pub cart_lines_remove: CartPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesAddData {
    pub cart_lines_add: CartPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartBuyerIdentityUpdateData {
    pub cart_buyer_identity_update: CartPayload,
}

// Customer auth payloads.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerNode {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerByTokenData {
    pub customer: Option<CustomerNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenCreateData {
    pub customer_access_token_create: AccessTokenCreatePayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenCreatePayload {
    pub customer_access_token: Option<AccessTokenNode>,
    #[serde(default)]
    pub customer_user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenNode {
    pub access_token: String,
    pub expires_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCreateData {
    pub customer_create: CustomerCreatePayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCreatePayload {
    pub customer: Option<CustomerNode>,
    #[serde(default)]
    pub customer_user_errors: Vec<UserError>,
}

// Admin metafield payloads.

#[derive(Debug, Deserialize)]
pub struct CustomerMetafieldData {
    pub customer: Option<CustomerMetafieldNode>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerMetafieldNode {
    pub metafield: Option<MetafieldValue>,
}

#[derive(Debug, Deserialize)]
pub struct MetafieldValue {
    pub value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdateData {
    pub customer_update: CustomerUpdatePayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdatePayload {
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}
