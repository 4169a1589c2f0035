//! Remote cart operations and the reconciliation state machine.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::domain::RemoteCartId;
use crate::error::{RemoteError, Result};

use super::mapper::CartLineInput;
use super::queries;
use super::schema::{
    CartBuyerIdentityUpdateData, CartCreateData, CartLinesAddData, CartLinesRemoveData,
    CartPayload, GetCartData, RemoteCart,
};
use super::transport::GraphqlTransport;

/// Cart operations against the remote commerce platform.
pub struct CartService {
    transport: Arc<dyn GraphqlTransport>,
}

impl CartService {
    pub fn new(transport: Arc<dyn GraphqlTransport>) -> Self {
        Self { transport }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        query: &str,
        variables: Value,
    ) -> Result<T> {
        let data = self.transport.execute(query, variables).await?;
        serde_json::from_value(data)
            .map_err(|source| RemoteError::Schema { operation, source }.into())
    }

    /// Fetch a cart by id. `Ok(None)` when the cart no longer exists
    /// upstream (deleted or expired).
    pub async fn cart_by_id(&self, cart_id: &RemoteCartId) -> Result<Option<RemoteCart>> {
        let data: GetCartData = self
            .execute(
                "getCart",
                &queries::get_cart(),
                json!({ "id": cart_id.as_str() }),
            )
            .await?;
        Ok(data.cart)
    }

    /// Create a new cart, optionally bound to a customer and seeded with
    /// lines.
    pub async fn create_cart(
        &self,
        customer_access_token: Option<&str>,
        lines: Option<&[CartLineInput]>,
    ) -> Result<RemoteCart> {
        let mut input = serde_json::Map::new();
        if let Some(lines) = lines {
            input.insert("lines".to_string(), serde_json::to_value(lines)?);
        }
        if let Some(token) = customer_access_token {
            input.insert(
                "buyerIdentity".to_string(),
                json!({ "customerAccessToken": token }),
            );
        }

        let data: CartCreateData = self
            .execute(
                "cartCreate",
                &queries::cart_create(),
                json!({ "input": Value::Object(input) }),
            )
            .await?;
        require_cart(data.cart_create, "cartCreate")
    }

    /// Associate a cart with a customer's access token.
    ///
    /// Idempotent identity association: performed even when the cart is
    /// already bound, since ownership can lapse upstream.
    pub async fn bind_cart_to_customer(
        &self,
        cart_id: &RemoteCartId,
        customer_access_token: &str,
    ) -> Result<RemoteCart> {
        let data: CartBuyerIdentityUpdateData = self
            .execute(
                "cartBuyerIdentityUpdate",
                &queries::cart_buyer_identity_update(),
                json!({
                    "cartId": cart_id.as_str(),
                    "buyerIdentity": { "customerAccessToken": customer_access_token }
                }),
            )
            .await?;
        require_cart(data.cart_buyer_identity_update, "cartBuyerIdentityUpdate")
    }

    /// Replace a cart's lines wholesale: remove every existing line, then
    /// add the new ones.
    ///
    /// There is no compensating transaction: if the add step fails after a
    /// successful removal, the remote cart is left emptied. That window is
    /// accepted; the error is surfaced so the caller can decide.
    pub async fn replace_cart_lines(
        &self,
        cart_id: &RemoteCartId,
        lines: &[CartLineInput],
    ) -> Result<RemoteCart> {
        let current = self
            .cart_by_id(cart_id)
            .await?
            .ok_or_else(|| RemoteError::CartVanished {
                cart_id: cart_id.clone(),
            })?;

        let existing_line_ids: Vec<&str> = current
            .lines
            .edges
            .iter()
            .map(|edge| edge.node.id.as_str())
            .collect();

        if !existing_line_ids.is_empty() {
            let data: CartLinesRemoveData = self
                .execute(
                    "cartLinesRemove",
                    &queries::cart_lines_remove(),
                    json!({ "cartId": cart_id.as_str(), "lineIds": existing_line_ids }),
                )
                .await?;
            require_cart(data.cart_lines_remove, "cartLinesRemove")?;
        }

        if lines.is_empty() {
            return self
                .cart_by_id(cart_id)
                .await?
                .ok_or_else(|| {
                    RemoteError::CartVanished {
                        cart_id: cart_id.clone(),
                    }
                    .into()
                });
        }

        let data: CartLinesAddData = self
            .execute(
                "cartLinesAdd",
                &queries::cart_lines_add(),
                json!({ "cartId": cart_id.as_str(), "lines": lines }),
            )
            .await?;
        require_cart(data.cart_lines_add, "cartLinesAdd")
    }

    /// Resolve the customer's active cart, healing stale references.
    ///
    /// - No preferred id: create a fresh cart bound to the customer.
    /// - Preferred id no longer resolves: create a fresh cart (self-healing
    ///   for deleted/expired carts; never surfaced as an error).
    /// - Cart exists: re-bind it to the customer, then either return it
    ///   unchanged (read path, `lines` is `None`) or replace its lines.
    pub async fn get_or_create_customer_cart(
        &self,
        preferred_cart_id: Option<&RemoteCartId>,
        customer_access_token: &str,
        lines: Option<&[CartLineInput]>,
    ) -> Result<RemoteCart> {
        let Some(preferred) = preferred_cart_id else {
            debug!("no cart reference, creating a new customer cart");
            return self.create_cart(Some(customer_access_token), lines).await;
        };

        let Some(existing) = self.cart_by_id(preferred).await? else {
            info!(cart_id = %preferred, "referenced cart vanished upstream, creating a new one");
            return self.create_cart(Some(customer_access_token), lines).await;
        };

        let cart_id = RemoteCartId::new(&existing.id);
        self.bind_cart_to_customer(&cart_id, customer_access_token)
            .await?;

        match lines {
            None => Ok(existing),
            Some(lines) => self.replace_cart_lines(&cart_id, lines).await,
        }
    }
}

/// Unwrap a mutation payload: user errors surface as rejections, and the
/// absence of both a cart and errors is still a failure.
fn require_cart(payload: CartPayload, operation: &'static str) -> Result<RemoteCart> {
    if let Some(error) = payload.user_errors.into_iter().next() {
        return Err(RemoteError::Rejected {
            message: error.message,
        }
        .into());
    }
    payload
        .cart
        .ok_or_else(|| RemoteError::MissingCart { operation }.into())
}
