//! Server-side cart reference persisted as a customer metafield.
//!
//! The admin API stores the active cart id under a fixed namespace/key on
//! the customer record, giving cross-device continuity when the client-held
//! reference is absent.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::{CustomerId, RemoteCartId};
use crate::error::{RemoteError, Result};
use crate::port::CartReferenceStore;

use super::storefront::queries;
use super::storefront::schema::{CustomerMetafieldData, CustomerUpdateData};
use super::storefront::GraphqlTransport;

const METAFIELD_NAMESPACE: &str = "headless";
const METAFIELD_KEY: &str = "active_cart_id";

pub struct MetafieldReferenceStore {
    transport: Arc<dyn GraphqlTransport>,
}

impl MetafieldReferenceStore {
    pub fn new(transport: Arc<dyn GraphqlTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl CartReferenceStore for MetafieldReferenceStore {
    async fn get(&self, customer_id: &CustomerId) -> Result<Option<RemoteCartId>> {
        let data = self
            .transport
            .execute(
                queries::CUSTOMER_CART_METAFIELD,
                json!({
                    "id": customer_id.as_str(),
                    "namespace": METAFIELD_NAMESPACE,
                    "key": METAFIELD_KEY,
                }),
            )
            .await?;
        let data: CustomerMetafieldData =
            serde_json::from_value(data).map_err(|source| RemoteError::Schema {
                operation: "customerCartMetafield",
                source,
            })?;

        Ok(data
            .customer
            .and_then(|customer| customer.metafield)
            .map(|metafield| RemoteCartId::new(metafield.value)))
    }

    async fn set(&self, customer_id: &CustomerId, cart_id: &RemoteCartId) -> Result<()> {
        let data = self
            .transport
            .execute(
                queries::CUSTOMER_CART_METAFIELD_SET,
                json!({
                    "input": {
                        "id": customer_id.as_str(),
                        "metafields": [{
                            "namespace": METAFIELD_NAMESPACE,
                            "key": METAFIELD_KEY,
                            "type": "single_line_text_field",
                            "value": cart_id.as_str(),
                        }],
                    }
                }),
            )
            .await?;
        let data: CustomerUpdateData =
            serde_json::from_value(data).map_err(|source| RemoteError::Schema {
                operation: "customerCartMetafieldSet",
                source,
            })?;

        if let Some(error) = data.customer_update.user_errors.into_iter().next() {
            return Err(RemoteError::Rejected {
                message: error.message,
            }
            .into());
        }
        Ok(())
    }
}
