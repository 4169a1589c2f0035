//! GraphQL transport over HTTP.
//!
//! The transport is a trait so the reconciliation logic can be exercised
//! against scripted responses; the production implementation posts JSON
//! envelopes with reqwest.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::{AdminConfig, StorefrontConfig};
use crate::error::{RemoteError, Result};

const STOREFRONT_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";
const ADMIN_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Executes a GraphQL document and returns the unwrapped `data` value.
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn execute(&self, query: &str, variables: Value) -> Result<Value>;
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<Value>,
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

/// HTTP GraphQL client for the storefront and admin APIs.
pub struct HttpGraphqlClient {
    http: Client,
    endpoint: Url,
    token_header: &'static str,
    access_token: String,
}

impl HttpGraphqlClient {
    /// Client for the storefront API (cart, checkout, customer auth).
    pub fn storefront(config: &StorefrontConfig) -> Result<Self> {
        Ok(Self {
            http: Client::new(),
            endpoint: Url::parse(&config.api_url)?,
            token_header: STOREFRONT_TOKEN_HEADER,
            access_token: config.access_token.clone(),
        })
    }

    /// Client for the admin API (server-side cart reference metafields).
    pub fn admin(config: &AdminConfig) -> Result<Self> {
        Ok(Self {
            http: Client::new(),
            endpoint: Url::parse(&config.api_url)?,
            token_header: ADMIN_TOKEN_HEADER,
            access_token: config.access_token.clone(),
        })
    }
}

#[async_trait]
impl GraphqlTransport for HttpGraphqlClient {
    async fn execute(&self, query: &str, variables: Value) -> Result<Value> {
        debug!(endpoint = %self.endpoint, "executing GraphQL request");

        let envelope: Envelope = self
            .http
            .post(self.endpoint.clone())
            .header(self.token_header, &self.access_token)
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(errors) = envelope.errors {
            if let Some(first) = errors.into_iter().next() {
                return Err(RemoteError::Api {
                    message: first.message,
                }
                .into());
            }
        }

        envelope.data.ok_or_else(|| {
            RemoteError::Api {
                message: "no data returned".to_string(),
            }
            .into()
        })
    }
}
