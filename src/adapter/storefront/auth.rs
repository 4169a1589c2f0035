//! Customer auth operations over the storefront API.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::domain::CustomerId;
use crate::error::{RemoteError, Result};
use crate::port::{AccessTokenGrant, Customer, CustomerAuth, CustomerCreation, NewCustomer};

use super::queries;
use super::schema::{AccessTokenCreateData, CustomerByTokenData, CustomerCreateData, CustomerNode};
use super::transport::GraphqlTransport;

pub struct CustomerAuthService {
    transport: Arc<dyn GraphqlTransport>,
}

impl CustomerAuthService {
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
}

fn customer_from_node(node: CustomerNode) -> Customer {
    Customer {
        id: CustomerId::new(node.id),
        email: node.email,
        first_name: node.first_name,
        last_name: node.last_name,
    }
}

#[async_trait]
impl CustomerAuth for CustomerAuthService {
    async fn customer_by_access_token(&self, access_token: &str) -> Result<Option<Customer>> {
        let data: CustomerByTokenData = self
            .execute(
                "customerByToken",
                queries::CUSTOMER_BY_TOKEN,
                json!({ "customerAccessToken": access_token }),
            )
            .await?;
        Ok(data.customer.map(customer_from_node))
    }

    async fn create_access_token(&self, email: &str, password: &str) -> Result<AccessTokenGrant> {
        let data: AccessTokenCreateData = self
            .execute(
                "customerAccessTokenCreate",
                queries::CUSTOMER_ACCESS_TOKEN_CREATE,
                json!({ "input": { "email": email, "password": password } }),
            )
            .await?;
        let payload = data.customer_access_token_create;
        let (access_token, expires_at) = match payload.customer_access_token {
            Some(token) => (Some(token.access_token), token.expires_at),
            None => (None, None),
        };
        Ok(AccessTokenGrant {
            access_token,
            expires_at,
            errors: payload
                .customer_user_errors
                .into_iter()
                .map(|error| error.message)
                .collect(),
        })
    }

    async fn create_customer(&self, input: NewCustomer) -> Result<CustomerCreation> {
        let data: CustomerCreateData = self
            .execute(
                "customerCreate",
                queries::CUSTOMER_CREATE,
                json!({ "input": {
                    "email": input.email,
                    "password": input.password,
                    "firstName": input.first_name,
                    "lastName": input.last_name,
                } }),
            )
            .await?;
        let payload = data.customer_create;
        Ok(CustomerCreation {
            customer: payload.customer.map(customer_from_node),
            errors: payload
                .customer_user_errors
                .into_iter()
                .map(|error| error.message)
                .collect(),
        })
    }
}
