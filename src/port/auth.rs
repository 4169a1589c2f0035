//! Authentication collaborator ports.
//!
//! The engine never stores credentials itself; an upstream collaborator
//! (cookie plumbing in the original deployment) supplies the customer
//! access token, and the auth service resolves it to a customer.

use async_trait::async_trait;

use crate::domain::CustomerId;
use crate::error::Result;

/// A customer known to the remote platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Result of a token-creation attempt: either a token or user-facing errors.
#[derive(Debug, Clone)]
pub struct AccessTokenGrant {
    pub access_token: Option<String>,
    pub expires_at: Option<String>,
    pub errors: Vec<String>,
}

/// Result of a customer-creation attempt.
#[derive(Debug, Clone)]
pub struct CustomerCreation {
    pub customer: Option<Customer>,
    pub errors: Vec<String>,
}

/// New-customer registration input.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Customer account operations against the remote platform.
#[async_trait]
pub trait CustomerAuth: Send + Sync {
    /// Resolve a customer from an access token; `None` when the token is
    /// invalid or expired.
    async fn customer_by_access_token(&self, access_token: &str) -> Result<Option<Customer>>;

    /// Exchange credentials for an access token.
    async fn create_access_token(&self, email: &str, password: &str) -> Result<AccessTokenGrant>;

    /// Register a new customer account.
    async fn create_customer(&self, input: NewCustomer) -> Result<CustomerCreation>;
}

/// Per-request supplier of the customer access token (cookie-shaped in the
/// original deployment). Absence means the session is anonymous.
pub trait AccessTokenSource: Send + Sync {
    fn access_token(&self) -> Option<String>;
}
