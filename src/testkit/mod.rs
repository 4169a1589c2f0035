//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests). Provides builders for domain values and in-memory
//! fakes for every port so tests focus on assertions rather than wiring.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::adapter::storefront::GraphqlTransport;
use crate::domain::{Cart, CartItem, CustomerId, ItemIdentity, Money, RemoteCartId, VariantId};
use crate::error::{RemoteError, Result};
use crate::port::{
    AccessTokenGrant, AccessTokenSource, CartReferenceStore, CheckoutGateway, CheckoutSession,
    ClientCartReference, Customer, CustomerAuth, CustomerCreation, NewCustomer,
    PersistentCartGateway,
};

/// A checkout-valid item for the given variant key.
pub fn variant_item(variant: &str, quantity: u32, amount: &str) -> CartItem {
    CartItem {
        identity: ItemIdentity::ResolvedVariant(VariantId::new(variant)),
        product_id: None,
        title: format!("Item {variant}"),
        variant_title: None,
        handle: format!("item-{variant}"),
        price: Money::new(amount, "USD"),
        featured_image: None,
        quantity,
    }
}

/// An item whose identity never resolved to a variant (legacy data).
pub fn legacy_item(raw_id: &str, quantity: u32) -> CartItem {
    CartItem {
        identity: ItemIdentity::LegacyUnresolved(raw_id.to_string()),
        product_id: None,
        title: format!("Legacy {raw_id}"),
        variant_title: None,
        handle: raw_id.to_string(),
        price: Money::new("1.00", "USD"),
        featured_image: None,
        quantity,
    }
}

fn scripted_failure() -> crate::error::Error {
    RemoteError::Api {
        message: "scripted failure".to_string(),
    }
    .into()
}

/// One scripted outcome for [`RecordingGateway::fetch_cart`].
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// No session / no remote cart.
    NoSession,
    /// A remote cart holding these items.
    Cart(Vec<CartItem>),
    /// Transport failure.
    Error,
}

/// Persistent-cart gateway fake: scripted fetches, recorded replacements.
#[derive(Default)]
pub struct RecordingGateway {
    pub fetch_script: Mutex<VecDeque<FetchOutcome>>,
    pub fail_replace: AtomicBool,
    pub replaced: Mutex<Vec<Vec<CartItem>>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_fetch(&self, outcome: FetchOutcome) {
        self.fetch_script.lock().push_back(outcome);
    }

    /// Item lists pushed through `replace_cart`, in call order.
    pub fn replacements(&self) -> Vec<Vec<CartItem>> {
        self.replaced.lock().clone()
    }
}

#[async_trait]
impl PersistentCartGateway for RecordingGateway {
    async fn fetch_cart(&self) -> Result<Option<Cart>> {
        match self.fetch_script.lock().pop_front() {
            Some(FetchOutcome::Cart(items)) => Ok(Some(Cart::from_items(items))),
            Some(FetchOutcome::Error) => Err(scripted_failure()),
            Some(FetchOutcome::NoSession) | None => Ok(None),
        }
    }

    async fn replace_cart(&self, items: &[CartItem]) -> Result<Cart> {
        self.replaced.lock().push(items.to_vec());
        if self.fail_replace.load(Ordering::SeqCst) {
            return Err(scripted_failure());
        }
        Ok(Cart::from_items(items.to_vec()))
    }
}

/// Checkout gateway fake: records calls, optionally fails.
pub struct StubCheckout {
    pub fail_with: Mutex<Option<String>>,
    pub calls: Mutex<Vec<Vec<CartItem>>>,
    pub session: CheckoutSession,
}

impl Default for StubCheckout {
    fn default() -> Self {
        Self {
            fail_with: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            session: CheckoutSession {
                id: RemoteCartId::new("gid://shop/Cart/checkout"),
                checkout_url: "https://shop.example.com/checkout/test".to_string(),
                total: None,
            },
        }
    }
}

impl StubCheckout {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckoutGateway for StubCheckout {
    async fn create_checkout(&self, items: &[CartItem]) -> Result<CheckoutSession> {
        self.calls.lock().push(items.to_vec());
        if let Some(message) = self.fail_with.lock().clone() {
            return Err(RemoteError::Rejected { message }.into());
        }
        Ok(self.session.clone())
    }
}

/// Auth fake resolving every token to the configured customer.
pub struct StubAuth {
    pub customer: Option<Customer>,
    pub fail_lookup: AtomicBool,
}

impl StubAuth {
    pub fn customer(id: &str) -> Self {
        Self {
            customer: Some(Customer {
                id: CustomerId::new(id),
                email: Some("customer@example.com".to_string()),
                first_name: None,
                last_name: None,
            }),
            fail_lookup: AtomicBool::new(false),
        }
    }

    pub fn anonymous() -> Self {
        Self {
            customer: None,
            fail_lookup: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl CustomerAuth for StubAuth {
    async fn customer_by_access_token(&self, _access_token: &str) -> Result<Option<Customer>> {
        if self.fail_lookup.load(Ordering::SeqCst) {
            return Err(scripted_failure());
        }
        Ok(self.customer.clone())
    }

    async fn create_access_token(&self, _email: &str, _password: &str) -> Result<AccessTokenGrant> {
        Ok(AccessTokenGrant {
            access_token: Some("test-token".to_string()),
            expires_at: None,
            errors: Vec::new(),
        })
    }

    async fn create_customer(&self, _input: NewCustomer) -> Result<CustomerCreation> {
        Ok(CustomerCreation {
            customer: self.customer.clone(),
            errors: Vec::new(),
        })
    }
}

/// Fixed access-token supply.
pub struct StaticTokens(pub Option<String>);

impl AccessTokenSource for StaticTokens {
    fn access_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Cookie-shaped client cart reference.
#[derive(Default)]
pub struct InMemoryClientReference {
    cell: Mutex<Option<RemoteCartId>>,
}

impl InMemoryClientReference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holding(cart_id: &str) -> Self {
        Self {
            cell: Mutex::new(Some(RemoteCartId::new(cart_id))),
        }
    }
}

impl ClientCartReference for InMemoryClientReference {
    fn get(&self) -> Option<RemoteCartId> {
        self.cell.lock().clone()
    }

    fn set(&self, cart_id: &RemoteCartId, _ttl: Duration) {
        *self.cell.lock() = Some(cart_id.clone());
    }
}

/// Server-side reference store fake with failure toggles.
#[derive(Default)]
pub struct InMemoryReferenceStore {
    map: Mutex<HashMap<CustomerId, RemoteCartId>>,
    pub fail_gets: AtomicBool,
    pub fail_sets: AtomicBool,
}

impl InMemoryReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(customer_id: &str, cart_id: &str) -> Self {
        let store = Self::default();
        store
            .map
            .lock()
            .insert(CustomerId::new(customer_id), RemoteCartId::new(cart_id));
        store
    }

    pub fn stored(&self, customer_id: &CustomerId) -> Option<RemoteCartId> {
        self.map.lock().get(customer_id).cloned()
    }
}

#[async_trait]
impl CartReferenceStore for InMemoryReferenceStore {
    async fn get(&self, customer_id: &CustomerId) -> Result<Option<RemoteCartId>> {
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(scripted_failure());
        }
        Ok(self.map.lock().get(customer_id).cloned())
    }

    async fn set(&self, customer_id: &CustomerId, cart_id: &RemoteCartId) -> Result<()> {
        if self.fail_sets.load(Ordering::SeqCst) {
            return Err(scripted_failure());
        }
        self.map
            .lock()
            .insert(customer_id.clone(), cart_id.clone());
        Ok(())
    }
}

/// One scripted GraphQL response.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// Unwrapped `data` value handed to the caller.
    Data(Value),
    /// Top-level API error.
    Error(String),
}

/// GraphQL transport fake: pops scripted responses, records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<ScriptedResponse>>,
    requests: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: ScriptedResponse) {
        self.script.lock().push_back(response);
    }

    pub fn push_data(&self, data: Value) {
        self.push(ScriptedResponse::Data(data));
    }

    /// Requests seen so far as (document, variables) pairs.
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().clone()
    }

    /// Operation names inferred from the recorded documents, in call order.
    pub fn operations(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|(query, _)| {
                query
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("?")
                    .split('(')
                    .next()
                    .unwrap_or("?")
                    .to_string()
            })
            .collect()
    }
}

#[async_trait]
impl GraphqlTransport for ScriptedTransport {
    async fn execute(&self, query: &str, variables: Value) -> Result<Value> {
        self.requests.lock().push((query.to_string(), variables));
        match self.script.lock().pop_front() {
            Some(ScriptedResponse::Data(data)) => Ok(data),
            Some(ScriptedResponse::Error(message)) => Err(RemoteError::Api { message }.into()),
            None => Err(RemoteError::Api {
                message: "transport script exhausted".to_string(),
            }
            .into()),
        }
    }
}
