//! The typed route surface, wired end to end with the local store.

use std::sync::Arc;

use serde_json::{json, Value};

use cartsync::adapter::storefront::CartService;
use cartsync::app::{CartApi, CartReadResponse};
use cartsync::domain::CustomerId;
use cartsync::error::{CheckoutError, Error};
use cartsync::session::SessionResolver;
use cartsync::store::CartStore;
use cartsync::testkit::{
    legacy_item, variant_item, InMemoryClientReference, InMemoryReferenceStore, ScriptedTransport,
    StaticTokens, StubAuth,
};

const CUSTOMER: &str = "gid://shop/Customer/7";

struct Harness {
    api: Arc<CartApi>,
    transport: Arc<ScriptedTransport>,
    client_reference: Arc<InMemoryClientReference>,
    server_reference: Arc<InMemoryReferenceStore>,
}

fn harness(token: Option<&str>, client_reference: InMemoryClientReference) -> Harness {
    let transport = Arc::new(ScriptedTransport::new());
    let client_reference = Arc::new(client_reference);
    let server_reference = Arc::new(InMemoryReferenceStore::new());
    let session = SessionResolver::new(
        Arc::new(StubAuth::customer(CUSTOMER)),
        Arc::new(StaticTokens(token.map(str::to_string))),
        client_reference.clone(),
        server_reference.clone(),
    );
    let api = Arc::new(CartApi::new(session, CartService::new(transport.clone())));
    Harness {
        api,
        transport,
        client_reference,
        server_reference,
    }
}

fn line(variant: &str, quantity: i64, amount: &str) -> Value {
    json!({
        "node": {
            "id": format!("gid://shop/CartLine/{variant}"),
            "quantity": quantity,
            "merchandise": {
                "id": format!("gid://shop/ProductVariant/{variant}"),
                "title": "Default",
                "priceV2": { "amount": amount, "currencyCode": "USD" },
                "image": null,
                "product": { "title": format!("Product {variant}"), "handle": format!("product-{variant}") }
            }
        }
    })
}

fn remote_cart(id: &str, lines: Vec<Value>) -> Value {
    json!({
        "id": id,
        "checkoutUrl": format!("https://shop.example.com/checkout/{id}"),
        "estimatedCost": { "totalAmount": { "amount": "10.00", "currencyCode": "USD" } },
        "lines": { "edges": lines }
    })
}

#[tokio::test]
async fn anonymous_read_makes_no_remote_calls() {
    let h = harness(None, InMemoryClientReference::new());

    let response = h.api.read_cart().await.unwrap();

    assert!(matches!(response, CartReadResponse::Anonymous));
    assert!(h.transport.requests().is_empty());
}

#[tokio::test]
async fn first_read_creates_a_cart_and_remembers_it() {
    let h = harness(Some("tok-123"), InMemoryClientReference::new());
    h.transport.push_data(json!({
        "cartCreate": {
            "cart": remote_cart("gid://shop/Cart/new", vec![]),
            "userErrors": []
        }
    }));

    let response = h.api.read_cart().await.unwrap();

    let CartReadResponse::Active { cart, cart_id, .. } = response else {
        panic!("expected an active cart");
    };
    assert!(cart.is_empty());
    assert_eq!(cart_id.as_str(), "gid://shop/Cart/new");

    use cartsync::port::ClientCartReference;
    assert_eq!(h.client_reference.get(), Some(cart_id.clone()));
    assert_eq!(
        h.server_reference.stored(&CustomerId::new(CUSTOMER)),
        Some(cart_id)
    );
}

#[tokio::test]
async fn anonymous_replace_is_unauthenticated() {
    let h = harness(None, InMemoryClientReference::new());

    let error = h
        .api
        .replace_cart(&[variant_item("v1", 1, "1.00")])
        .await
        .unwrap_err();

    assert!(matches!(error, Error::Unauthenticated));
    assert!(h.transport.requests().is_empty());
}

#[tokio::test]
async fn checkout_without_valid_items_is_rejected_before_any_call() {
    let h = harness(None, InMemoryClientReference::new());

    let error = h.api.checkout(&[legacy_item("old", 2)]).await.unwrap_err();

    assert!(matches!(
        error,
        Error::Checkout(CheckoutError::NoValidItems)
    ));
    assert!(h.transport.requests().is_empty());
}

#[tokio::test]
async fn checkout_with_an_invalid_item_rejects_the_whole_request() {
    let h = harness(None, InMemoryClientReference::new());

    let error = h
        .api
        .checkout(&[variant_item("v1", 1, "10.00"), legacy_item("mystery-item", 2)])
        .await
        .unwrap_err();

    // Nothing is dropped and nothing reaches the platform.
    assert!(matches!(error, Error::Checkout(CheckoutError::InvalidItem)));
    assert!(h.transport.requests().is_empty());
}

#[tokio::test]
async fn anonymous_checkout_creates_an_unbound_cart() {
    let h = harness(None, InMemoryClientReference::new());
    h.transport.push_data(json!({
        "cartCreate": {
            "cart": remote_cart("gid://shop/Cart/co", vec![line("v1", 1, "10.00")]),
            "userErrors": []
        }
    }));

    let session = h
        .api
        .checkout(&[variant_item("v1", 1, "10.00")])
        .await
        .unwrap();

    assert_eq!(session.checkout_url, "https://shop.example.com/checkout/gid://shop/Cart/co");
    assert_eq!(session.total.unwrap().amount, "10.00");

    let (_, variables) = &h.transport.requests()[0];
    assert!(variables["input"].get("buyerIdentity").is_none());

    use cartsync::port::ClientCartReference;
    assert!(h.client_reference.get().is_none());
}

#[tokio::test]
async fn store_hydration_through_the_api_adopts_the_remote_cart() {
    let h = harness(
        Some("tok-123"),
        InMemoryClientReference::holding("gid://shop/Cart/a"),
    );
    h.transport.push_data(json!({
        "cart": remote_cart("gid://shop/Cart/a", vec![line("v1", 2, "5.00")])
    }));
    h.transport.push_data(json!({
        "cartBuyerIdentityUpdate": {
            "cart": remote_cart("gid://shop/Cart/a", vec![line("v1", 2, "5.00")]),
            "userErrors": []
        }
    }));

    // The api is both gateways; the store sees it exactly as the browser
    // store saw the server routes.
    let store = CartStore::new(h.api.clone(), h.api.clone());
    store.hydrate_persistent_cart().await;

    assert!(store.state().has_persistent_cart_session);
    assert_eq!(store.cart().item_count(), 2);
    assert_eq!(
        h.transport.operations(),
        vec!["getCart", "cartBuyerIdentityUpdate"]
    );
}
