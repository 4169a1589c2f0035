//! Remote cart reconciliation: find-or-create, rebinding, line replacement.

use std::sync::Arc;

use serde_json::{json, Value};

use cartsync::adapter::storefront::{map_remote_cart, CartLineInput, CartService};
use cartsync::domain::RemoteCartId;
use cartsync::error::{Error, RemoteError};
use cartsync::testkit::{ScriptedResponse, ScriptedTransport};
use rust_decimal_macros::dec;

const TOKEN: &str = "customer-token";

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
        "estimatedCost": { "totalAmount": { "amount": "0.00", "currencyCode": "USD" } },
        "lines": { "edges": lines }
    })
}

fn service() -> (CartService, Arc<ScriptedTransport>) {
    let transport = Arc::new(ScriptedTransport::new());
    (CartService::new(transport.clone()), transport)
}

fn inputs(variants: &[&str]) -> Vec<CartLineInput> {
    variants
        .iter()
        .map(|v| CartLineInput {
            merchandise_id: format!("gid://shop/ProductVariant/{v}"),
            quantity: 1,
        })
        .collect()
}

#[tokio::test]
async fn read_path_rebinds_and_returns_the_existing_cart() {
    let (service, transport) = service();
    let cart_id = RemoteCartId::new("gid://shop/Cart/a");
    transport.push_data(json!({ "cart": remote_cart("gid://shop/Cart/a", vec![line("1", 2, "5.00")]) }));
    transport.push_data(json!({
        "cartBuyerIdentityUpdate": {
            "cart": remote_cart("gid://shop/Cart/a", vec![line("1", 2, "5.00")]),
            "userErrors": []
        }
    }));

    let cart = service
        .get_or_create_customer_cart(Some(&cart_id), TOKEN, None)
        .await
        .unwrap();

    assert_eq!(cart.id, "gid://shop/Cart/a");
    assert_eq!(
        transport.operations(),
        vec!["getCart", "cartBuyerIdentityUpdate"]
    );
}

#[tokio::test]
async fn vanished_reference_heals_by_creating_a_fresh_cart() {
    let (service, transport) = service();
    let stale = RemoteCartId::new("gid://shop/Cart/expired");
    transport.push_data(json!({ "cart": null }));
    transport.push_data(json!({
        "cartCreate": {
            "cart": remote_cart("gid://shop/Cart/fresh", vec![]),
            "userErrors": []
        }
    }));

    let cart = service
        .get_or_create_customer_cart(Some(&stale), TOKEN, None)
        .await
        .unwrap();

    assert_eq!(cart.id, "gid://shop/Cart/fresh");
    assert_eq!(transport.operations(), vec!["getCart", "cartCreate"]);
}

#[tokio::test]
async fn missing_reference_creates_a_cart_bound_to_the_customer() {
    let (service, transport) = service();
    transport.push_data(json!({
        "cartCreate": {
            "cart": remote_cart("gid://shop/Cart/new", vec![]),
            "userErrors": []
        }
    }));

    service
        .get_or_create_customer_cart(None, TOKEN, None)
        .await
        .unwrap();

    let (_, variables) = &transport.requests()[0];
    assert_eq!(
        variables["input"]["buyerIdentity"]["customerAccessToken"],
        TOKEN
    );
}

#[tokio::test]
async fn replace_path_removes_existing_lines_then_adds_new_ones() {
    let (service, transport) = service();
    let cart_id = RemoteCartId::new("gid://shop/Cart/a");
    let existing = remote_cart("gid://shop/Cart/a", vec![line("old", 1, "2.00")]);
    // get_or_create read, rebind, then replace's own read, remove, add.
    transport.push_data(json!({ "cart": existing }));
    transport.push_data(json!({
        "cartBuyerIdentityUpdate": {
            "cart": remote_cart("gid://shop/Cart/a", vec![line("old", 1, "2.00")]),
            "userErrors": []
        }
    }));
    transport.push_data(json!({ "cart": remote_cart("gid://shop/Cart/a", vec![line("old", 1, "2.00")]) }));
    transport.push_data(json!({
        "cartLinesRemove": {
            "cart": remote_cart("gid://shop/Cart/a", vec![]),
            "userErrors": []
        }
    }));
    transport.push_data(json!({
        "cartLinesAdd": {
            "cart": remote_cart("gid://shop/Cart/a", vec![line("new", 3, "4.00")]),
            "userErrors": []
        }
    }));

    let lines = inputs(&["new"]);
    let cart = service
        .get_or_create_customer_cart(Some(&cart_id), TOKEN, Some(&lines))
        .await
        .unwrap();

    assert_eq!(
        transport.operations(),
        vec![
            "getCart",
            "cartBuyerIdentityUpdate",
            "getCart",
            "cartLinesRemove",
            "cartLinesAdd"
        ]
    );
    let mapped = map_remote_cart(&cart);
    assert_eq!(mapped.item_count(), 3);
    assert_eq!(mapped.total(), dec!(12.00));
}

#[tokio::test]
async fn replacing_with_no_lines_refetches_the_emptied_cart() {
    let (service, transport) = service();
    let cart_id = RemoteCartId::new("gid://shop/Cart/a");
    transport.push_data(json!({ "cart": remote_cart("gid://shop/Cart/a", vec![line("old", 1, "2.00")]) }));
    transport.push_data(json!({
        "cartLinesRemove": {
            "cart": remote_cart("gid://shop/Cart/a", vec![]),
            "userErrors": []
        }
    }));
    transport.push_data(json!({ "cart": remote_cart("gid://shop/Cart/a", vec![]) }));

    let cart = service.replace_cart_lines(&cart_id, &[]).await.unwrap();

    assert!(cart.lines.edges.is_empty());
    assert_eq!(
        transport.operations(),
        vec!["getCart", "cartLinesRemove", "getCart"]
    );
}

#[tokio::test]
async fn add_failure_after_removal_surfaces_the_rejection() {
    let (service, transport) = service();
    let cart_id = RemoteCartId::new("gid://shop/Cart/a");
    transport.push_data(json!({ "cart": remote_cart("gid://shop/Cart/a", vec![line("old", 1, "2.00")]) }));
    transport.push_data(json!({
        "cartLinesRemove": {
            "cart": remote_cart("gid://shop/Cart/a", vec![]),
            "userErrors": []
        }
    }));
    transport.push_data(json!({
        "cartLinesAdd": {
            "cart": null,
            "userErrors": [{ "message": "variant is out of stock" }]
        }
    }));

    let lines = inputs(&["new"]);
    let error = service
        .replace_cart_lines(&cart_id, &lines)
        .await
        .unwrap_err();

    match error {
        Error::Remote(RemoteError::Rejected { message }) => {
            assert_eq!(message, "variant is out of stock");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn replacing_lines_of_a_vanished_cart_is_an_error() {
    let (service, transport) = service();
    let cart_id = RemoteCartId::new("gid://shop/Cart/gone");
    transport.push_data(json!({ "cart": null }));

    let error = service
        .replace_cart_lines(&cart_id, &inputs(&["v1"]))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        Error::Remote(RemoteError::CartVanished { .. })
    ));
}

#[tokio::test]
async fn payload_with_neither_cart_nor_errors_is_a_failure() {
    let (service, transport) = service();
    transport.push_data(json!({
        "cartCreate": { "cart": null, "userErrors": [] }
    }));

    let error = service.create_cart(None, None).await.unwrap_err();

    match error {
        Error::Remote(RemoteError::MissingCart { operation }) => {
            assert_eq!(operation, "cartCreate");
        }
        other => panic!("expected missing cart, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_response_is_a_schema_error() {
    let (service, transport) = service();
    let cart_id = RemoteCartId::new("gid://shop/Cart/a");
    transport.push_data(json!({ "cart": { "id": 42 } }));

    let error = service.cart_by_id(&cart_id).await.unwrap_err();

    match error {
        Error::Remote(RemoteError::Schema { operation, .. }) => {
            assert_eq!(operation, "getCart");
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[tokio::test]
async fn transport_errors_propagate_untouched() {
    let (service, transport) = service();
    transport.push(ScriptedResponse::Error("boom".to_string()));

    let error = service
        .cart_by_id(&RemoteCartId::new("gid://shop/Cart/a"))
        .await
        .unwrap_err();

    assert!(matches!(error, Error::Remote(RemoteError::Api { .. })));
}
