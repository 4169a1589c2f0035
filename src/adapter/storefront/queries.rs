//! GraphQL documents for the storefront and admin APIs.

/// Fields fetched for every cart-returning operation.
const CART_FIELDS: &str = r#"
  id
  checkoutUrl
  estimatedCost {
    totalAmount {
      amount
      currencyCode
    }
  }
  lines(first: 250) {
    edges {
      node {
        id
        quantity
        merchandise {
          ... on ProductVariant {
            id
            title
            priceV2 {
              amount
              currencyCode
            }
            image {
              url
            }
            product {
              title
              handle
            }
          }
        }
      }
    }
  }
"#;

pub fn get_cart() -> String {
    format!(
        r#"query getCart($id: ID!) {{
  cart(id: $id) {{
{CART_FIELDS}
  }}
}}"#
    )
}

pub fn cart_create() -> String {
    format!(
        r#"mutation cartCreate($input: CartInput!) {{
  cartCreate(input: $input) {{
    cart {{
{CART_FIELDS}
    }}
    userErrors {{
      message
    }}
  }}
}}"#
    )
}

pub fn cart_lines_remove() -> String {
    format!(
        r#"mutation cartLinesRemove($cartId: ID!, $lineIds: [ID!]!) {{
  cartLinesRemove(cartId: $cartId, lineIds: $lineIds) {{
    cart {{
{CART_FIELDS}
    }}
    userErrors {{
      message
    }}
  }}
}}"#
    )
}

pub fn cart_lines_add() -> String {
    format!(
        r#"mutation cartLinesAdd($cartId: ID!, $lines: [CartLineInput!]!) {{
  cartLinesAdd(cartId: $cartId, lines: $lines) {{
    cart {{
{CART_FIELDS}
    }}
    userErrors {{
      message
    }}
  }}
}}"#
    )
}

pub fn cart_buyer_identity_update() -> String {
    format!(
        r#"mutation cartBuyerIdentityUpdate($cartId: ID!, $buyerIdentity: CartBuyerIdentityInput!) {{
  cartBuyerIdentityUpdate(cartId: $cartId, buyerIdentity: $buyerIdentity) {{
    cart {{
{CART_FIELDS}
    }}
    userErrors {{
      message
    }}
  }}
}}"#
    )
}

pub const CUSTOMER_BY_TOKEN: &str = r#"
query customerByToken($customerAccessToken: String!) {
  customer(customerAccessToken: $customerAccessToken) {
    id
    email
    firstName
    lastName
  }
}
"#;

pub const CUSTOMER_ACCESS_TOKEN_CREATE: &str = r#"
mutation customerAccessTokenCreate($input: CustomerAccessTokenCreateInput!) {
  customerAccessTokenCreate(input: $input) {
    customerAccessToken {
      accessToken
      expiresAt
    }
    customerUserErrors {
      message
    }
  }
}
"#;

pub const CUSTOMER_CREATE: &str = r#"
mutation customerCreate($input: CustomerCreateInput!) {
  customerCreate(input: $input) {
    customer {
      id
      email
      firstName
      lastName
    }
    customerUserErrors {
      message
    }
  }
}
"#;

pub const CUSTOMER_CART_METAFIELD: &str = r#"
query customerCartMetafield($id: ID!, $namespace: String!, $key: String!) {
  customer(id: $id) {
    id
    metafield(namespace: $namespace, key: $key) {
      value
    }
  }
}
"#;

pub const CUSTOMER_CART_METAFIELD_SET: &str = r#"
mutation customerCartMetafieldSet($input: CustomerInput!) {
  customerUpdate(input: $input) {
    customer {
      id
    }
    userErrors {
      message
    }
  }
}
"#;
