//! Test documents.

use serde_json::{Value, json};

/// Index holding [`products`].
pub const PRODUCTS: &str = "products";

/// Three products: two acme laptops and one globex lamp.
pub fn products() -> Vec<(&'static str, Value)> {
    vec![
        (
            "p1",
            json!({"name": "Laptop Pro", "price": 1999, "brand": "acme"}),
        ),
        (
            "p2",
            json!({"name": "Laptop Air", "price": 999, "brand": "acme"}),
        ),
        (
            "p3",
            json!({"name": "Desk Lamp", "price": 49, "brand": "globex"}),
        ),
    ]
}

/// A user with an API token that must never be returned by search.
pub fn user_with_secret() -> Value {
    json!({
        "email": "Ada@Example.com",
        "name": "ada",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "token": "s3cr3t"
    })
}
