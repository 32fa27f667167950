//! Capability clients
//!
//! One typed client per storefront domain. Clients hold a clone of the
//! shared [`ApiTransport`](crate::transport::ApiTransport) and no other
//! state; every operation is a single request.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;

pub use admin::AdminClient;
pub use auth::{AuthClient, AuthSession};
pub use cart::CartClient;
pub use orders::OrdersClient;
pub use products::ProductsClient;

use serde_json::Value;
use storefront_common::{extract_id, ResourceKind};

use crate::error::{E2eError, E2eResult};

/// Identifier of the entity created by a request to `path`
pub(crate) fn require_id(body: &Value, kind: ResourceKind, path: &str) -> E2eResult<String> {
    extract_id(body, kind).ok_or_else(|| E2eError::MissingField {
        path: path.to_string(),
        field: format!("{} _id", kind),
    })
}

/// List endpoints answer either with a bare array or with the array nested
/// under `key` (`{"products": [...], "page": 1}`).
pub(crate) fn list_body(body: Value, key: &str) -> Value {
    match body {
        Value::Object(mut map) => map.remove(key).unwrap_or(Value::Array(Vec::new())),
        other => other,
    }
}
