//! Core types for the storefront harness

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of a resource the harness creates and later deletes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    User,
    Product,
    Order,
}

impl ResourceKind {
    /// Key under which the storefront nests an entity of this kind
    /// when it does not return it flat (`{"user": {"_id": ..}}`).
    pub fn envelope_key(&self) -> &'static str {
        match self {
            ResourceKind::User => "user",
            ResourceKind::Product => "product",
            ResourceKind::Order => "order",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.envelope_key())
    }
}

/// A (kind, identifier) pair tracked for cleanup
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceHandle {
    pub kind: ResourceKind,
    pub id: String,
}

impl ResourceHandle {
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self { kind, id: id.into() }
    }
}

impl std::fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

/// Order lifecycle states understood by the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product as returned by the storefront API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "bestOffer", default)]
    pub best_offer: bool,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Reference to a product inside carts and orders: either the bare id
/// or the populated document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    Id(String),
    Embedded(Product),
}

impl ProductRef {
    pub fn id(&self) -> &str {
        match self {
            ProductRef::Id(id) => id,
            ProductRef::Embedded(product) => &product.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: ProductRef,
    #[serde(default)]
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Quantity of the given product, if it is in the cart
    pub fn quantity_of(&self, product_id: &str) -> Option<u32> {
        self.items
            .iter()
            .find(|item| item.product.id() == product_id)
            .map(|item| item.quantity)
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.quantity_of(product_id).is_some()
    }
}

/// Line of an order, also used as the order creation payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product: ProductRef,
    pub quantity: u32,
}

impl OrderItem {
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product: ProductRef::Id(product_id.into()),
            quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "totalAmount", default)]
    pub total_amount: f64,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn has_status(&self, status: OrderStatus) -> bool {
        self.status.eq_ignore_ascii_case(status.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

/// Shape of a creation/login response body.
///
/// The storefront answers either with the entity itself
/// (`{"_id": "..", "token": ".."}`) or with the entity nested under its
/// kind (`{"user": {"_id": ".."}, "token": ".."}`). Classification checks,
/// in order:
///
/// 1. a non-empty top-level `_id` string
/// 2. a non-empty `_id` string under the kind's envelope key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape<'a> {
    Flat { id: &'a str },
    Enveloped { key: &'static str, id: &'a str },
    Unrecognized,
}

impl<'a> ResponseShape<'a> {
    pub fn classify(body: &'a Value, kind: ResourceKind) -> Self {
        if let Some(id) = non_empty_str(body.get("_id")) {
            return ResponseShape::Flat { id };
        }

        let key = kind.envelope_key();
        if let Some(id) = body.get(key).and_then(|inner| non_empty_str(inner.get("_id"))) {
            return ResponseShape::Enveloped { key, id };
        }

        ResponseShape::Unrecognized
    }

    pub fn id(&self) -> Option<&'a str> {
        match self {
            ResponseShape::Flat { id } | ResponseShape::Enveloped { id, .. } => Some(id),
            ResponseShape::Unrecognized => None,
        }
    }
}

/// Identifier of the entity of `kind` carried by a response body
pub fn extract_id(body: &Value, kind: ResourceKind) -> Option<String> {
    ResponseShape::classify(body, kind).id().map(str::to_string)
}

/// Bearer token carried by an auth response body
pub fn extract_token(body: &Value) -> Option<String> {
    non_empty_str(body.get("token")).map(str::to_string)
}

/// The entity part of a response: the envelope content if present,
/// otherwise the whole body.
pub fn entity_body(body: &Value, kind: ResourceKind) -> &Value {
    match body.get(kind.envelope_key()) {
        Some(inner) if inner.is_object() => inner,
        _ => body,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
