//! Shopping cart operations

use serde_json::{json, Value};
use storefront_common::{Cart, Endpoints};
use tracing::debug;

use crate::error::E2eResult;
use crate::poll::{poll_until, PollSettings};
use crate::transport::{ApiRequest, ApiTransport};

#[derive(Debug, Clone)]
pub struct CartClient {
    api: ApiTransport,
    poll: PollSettings,
}

impl CartClient {
    pub fn new(api: ApiTransport, poll: PollSettings) -> Self {
        Self { api, poll }
    }

    pub async fn get(&self, token: &str) -> E2eResult<Cart> {
        let response = self.api.get(Endpoints::CART, Some(token)).await?;
        parse_cart(response.body)
    }

    pub async fn add(&self, product_id: &str, quantity: u32, token: &str) -> E2eResult<Cart> {
        let body = json!({ "productId": product_id, "quantity": quantity });
        let response = self.api.post(Endpoints::CART, &body, Some(token)).await?;
        parse_cart(response.body)
    }

    pub async fn update_quantity(
        &self,
        product_id: &str,
        quantity: u32,
        token: &str,
    ) -> E2eResult<Cart> {
        let body = json!({ "quantity": quantity });
        let response = self
            .api
            .put(&Endpoints::cart_update(product_id), &body, Some(token))
            .await?;
        parse_cart(response.body)
    }

    pub async fn remove(&self, product_id: &str, token: &str) -> E2eResult<Cart> {
        let response = self
            .api
            .delete(&Endpoints::cart_item(product_id), Some(token))
            .await?;
        parse_cart(response.body)
    }

    /// Empty the cart. An already-empty cart may answer with an error
    /// status, so the outcome is only logged.
    pub async fn clear(&self, token: &str) {
        let request = ApiRequest::delete(Endpoints::CART_CLEAR).bearer(Some(token));
        match self.api.execute_unchecked(request).await {
            Ok(response) if !response.is_success() => {
                debug!("Cart clear answered {}", response.status)
            }
            Ok(_) => {}
            Err(e) => debug!("Cart clear failed: {}", e),
        }
    }

    /// Number of distinct items in the cart
    pub async fn items_count(&self, token: &str) -> E2eResult<usize> {
        Ok(self.get(token).await?.items.len())
    }

    pub async fn item_quantity(&self, product_id: &str, token: &str) -> E2eResult<Option<u32>> {
        Ok(self.get(token).await?.quantity_of(product_id))
    }

    /// Wait for the API to report `expected` units of a product. Returns the
    /// last observed quantity (0 when the product never showed up).
    pub async fn wait_for_item_quantity(&self, product_id: &str, expected: u32, token: &str) -> u32 {
        poll_until(
            self.poll,
            || async move { Ok(self.item_quantity(product_id, token).await?.unwrap_or(0)) },
            |quantity| *quantity == expected,
        )
        .await
        .unwrap_or(0)
    }

    /// Wait for the API to report `expected` distinct items. Returns the last
    /// observed count.
    pub async fn wait_for_items_count(&self, expected: usize, token: &str) -> usize {
        poll_until(
            self.poll,
            || async move { self.items_count(token).await },
            |count| *count == expected,
        )
        .await
        .unwrap_or(0)
    }
}

fn parse_cart(body: Value) -> E2eResult<Cart> {
    let body = match body {
        Value::Object(mut map) if map.contains_key("cart") => map.remove("cart").unwrap_or_default(),
        Value::Null => return Ok(Cart::default()),
        other => other,
    };
    Ok(serde_json::from_value(body)?)
}
