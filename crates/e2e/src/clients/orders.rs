//! Customer order operations

use serde_json::json;
use storefront_common::{entity_body, Endpoints, Order, OrderItem, ResourceKind};

use super::{list_body, require_id};
use crate::error::E2eResult;
use crate::transport::ApiTransport;

#[derive(Debug, Clone)]
pub struct OrdersClient {
    api: ApiTransport,
}

impl OrdersClient {
    pub fn new(api: ApiTransport) -> Self {
        Self { api }
    }

    /// Place an order; returns the new order's id
    pub async fn create(&self, items: &[OrderItem], total_amount: f64, token: &str) -> E2eResult<String> {
        let body = json!({ "items": items, "totalAmount": total_amount });
        let response = self.api.post(Endpoints::ORDERS, &body, Some(token)).await?;
        require_id(&response.body, ResourceKind::Order, Endpoints::ORDERS)
    }

    pub async fn mine(&self, token: &str) -> E2eResult<Vec<Order>> {
        let response = self.api.get(Endpoints::MY_ORDERS, Some(token)).await?;
        Ok(serde_json::from_value(list_body(response.body, "orders"))?)
    }

    pub async fn get(&self, order_id: &str, token: &str) -> E2eResult<Order> {
        let response = self.api.get(&Endpoints::order(order_id), Some(token)).await?;
        Ok(serde_json::from_value(
            entity_body(&response.body, ResourceKind::Order).clone(),
        )?)
    }

    pub async fn count(&self, token: &str) -> E2eResult<usize> {
        Ok(self.mine(token).await?.len())
    }
}
