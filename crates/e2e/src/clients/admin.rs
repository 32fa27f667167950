//! Administrative operations on products, users and orders

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use storefront_common::{
    entity_body, Endpoints, NewProduct, Order, OrderStatus, Product, ResourceKind, UserProfile,
};

use super::{list_body, require_id};
use crate::cleanup::ResourceDeleter;
use crate::error::E2eResult;
use crate::transport::ApiTransport;

#[derive(Debug, Clone)]
pub struct AdminClient {
    api: ApiTransport,
}

impl AdminClient {
    pub fn new(api: ApiTransport) -> Self {
        Self { api }
    }

    // Products

    pub async fn products(&self, token: &str) -> E2eResult<Vec<Product>> {
        let response = self.api.get(Endpoints::ADMIN_PRODUCTS, Some(token)).await?;
        Ok(serde_json::from_value(list_body(response.body, "products"))?)
    }

    pub async fn create_product(&self, product: &NewProduct, token: &str) -> E2eResult<Product> {
        let response = self
            .api
            .post(Endpoints::ADMIN_PRODUCTS, product, Some(token))
            .await?;
        require_id(&response.body, ResourceKind::Product, Endpoints::ADMIN_PRODUCTS)?;
        Ok(serde_json::from_value(
            entity_body(&response.body, ResourceKind::Product).clone(),
        )?)
    }

    pub async fn update_product<B: Serialize + ?Sized>(
        &self,
        product_id: &str,
        changes: &B,
        token: &str,
    ) -> E2eResult<Product> {
        let response = self
            .api
            .put(&Endpoints::admin_product(product_id), changes, Some(token))
            .await?;
        Ok(serde_json::from_value(
            entity_body(&response.body, ResourceKind::Product).clone(),
        )?)
    }

    pub async fn delete_product(&self, product_id: &str, token: &str) -> E2eResult<()> {
        self.api
            .delete(&Endpoints::admin_product(product_id), Some(token))
            .await?;
        Ok(())
    }

    // Users

    pub async fn users(&self, token: &str) -> E2eResult<Vec<UserProfile>> {
        let response = self.api.get(Endpoints::ADMIN_USERS, Some(token)).await?;
        Ok(serde_json::from_value(list_body(response.body, "users"))?)
    }

    /// The user document out of the details view, which may nest it under
    /// `user` next to the user's orders
    pub async fn user_details(&self, user_id: &str, token: &str) -> E2eResult<UserProfile> {
        let response = self
            .api
            .get(&Endpoints::admin_user_details(user_id), Some(token))
            .await?;
        Ok(serde_json::from_value(
            entity_body(&response.body, ResourceKind::User).clone(),
        )?)
    }

    pub async fn update_user<B: Serialize + ?Sized>(
        &self,
        user_id: &str,
        changes: &B,
        token: &str,
    ) -> E2eResult<UserProfile> {
        let response = self
            .api
            .put(&Endpoints::admin_user(user_id), changes, Some(token))
            .await?;
        Ok(serde_json::from_value(
            entity_body(&response.body, ResourceKind::User).clone(),
        )?)
    }

    pub async fn delete_user(&self, user_id: &str, token: &str) -> E2eResult<()> {
        self.api
            .delete(&Endpoints::admin_user(user_id), Some(token))
            .await?;
        Ok(())
    }

    // Orders

    pub async fn orders(&self, token: &str) -> E2eResult<Vec<Order>> {
        let response = self.api.get(Endpoints::ADMIN_ORDERS, Some(token)).await?;
        Ok(serde_json::from_value(list_body(response.body, "orders"))?)
    }

    pub async fn order(&self, order_id: &str, token: &str) -> E2eResult<Option<Order>> {
        Ok(self
            .orders(token)
            .await?
            .into_iter()
            .find(|order| order.id == order_id))
    }

    pub async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        token: &str,
    ) -> E2eResult<Order> {
        let path = Endpoints::admin_order(order_id);
        let response = self
            .api
            .put(&path, &json!({ "status": status }), Some(token))
            .await?;
        require_id(&response.body, ResourceKind::Order, &path)?;
        Ok(serde_json::from_value(
            entity_body(&response.body, ResourceKind::Order).clone(),
        )?)
    }

    pub async fn delete_order(&self, order_id: &str, token: &str) -> E2eResult<()> {
        self.api
            .delete(&Endpoints::admin_order(order_id), Some(token))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ResourceDeleter for AdminClient {
    async fn delete_user(&self, id: &str, token: &str) -> E2eResult<()> {
        AdminClient::delete_user(self, id, token).await
    }

    async fn delete_product(&self, id: &str, token: &str) -> E2eResult<()> {
        AdminClient::delete_product(self, id, token).await
    }

    async fn delete_order(&self, id: &str, token: &str) -> E2eResult<()> {
        AdminClient::delete_order(self, id, token).await
    }
}
