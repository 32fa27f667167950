//! Public product catalogue

use rand::seq::SliceRandom;
use storefront_common::{Endpoints, Product};

use super::list_body;
use crate::error::{E2eError, E2eResult};
use crate::transport::{ApiRequest, ApiTransport};

#[derive(Debug, Clone)]
pub struct ProductsClient {
    api: ApiTransport,
}

impl ProductsClient {
    pub fn new(api: ApiTransport) -> Self {
        Self { api }
    }

    /// One page of the catalogue
    pub async fn list(&self, page: u32, limit: u32) -> E2eResult<Vec<Product>> {
        let request = ApiRequest::get(Endpoints::PRODUCTS)
            .query("page", page)
            .query("limit", limit);
        let response = self.api.execute(request).await?;
        Ok(serde_json::from_value(list_body(response.body, "products"))?)
    }

    pub async fn all(&self) -> E2eResult<Vec<Product>> {
        self.list(1, 1000).await
    }

    pub async fn get(&self, product_id: &str) -> E2eResult<Product> {
        let response = self.api.get(&Endpoints::product(product_id), None).await?;
        response.into_json()
    }

    pub async fn search(&self, query: &str) -> E2eResult<Vec<Product>> {
        let request = ApiRequest::get(Endpoints::PRODUCT_SEARCH).query("query", query);
        let response = self.api.execute(request).await?;
        Ok(serde_json::from_value(list_body(response.body, "products"))?)
    }

    /// A random existing product with at least `min_stock` units, so that
    /// concurrent scenarios rarely touch the same product.
    pub async fn random_in_stock(&self, min_stock: i64) -> E2eResult<Product> {
        let products = self.all().await?;
        let available: Vec<&Product> = products.iter().filter(|p| p.stock >= min_stock).collect();

        available
            .choose(&mut rand::thread_rng())
            .map(|product| (*product).clone())
            .ok_or(E2eError::NoProductsAvailable(min_stock))
    }
}
