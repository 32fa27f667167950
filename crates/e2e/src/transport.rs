//! HTTP transport for the storefront API
//!
//! A thin layer over `reqwest`: joins paths onto the API base URL, attaches
//! the bearer credential when one is given, decodes JSON bodies and turns
//! non-2xx answers into [`E2eError::Status`].

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use storefront_common::HarnessConfig;

use crate::error::{E2eError, E2eResult};

/// A request to the storefront API
#[derive(Debug, Clone)]
pub struct ApiRequest<'a> {
    method: Method,
    path: &'a str,
    token: Option<&'a str>,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl<'a> ApiRequest<'a> {
    pub fn new(method: Method, path: &'a str) -> Self {
        Self {
            method,
            path,
            token: None,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: &'a str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &'a str) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: &'a str) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: &'a str) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: &'a str) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a bearer credential; `None` leaves the request anonymous
    pub fn bearer(mut self, token: Option<&'a str>) -> Self {
        self.token = token;
        self
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> E2eResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// Status and decoded body of an API answer
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> E2eResult<T> {
        Ok(T::deserialize(&self.body)?)
    }

    pub fn into_json<T: DeserializeOwned>(self) -> E2eResult<T> {
        Ok(serde_json::from_value(self.body)?)
    }
}

/// Storefront API transport
#[derive(Debug, Clone)]
pub struct ApiTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ApiTransport {
    pub fn new(config: &HarnessConfig) -> E2eResult<Self> {
        Self::with_base_url(config.api_root(), config.request_timeout())
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> E2eResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Send a request; non-2xx answers become [`E2eError::Status`]
    pub async fn execute(&self, request: ApiRequest<'_>) -> E2eResult<ApiResponse> {
        let method = request.method.clone();
        let path = request.path.to_string();
        let response = self.execute_unchecked(request).await?;

        if !response.is_success() {
            return Err(E2eError::Status {
                method: method.to_string(),
                path,
                status: response.status,
                body: response.body.to_string(),
            });
        }
        Ok(response)
    }

    /// Send a request and hand back whatever status the API answered with
    pub async fn execute_unchecked(&self, request: ApiRequest<'_>) -> E2eResult<ApiResponse> {
        let mut builder = self
            .client
            .request(request.method.clone(), self.url(request.path))
            .header(ACCEPT, "application/json");

        if let Some(token) = request.token {
            builder = builder.bearer_auth(token);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        debug!("{} {} -> {}", request.method, request.path, status);

        Ok(ApiResponse {
            status,
            body: decode_body(&text),
        })
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> E2eResult<ApiResponse> {
        self.execute(ApiRequest::get(path).bearer(token)).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> E2eResult<ApiResponse> {
        self.execute(ApiRequest::post(path).json(body)?.bearer(token)).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> E2eResult<ApiResponse> {
        self.execute(ApiRequest::put(path).json(body)?.bearer(token)).await
    }

    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> E2eResult<ApiResponse> {
        self.execute(ApiRequest::patch(path).json(body)?.bearer(token)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> E2eResult<ApiResponse> {
        self.execute(ApiRequest::delete(path).bearer(token)).await
    }
}

/// Empty bodies decode to `null`, non-JSON bodies to a JSON string
fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
