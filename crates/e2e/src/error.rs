//! Error types for E2E testing

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("{method} {path} returned {status}: {body}")]
    Status {
        method: String,
        path: String,
        status: u16,
        body: String,
    },

    #[error("Response from {path} is missing {field}")]
    MissingField { path: String, field: String },

    #[error("Storefront not reachable after {0} attempts")]
    StorefrontUnavailable(usize),

    #[error("Playwright not found. Install with: npx playwright install")]
    PlaywrightNotFound,

    #[error("Playwright error: {0}")]
    Playwright(String),

    #[error("Browser step failed: {0}")]
    Browser(String),

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("No products available with stock >= {0}")]
    NoProductsAvailable(i64),

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Common(#[from] storefront_common::Error),
}

impl E2eError {
    /// HTTP status of a rejected request, if that is what this error is
    pub fn status(&self) -> Option<u16> {
        match self {
            E2eError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type E2eResult<T> = Result<T, E2eError>;

/// Fail a scenario with `message` unless `condition` holds
pub fn ensure(condition: bool, message: impl Into<String>) -> E2eResult<()> {
    if condition {
        Ok(())
    } else {
        Err(E2eError::AssertionFailed(message.into()))
    }
}
