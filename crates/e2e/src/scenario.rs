//! Scenario context
//!
//! A [`Scenario`] bundles everything one test case owns: the capability
//! clients, a browser session and a fresh [`CleanupRegistry`] bound to an
//! admin session. Helpers that create storefront data register it for
//! cleanup immediately. [`run_scenario`] drains the registry whatever the
//! case body did, including panicking.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::FutureExt;
use serde::Serialize;
use storefront_common::{
    DataFactory, HarnessConfig, OrderItem, Product, ProductOverrides, ResourceKind,
    UserOverrides,
};
use tracing::{error, info, warn};

use crate::bootstrap::{bootstrap_cleanup_session, SessionSource};
use crate::browser::{BrowserSession, UiRun};
use crate::cleanup::{CleanupRegistry, DrainReport};
use crate::clients::{AdminClient, AuthClient, CartClient, OrdersClient, ProductsClient};
use crate::error::{E2eError, E2eResult};
use crate::pages::LoginPage;
use crate::poll::PollSettings;
use crate::steps::{UiFlow, UiStep};
use crate::transport::ApiTransport;

/// Capture name of the login redirect check in [`Scenario::login_flow`]
pub const LOGGED_IN: &str = "logged_in";

/// Capture name of the token the UI stored in [`Scenario::login_flow`]
pub const UI_TOKEN: &str = "ui_token";

/// A storefront account created for a scenario
#[derive(Debug, Clone, PartialEq)]
pub struct TestAccount {
    pub user_id: Option<String>,
    pub token: Option<String>,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl TestAccount {
    pub fn token(&self) -> E2eResult<&str> {
        self.token.as_deref().ok_or_else(|| E2eError::MissingField {
            path: self.email.clone(),
            field: "token".to_string(),
        })
    }

    pub fn user_id(&self) -> E2eResult<&str> {
        self.user_id.as_deref().ok_or_else(|| E2eError::MissingField {
            path: self.email.clone(),
            field: "user _id".to_string(),
        })
    }
}

/// One end-to-end test case
#[async_trait]
pub trait ScenarioCase: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str {
        ""
    }

    fn tags(&self) -> &'static [&'static str] {
        &[]
    }

    async fn run(&self, scenario: &mut Scenario) -> E2eResult<()>;
}

/// Per-scenario context
pub struct Scenario {
    config: Arc<HarnessConfig>,
    pub auth: AuthClient,
    pub products: ProductsClient,
    pub cart: CartClient,
    pub orders: OrdersClient,
    pub admin: Arc<AdminClient>,
    pub browser: BrowserSession,
    pub cleanup: CleanupRegistry,
    pub session: SessionSource,
}

impl Scenario {
    /// Context with an unbound registry
    pub fn new(config: Arc<HarnessConfig>) -> E2eResult<Self> {
        let api = ApiTransport::new(&config)?;
        let poll = PollSettings::new(config.request_timeout(), config.poll_interval());

        Ok(Self {
            auth: AuthClient::new(api.clone()),
            products: ProductsClient::new(api.clone()),
            cart: CartClient::new(api.clone(), poll),
            orders: OrdersClient::new(api.clone()),
            admin: Arc::new(AdminClient::new(api)),
            browser: BrowserSession::new(&config),
            cleanup: CleanupRegistry::new(),
            session: SessionSource::Unavailable,
            config,
        })
    }

    /// Context whose registry is bound to an admin session when one can be
    /// obtained
    pub async fn prepare(config: Arc<HarnessConfig>) -> E2eResult<Self> {
        let mut scenario = Self::new(config)?;
        scenario.session = bootstrap_cleanup_session(
            &scenario.auth,
            scenario.admin.clone(),
            &scenario.config,
            &mut scenario.cleanup,
        )
        .await;
        Ok(scenario)
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Register a user through the API
    pub async fn create_user(&mut self, overrides: UserOverrides) -> E2eResult<TestAccount> {
        let payload = DataFactory::user(overrides);
        let session = self.auth.register(&payload).await?;
        self.cleanup.register_user(session.user_id.as_deref());

        Ok(TestAccount {
            user_id: session.user_id,
            token: session.token,
            name: payload.name,
            email: payload.email,
            password: payload.password,
        })
    }

    /// Register an admin through the API.
    ///
    /// The admin becomes the registry's privileged user and its token the
    /// cleanup credential, since resources it creates may only be
    /// deletable by it.
    pub async fn create_admin(&mut self, overrides: UserOverrides) -> E2eResult<TestAccount> {
        let named = overrides.name.is_some();
        let mut payload = DataFactory::admin(overrides, &self.config.admin_creation_code);
        if !named {
            payload.name = format!("TestAdmin_{}", payload.name);
        }

        let session = self.auth.register_admin(&payload).await?;
        self.cleanup
            .register(ResourceKind::User, session.user_id.as_deref(), true);
        if let Some(token) = session.token.as_deref() {
            self.cleanup.bind_session(self.admin.clone(), token);
        }

        Ok(TestAccount {
            user_id: session.user_id,
            token: session.token,
            name: payload.name,
            email: payload.email,
            password: payload.password,
        })
    }

    /// Create a product as `admin_token`
    pub async fn create_product(
        &mut self,
        admin_token: &str,
        overrides: ProductOverrides,
    ) -> E2eResult<Product> {
        let payload = DataFactory::product(overrides);
        let product = self.admin.create_product(&payload, admin_token).await?;
        self.cleanup.register_product(product.id.as_str());
        Ok(product)
    }

    /// Order one unit of `product`, or of a random existing product
    pub async fn create_order(
        &mut self,
        user_token: &str,
        product: Option<&Product>,
    ) -> E2eResult<String> {
        let random;
        let product = match product {
            Some(product) => product,
            None => {
                random = self.products.random_in_stock(0).await?;
                &random
            }
        };

        let items = [OrderItem::new(product.id.as_str(), 1)];
        let order_id = self.orders.create(&items, product.price, user_token).await?;
        self.cleanup.register_order(order_id.as_str());
        Ok(order_id)
    }

    /// A random existing product with at least `min_stock` units
    pub async fn random_product(&self, min_stock: i64) -> E2eResult<Product> {
        self.products.random_in_stock(min_stock).await
    }

    /// Steps that sign `account` in through the login form, then capture
    /// the redirect ([`LOGGED_IN`]) and the stored token ([`UI_TOKEN`])
    pub fn login_flow(account: &TestAccount) -> UiFlow {
        UiFlow::new()
            .then(LoginPage::open())
            .then_all(LoginPage::login(&account.email, &account.password))
            .then(UiStep::url_contains(LOGGED_IN, "/user"))
            .then(UiStep::read_storage(UI_TOKEN, "token"))
    }

    pub async fn run_ui(&mut self, flow: &UiFlow) -> E2eResult<UiRun> {
        self.browser.run(flow).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum ScenarioOutcome {
    Passed,
    Failed(String),
    Panicked(String),
}

impl ScenarioOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, ScenarioOutcome::Passed)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ScenarioOutcome::Passed => None,
            ScenarioOutcome::Failed(msg) | ScenarioOutcome::Panicked(msg) => Some(msg),
        }
    }
}

/// A finished scenario: its outcome and what cleanup did afterwards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioRun {
    pub name: String,
    pub outcome: ScenarioOutcome,
    pub duration_ms: u64,
    pub cleanup: DrainReport,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Run `case` against `scenario`, then drain its registry.
///
/// The outcome reflects the case body only; cleanup failures are logged
/// and reported next to it.
pub async fn run_scenario(case: &dyn ScenarioCase, mut scenario: Scenario) -> ScenarioRun {
    let start = Instant::now();
    info!("Running scenario {}", case.name());

    let outcome = match AssertUnwindSafe(case.run(&mut scenario)).catch_unwind().await {
        Ok(Ok(())) => ScenarioOutcome::Passed,
        Ok(Err(e)) => {
            error!("Scenario {} failed: {}", case.name(), e);
            ScenarioOutcome::Failed(e.to_string())
        }
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            error!("Scenario {} panicked: {}", case.name(), msg);
            ScenarioOutcome::Panicked(msg)
        }
    };

    let cleanup = scenario.cleanup.drain().await;
    if !cleanup.is_clean() {
        warn!("Scenario {} left storefront data behind", case.name());
    }

    ScenarioRun {
        name: case.name().to_string(),
        outcome,
        duration_ms: start.elapsed().as_millis() as u64,
        cleanup,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_payloads() {
        let payload: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(payload.as_ref()), "static");

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");

        let payload: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }

    #[test]
    fn test_login_flow_captures() {
        let account = TestAccount {
            user_id: Some("u1".to_string()),
            token: None,
            name: "n".to_string(),
            email: "e@test.com".to_string(),
            password: "pw".to_string(),
        };
        let flow = Scenario::login_flow(&account);
        assert_eq!(flow.capture_names(), vec![LOGGED_IN, UI_TOKEN]);
        assert!(account.token().is_err());
        assert_eq!(account.user_id().unwrap(), "u1");
    }
}
