//! Registration and login

use async_trait::async_trait;
use storefront_common::{DataFactory, Urls, UserOverrides};

use crate::error::{ensure, E2eError, E2eResult};
use crate::pages::{HomePage, LoginPage, RegisterPage};
use crate::scenario::{Scenario, ScenarioCase, LOGGED_IN, UI_TOKEN};
use crate::steps::{UiFlow, UiStep};

pub struct RegisterNewUser;

#[async_trait]
impl ScenarioCase for RegisterNewUser {
    fn name(&self) -> &'static str {
        "register_new_user"
    }

    fn description(&self) -> &'static str {
        "Registering through the form creates an account the API can log in with"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["auth", "smoke"]
    }

    async fn run(&self, s: &mut Scenario) -> E2eResult<()> {
        let user = DataFactory::user(UserOverrides::default());
        let existed = s.auth.login_or_none(&user.email, &user.password).await.is_some();

        let flow = UiFlow::new()
            .then(RegisterPage::open())
            .then_all(RegisterPage::register(&user.name, &user.email, &user.password))
            .then(RegisterPage::success_modal_visible("success_modal"))
            .then(RegisterPage::click_modal_login())
            .then(UiStep::url_contains("on_login", Urls::LOGIN));
        let ui = s.run_ui(&flow).await;

        // The account may exist even if a later UI step failed
        let created = s.auth.login_or_none(&user.email, &user.password).await;
        if let Some(session) = &created {
            s.cleanup.register_user(session.user_id.as_deref());
        }
        let ui = ui?;

        ensure(!existed, "email should not exist before registration")?;
        ensure(ui.flag("success_modal"), "success modal should appear after registering")?;
        ensure(ui.flag("on_login"), "modal login button should lead to the login page")?;
        ensure(created.is_some(), "API should accept the new credentials")
    }
}

pub struct LoginValidCredentials;

#[async_trait]
impl ScenarioCase for LoginValidCredentials {
    fn name(&self) -> &'static str {
        "login_valid_credentials"
    }

    fn description(&self) -> &'static str {
        "Logging in through the form stores a token the API accepts"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["auth", "smoke"]
    }

    async fn run(&self, s: &mut Scenario) -> E2eResult<()> {
        let account = s.create_user(UserOverrides::default()).await?;

        let flow = Scenario::login_flow(&account).then(HomePage::authenticated("authenticated"));
        let ui = s.run_ui(&flow).await?;

        ensure(ui.flag(LOGGED_IN), "should redirect to the user area after login")?;
        ensure(ui.flag("authenticated"), "header should show the signed-in state")?;

        let token = ui
            .text(UI_TOKEN)
            .ok_or_else(|| E2eError::AssertionFailed("UI stored no token".to_string()))?;
        let profile = s.auth.get_profile(token).await?;
        ensure(
            profile.email.eq_ignore_ascii_case(&account.email),
            format!(
                "UI token should belong to {}, API says {}",
                account.email, profile.email
            ),
        )
    }
}

pub struct LoginInvalidPassword;

#[async_trait]
impl ScenarioCase for LoginInvalidPassword {
    fn name(&self) -> &'static str {
        "login_invalid_password"
    }

    fn description(&self) -> &'static str {
        "A wrong password shows an error and keeps the user on the login page"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["auth"]
    }

    async fn run(&self, s: &mut Scenario) -> E2eResult<()> {
        let account = s.create_user(UserOverrides::default()).await?;
        let wrong_password = "WrongPassword123";

        let flow = UiFlow::new()
            .then(LoginPage::open())
            .then_all(LoginPage::login(&account.email, wrong_password))
            .then(LoginPage::error_visible("error"))
            .then(UiStep::url_contains("on_login", Urls::LOGIN));
        let ui = s.run_ui(&flow).await?;

        let rejected = s.auth.login_or_none(&account.email, wrong_password).await.is_none();

        ensure(ui.flag("error"), "error message should be shown for a wrong password")?;
        ensure(ui.flag("on_login"), "should stay on the login page after a failed login")?;
        ensure(rejected, "API should reject the wrong password too")
    }
}

pub struct RegisterExistingEmail;

#[async_trait]
impl ScenarioCase for RegisterExistingEmail {
    fn name(&self) -> &'static str {
        "register_existing_email"
    }

    fn description(&self) -> &'static str {
        "Registering with a taken email shows an error and leaves the account alone"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["auth"]
    }

    async fn run(&self, s: &mut Scenario) -> E2eResult<()> {
        let existing = s.create_user(UserOverrides::default()).await?;

        let flow = UiFlow::new()
            .then(RegisterPage::open())
            .then_all(RegisterPage::register(
                "New User",
                &existing.email,
                "DifferentPass123",
            ))
            .then(RegisterPage::error_visible("error"));
        let ui = s.run_ui(&flow).await?;

        // The existing password must still work
        let still_valid = s.auth.login_or_none(&existing.email, &existing.password).await;

        ensure(ui.flag("error"), "error message should be shown for a duplicate email")?;
        ensure(
            still_valid.is_some(),
            "existing account should keep its password after the rejected registration",
        )
    }
}
