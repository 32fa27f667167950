//! Registration, login and profile operations

use serde_json::{json, Value};
use storefront_common::{
    entity_body, extract_id, extract_token, Endpoints, NewAdmin, NewUser, ProfileUpdate,
    ResourceKind, UserProfile,
};
use tracing::debug;

use crate::error::E2eResult;
use crate::transport::ApiTransport;

/// Identity and credential returned by register/login
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub user_id: Option<String>,
    pub token: Option<String>,
    pub body: Value,
}

impl AuthSession {
    fn from_body(body: Value) -> Self {
        Self {
            user_id: extract_id(&body, ResourceKind::User),
            token: extract_token(&body),
            body,
        }
    }

    /// The user document, whether or not the API nested it
    pub fn user(&self) -> &Value {
        entity_body(&self.body, ResourceKind::User)
    }
}

#[derive(Debug, Clone)]
pub struct AuthClient {
    api: ApiTransport,
}

impl AuthClient {
    pub fn new(api: ApiTransport) -> Self {
        Self { api }
    }

    pub async fn register(&self, user: &NewUser) -> E2eResult<AuthSession> {
        let response = self.api.post(Endpoints::REGISTER, user, None).await?;
        Ok(AuthSession::from_body(response.body))
    }

    /// Register an administrator; `admin_code` gates the elevation
    pub async fn register_admin(&self, admin: &NewAdmin) -> E2eResult<AuthSession> {
        let body = json!({
            "name": admin.name,
            "email": admin.email,
            "password": admin.password,
            "adminCode": admin.admin_code,
        });
        let response = self.api.post(Endpoints::ADMIN_REGISTER, &body, None).await?;
        Ok(AuthSession::from_body(response.body))
    }

    pub async fn login(&self, email: &str, password: &str) -> E2eResult<AuthSession> {
        let body = json!({ "email": email, "password": password });
        let response = self.api.post(Endpoints::LOGIN, &body, None).await?;
        Ok(AuthSession::from_body(response.body))
    }

    /// Login that reports failure as `None` instead of an error
    pub async fn login_or_none(&self, email: &str, password: &str) -> Option<AuthSession> {
        match self.login(email, password).await {
            Ok(session) => Some(session),
            Err(e) => {
                debug!("Login for {} failed: {}", email, e);
                None
            }
        }
    }

    pub async fn get_profile(&self, token: &str) -> E2eResult<UserProfile> {
        let response = self.api.get(Endpoints::PROFILE, Some(token)).await?;
        Ok(serde_json::from_value(
            entity_body(&response.body, ResourceKind::User).clone(),
        )?)
    }

    pub async fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> E2eResult<UserProfile> {
        let response = self.api.put(Endpoints::PROFILE, update, Some(token)).await?;
        Ok(serde_json::from_value(
            entity_body(&response.body, ResourceKind::User).clone(),
        )?)
    }
}
