//! Admin session for cleanup
//!
//! The registry needs an admin token before a scenario starts creating
//! data. The shared admin from the configuration is tried first; if it
//! cannot log in, a disposable admin is registered with the admin creation
//! code and tracked as the privileged user so it is deleted last.

use std::sync::Arc;

use storefront_common::{DataFactory, HarnessConfig, ResourceKind, UserOverrides};
use tracing::{debug, error, info, warn};

use crate::cleanup::CleanupRegistry;
use crate::clients::{AdminClient, AuthClient};

/// Password of disposable cleanup admins
pub const CLEANUP_ADMIN_PASSWORD: &str = "CleanupAdmin123";

/// Name prefix of disposable cleanup admins
pub const CLEANUP_ADMIN_PREFIX: &str = "CleanupAdmin_";

/// Where the cleanup session came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSource {
    /// Logged in with the configured admin account
    SharedAdmin,
    /// Registered a throwaway admin, tracked as the privileged user
    DisposableAdmin { user_id: String },
    /// No admin token could be obtained; cleanup will be skipped
    Unavailable,
}

impl SessionSource {
    pub fn is_available(&self) -> bool {
        !matches!(self, SessionSource::Unavailable)
    }
}

/// Bind an admin session to `registry`, provisioning one if needed.
///
/// Never fails: when neither path yields a token the registry stays unbound
/// and its drain will only report what leaked.
pub async fn bootstrap_cleanup_session(
    auth: &AuthClient,
    admin: Arc<AdminClient>,
    config: &HarnessConfig,
    registry: &mut CleanupRegistry,
) -> SessionSource {
    match auth.login(&config.admin.email, &config.admin.password).await {
        Ok(session) => match session.token.as_deref() {
            Some(token) if registry.bind_session(admin.clone(), token) => {
                debug!("Cleanup session bound to shared admin {}", config.admin.email);
                return SessionSource::SharedAdmin;
            }
            _ => warn!("Shared admin login returned no token, creating a cleanup admin"),
        },
        Err(e) => warn!(
            "Shared admin login failed: {}, creating a cleanup admin",
            e
        ),
    }

    let mut payload = DataFactory::admin(
        UserOverrides::default().password(CLEANUP_ADMIN_PASSWORD),
        &config.admin_creation_code,
    );
    payload.name = format!("{}{}", CLEANUP_ADMIN_PREFIX, payload.name);

    let session = match auth.register_admin(&payload).await {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to create cleanup admin: {}, cleanup is disabled", e);
            return SessionSource::Unavailable;
        }
    };

    if let Some(user_id) = session.user_id.as_deref() {
        registry.register(ResourceKind::User, user_id, true);
    }

    match (session.user_id, session.token) {
        (Some(user_id), Some(token)) if registry.bind_session(admin, &token) => {
            info!("Cleanup session bound to disposable admin {}", user_id);
            SessionSource::DisposableAdmin { user_id }
        }
        _ => {
            warn!("Cleanup admin response lacked an id or token, cleanup is disabled");
            SessionSource::Unavailable
        }
    }
}
