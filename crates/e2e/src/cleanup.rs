//! Test resource registry
//!
//! Every user, product and order a scenario creates is registered here.
//! At scenario end [`CleanupRegistry::drain`] deletes them through an
//! administrative session in dependency order:
//!
//! 1. orders (they reference users and products)
//! 2. products
//! 3. ordinary users
//! 4. the privileged user whose token performs the deletions
//!
//! Deletion failures are recorded and logged, never propagated. Draining
//! always leaves the registry empty and unbound.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use storefront_common::{ResourceHandle, ResourceKind};
use tracing::{debug, info, warn};

use crate::error::E2eResult;

/// Channel able to delete storefront resources with an admin token
#[async_trait]
pub trait ResourceDeleter: Send + Sync {
    async fn delete_user(&self, id: &str, token: &str) -> E2eResult<()>;
    async fn delete_product(&self, id: &str, token: &str) -> E2eResult<()>;
    async fn delete_order(&self, id: &str, token: &str) -> E2eResult<()>;
}

struct AdminSession {
    deleter: Arc<dyn ResourceDeleter>,
    token: String,
}

/// Outcome of one deletion attempted during a drain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletionRecord {
    pub handle: ResourceHandle,
    pub privileged: bool,
    pub outcome: Result<(), String>,
}

impl DeletionRecord {
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Resources left behind because no admin session was bound
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LeakSummary {
    pub users: usize,
    pub products: usize,
    pub orders: usize,
}

impl LeakSummary {
    pub fn total(&self) -> usize {
        self.users + self.products + self.orders
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl fmt::Display for LeakSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            (self.users, "user"),
            (self.products, "product"),
            (self.orders, "order"),
        ]
        .iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, noun)| {
            if *count == 1 {
                format!("1 {}", noun)
            } else {
                format!("{} {}s", count, noun)
            }
        })
        .collect();

        if parts.is_empty() {
            f.write_str("nothing")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

/// What a drain did
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DrainReport {
    /// Attempted deletions, in execution order
    pub deletions: Vec<DeletionRecord>,
    /// Set when the drain ran without a session and deleted nothing
    pub skipped: Option<LeakSummary>,
}

impl DrainReport {
    pub fn failures(&self) -> impl Iterator<Item = &DeletionRecord> {
        self.deletions.iter().filter(|record| !record.succeeded())
    }

    /// True when every tracked resource was deleted
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
            && self.skipped.map_or(true, |leak| leak.is_empty())
    }
}

/// Per-scenario registry of created resources
#[derive(Default)]
pub struct CleanupRegistry {
    users: Vec<String>,
    products: Vec<String>,
    orders: Vec<String>,
    privileged: Option<String>,
    session: Option<AdminSession>,
}

impl fmt::Debug for CleanupRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleanupRegistry")
            .field("users", &self.users)
            .field("products", &self.products)
            .field("orders", &self.orders)
            .field("privileged", &self.privileged)
            .field("bound", &self.is_bound())
            .finish()
    }
}

impl CleanupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a resource for deletion.
    ///
    /// Empty or absent ids and ids already tracked for `kind` are ignored.
    /// `privileged` only applies to users: the id becomes the sole
    /// privileged principal, and a previously privileged user is moved to
    /// the ordinary user queue. Returns whether anything changed.
    pub fn register<'a>(
        &mut self,
        kind: ResourceKind,
        id: impl Into<Option<&'a str>>,
        privileged: bool,
    ) -> bool {
        let id = match id.into() {
            Some(id) if !id.trim().is_empty() => id,
            _ => return false,
        };

        if privileged && kind == ResourceKind::User {
            return self.register_privileged(id);
        }

        if kind == ResourceKind::User && self.privileged.as_deref() == Some(id) {
            return false;
        }

        let queue = self.queue_mut(kind);
        if queue.iter().any(|existing| existing == id) {
            return false;
        }
        queue.push(id.to_string());
        debug!("Tracking {} {} for cleanup", kind, id);
        true
    }

    fn register_privileged(&mut self, id: &str) -> bool {
        if self.privileged.as_deref() == Some(id) {
            return false;
        }

        self.users.retain(|existing| existing != id);
        if let Some(previous) = self.privileged.replace(id.to_string()) {
            debug!("Privileged user {} demoted to ordinary cleanup", previous);
            self.users.push(previous);
        }
        debug!("Tracking privileged user {} for cleanup", id);
        true
    }

    pub fn register_user<'a>(&mut self, id: impl Into<Option<&'a str>>) -> bool {
        self.register(ResourceKind::User, id, false)
    }

    pub fn register_product<'a>(&mut self, id: impl Into<Option<&'a str>>) -> bool {
        self.register(ResourceKind::Product, id, false)
    }

    pub fn register_order<'a>(&mut self, id: impl Into<Option<&'a str>>) -> bool {
        self.register(ResourceKind::Order, id, false)
    }

    /// Stop tracking a resource the scenario already deleted itself
    pub fn forget(&mut self, kind: ResourceKind, id: &str) -> bool {
        if kind == ResourceKind::User && self.privileged.as_deref() == Some(id) {
            self.privileged = None;
            return true;
        }
        let queue = self.queue_mut(kind);
        let before = queue.len();
        queue.retain(|existing| existing != id);
        queue.len() != before
    }

    /// Attach the session used for deletions. The last binding wins; an
    /// empty token leaves the current binding untouched.
    pub fn bind_session(&mut self, deleter: Arc<dyn ResourceDeleter>, token: &str) -> bool {
        if token.trim().is_empty() {
            warn!("Refusing to bind a cleanup session without a token");
            return false;
        }
        self.session = Some(AdminSession {
            deleter,
            token: token.to_string(),
        });
        true
    }

    pub fn is_bound(&self) -> bool {
        self.session.is_some()
    }

    /// Token of the bound session
    pub fn session_token(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.token.as_str())
    }

    /// Ordinary ids queued for `kind`, in registration order
    pub fn pending(&self, kind: ResourceKind) -> &[String] {
        match kind {
            ResourceKind::User => &self.users,
            ResourceKind::Product => &self.products,
            ResourceKind::Order => &self.orders,
        }
    }

    pub fn privileged(&self) -> Option<&str> {
        self.privileged.as_deref()
    }

    /// Counts per kind of everything still tracked
    pub fn leak_summary(&self) -> LeakSummary {
        LeakSummary {
            users: self.users.len() + usize::from(self.privileged.is_some()),
            products: self.products.len(),
            orders: self.orders.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.leak_summary().is_empty()
    }

    fn queue_mut(&mut self, kind: ResourceKind) -> &mut Vec<String> {
        match kind {
            ResourceKind::User => &mut self.users,
            ResourceKind::Product => &mut self.products,
            ResourceKind::Order => &mut self.orders,
        }
    }

    /// Delete every tracked resource and reset the registry.
    pub async fn drain(&mut self) -> DrainReport {
        let summary = self.leak_summary();
        let orders = std::mem::take(&mut self.orders);
        let products = std::mem::take(&mut self.products);
        let users = std::mem::take(&mut self.users);
        let privileged = self.privileged.take();

        let Some(session) = self.session.take() else {
            if !summary.is_empty() {
                warn!(
                    "No admin session for cleanup, leaving {} behind",
                    summary
                );
            }
            return DrainReport {
                deletions: Vec::new(),
                skipped: Some(summary),
            };
        };

        let mut deletions = Vec::with_capacity(summary.total());
        for id in orders {
            deletions.push(session.delete(ResourceKind::Order, id, false).await);
        }
        for id in products {
            deletions.push(session.delete(ResourceKind::Product, id, false).await);
        }
        for id in users {
            deletions.push(session.delete(ResourceKind::User, id, false).await);
        }
        if let Some(id) = privileged {
            deletions.push(session.delete(ResourceKind::User, id, true).await);
        }

        let failed = deletions.iter().filter(|record| !record.succeeded()).count();
        if failed > 0 {
            warn!(
                "Cleanup finished with {} of {} deletions failing",
                failed,
                deletions.len()
            );
        } else if !deletions.is_empty() {
            info!("Cleaned up {} test resources", deletions.len());
        }

        DrainReport {
            deletions,
            skipped: None,
        }
    }
}

impl AdminSession {
    async fn delete(&self, kind: ResourceKind, id: String, privileged: bool) -> DeletionRecord {
        let result = match kind {
            ResourceKind::User => self.deleter.delete_user(&id, &self.token).await,
            ResourceKind::Product => self.deleter.delete_product(&id, &self.token).await,
            ResourceKind::Order => self.deleter.delete_order(&id, &self.token).await,
        };

        let outcome = match result {
            Ok(()) => {
                debug!("Deleted {} {}", kind, id);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to delete {} {}: {}", kind, id, e);
                Err(e.to_string())
            }
        };

        DeletionRecord {
            handle: ResourceHandle::new(kind, id),
            privileged,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, 0, 0, "nothing" ; "empty")]
    #[test_case(0, 2, 1, "2 products, 1 order" ; "products and order")]
    #[test_case(1, 0, 0, "1 user" ; "single user")]
    #[test_case(3, 1, 2, "3 users, 1 product, 2 orders" ; "all kinds")]
    fn test_leak_summary_display(users: usize, products: usize, orders: usize, expected: &str) {
        let summary = LeakSummary {
            users,
            products,
            orders,
        };
        assert_eq!(summary.to_string(), expected);
    }

    #[test]
    fn test_privileged_user_is_not_queued() {
        let mut registry = CleanupRegistry::new();
        assert!(registry.register_user("u1"));
        assert!(registry.register(ResourceKind::User, "u1", true));

        assert!(registry.pending(ResourceKind::User).is_empty());
        assert_eq!(registry.privileged(), Some("u1"));
        assert!(!registry.register_user("u1"));
    }

    #[test]
    fn test_new_privileged_user_demotes_previous() {
        let mut registry = CleanupRegistry::new();
        registry.register(ResourceKind::User, "admin-1", true);
        registry.register(ResourceKind::User, "admin-2", true);

        assert_eq!(registry.privileged(), Some("admin-2"));
        assert_eq!(registry.pending(ResourceKind::User), ["admin-1".to_string()]);
    }

    #[test]
    fn test_privileged_flag_ignored_for_other_kinds() {
        let mut registry = CleanupRegistry::new();
        assert!(registry.register(ResourceKind::Product, "p1", true));
        assert_eq!(registry.privileged(), None);
        assert_eq!(registry.pending(ResourceKind::Product).len(), 1);
    }

    #[test]
    fn test_blank_ids_ignored() {
        let mut registry = CleanupRegistry::new();
        assert!(!registry.register_order(""));
        assert!(!registry.register_order("   "));
        assert!(!registry.register_order(None));
        assert!(registry.is_empty());
    }
}
