//! Cleanup registry behaviour against a recording deleter

use std::collections::HashSet;
use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use storefront_common::{ResourceHandle, ResourceKind};
use storefront_e2e::{CleanupRegistry, E2eError, E2eResult, LeakSummary, ResourceDeleter};

/// Records every deletion call; ids in `failing` answer with a 500
#[derive(Default)]
struct RecordingDeleter {
    calls: Mutex<Vec<(ResourceKind, String, String)>>,
    failing: HashSet<String>,
}

impl RecordingDeleter {
    fn failing(ids: &[&str]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: ids.iter().map(|id| id.to_string()).collect(),
        }
    }

    fn record(&self, kind: ResourceKind, id: &str, token: &str) -> E2eResult<()> {
        self.calls
            .lock()
            .push((kind, id.to_string(), token.to_string()));
        if self.failing.contains(id) {
            return Err(E2eError::Status {
                method: "DELETE".to_string(),
                path: format!("/api/admin/{}s/{}", kind, id),
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(())
    }

    fn handles(&self) -> Vec<ResourceHandle> {
        self.calls
            .lock()
            .iter()
            .map(|(kind, id, _)| ResourceHandle::new(*kind, id.as_str()))
            .collect()
    }

    fn tokens(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(_, _, token)| token.clone()).collect()
    }
}

#[async_trait]
impl ResourceDeleter for RecordingDeleter {
    async fn delete_user(&self, id: &str, token: &str) -> E2eResult<()> {
        self.record(ResourceKind::User, id, token)
    }

    async fn delete_product(&self, id: &str, token: &str) -> E2eResult<()> {
        self.record(ResourceKind::Product, id, token)
    }

    async fn delete_order(&self, id: &str, token: &str) -> E2eResult<()> {
        self.record(ResourceKind::Order, id, token)
    }
}

/// Log sink shared between the subscriber and the assertions
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    (logs, tracing::subscriber::set_default(subscriber))
}

fn bound(deleter: &Arc<RecordingDeleter>) -> CleanupRegistry {
    let mut registry = CleanupRegistry::new();
    assert!(registry.bind_session(deleter.clone(), "admin-token"));
    registry
}

fn handle(kind: ResourceKind, id: &str) -> ResourceHandle {
    ResourceHandle::new(kind, id)
}

#[test]
fn test_duplicate_registration_is_tracked_once() {
    let mut registry = CleanupRegistry::new();
    assert!(registry.register_product("p1"));
    assert!(!registry.register_product("p1"));
    assert!(registry.register_order("p1"));

    assert_eq!(registry.pending(ResourceKind::Product), ["p1".to_string()]);
    assert_eq!(registry.pending(ResourceKind::Order), ["p1".to_string()]);
}

#[test]
fn test_absent_and_blank_ids_are_ignored() {
    let mut registry = CleanupRegistry::new();
    assert!(!registry.register_user(None));
    assert!(!registry.register_product(""));
    assert!(!registry.register(ResourceKind::User, "  ", true));

    assert!(registry.is_empty());
    assert_eq!(registry.privileged(), None);
}

#[test]
fn test_bind_session_rejects_empty_token() {
    let deleter = Arc::new(RecordingDeleter::default());
    let mut registry = CleanupRegistry::new();

    assert!(!registry.bind_session(deleter.clone(), ""));
    assert!(!registry.is_bound());
    assert!(registry.bind_session(deleter, "t1"));
    assert_eq!(registry.session_token(), Some("t1"));
}

#[tokio::test]
async fn test_drain_deletes_in_dependency_order() {
    let deleter = Arc::new(RecordingDeleter::default());
    let mut registry = bound(&deleter);

    registry.register(ResourceKind::User, "admin", true);
    registry.register_user("u1");
    registry.register_product("p1");
    registry.register_order("o1");
    registry.register_user("u2");
    registry.register_order("o2");

    let report = registry.drain().await;

    assert_eq!(
        deleter.handles(),
        vec![
            handle(ResourceKind::Order, "o1"),
            handle(ResourceKind::Order, "o2"),
            handle(ResourceKind::Product, "p1"),
            handle(ResourceKind::User, "u1"),
            handle(ResourceKind::User, "u2"),
            handle(ResourceKind::User, "admin"),
        ]
    );
    assert!(deleter.tokens().iter().all(|token| token == "admin-token"));
    assert!(report.is_clean());
    assert_eq!(report.skipped, None);
    assert!(report.deletions.last().map_or(false, |record| record.privileged));
}

#[tokio::test]
async fn test_two_products_and_an_order() {
    let deleter = Arc::new(RecordingDeleter::default());
    let mut registry = bound(&deleter);

    registry.register_product("p1");
    registry.register_product("p2");
    registry.register_order("o1");

    let report = registry.drain().await;

    assert_eq!(report.deletions.len(), 3);
    assert_eq!(deleter.handles()[0], handle(ResourceKind::Order, "o1"));
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_failed_deletion_does_not_stop_the_drain() {
    let deleter = Arc::new(RecordingDeleter::failing(&["p1"]));
    let mut registry = bound(&deleter);

    registry.register_product("p1");
    registry.register_user("u1");

    let report = registry.drain().await;

    assert_eq!(
        deleter.handles(),
        vec![
            handle(ResourceKind::Product, "p1"),
            handle(ResourceKind::User, "u1"),
        ]
    );
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].handle, handle(ResourceKind::Product, "p1"));
    assert!(!report.is_clean());
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_unbound_drain_reports_leak_without_calls() {
    let (logs, _guard) = capture_logs();
    let deleter = Arc::new(RecordingDeleter::default());
    let mut registry = CleanupRegistry::new();

    registry.register_product("p1");
    registry.register_product("p2");
    registry.register_order("o1");

    let report = registry.drain().await;

    assert!(deleter.handles().is_empty());
    assert!(report.deletions.is_empty());
    let leak = report.skipped.unwrap();
    assert_eq!(
        leak,
        LeakSummary {
            users: 0,
            products: 2,
            orders: 1
        }
    );
    assert_eq!(leak.to_string(), "2 products, 1 order");
    assert!(!report.is_clean());
    assert!(registry.is_empty());

    let logged = logs.contents();
    assert!(logged.contains("WARN"));
    assert!(logged.contains("No admin session for cleanup, leaving 2 products, 1 order behind"));
}

#[tokio::test]
async fn test_unbound_drain_of_empty_registry_is_clean() {
    let (logs, _guard) = capture_logs();
    let mut registry = CleanupRegistry::new();
    let report = registry.drain().await;
    assert!(report.is_clean());
    assert_eq!(report.skipped, Some(LeakSummary::default()));
    assert!(!logs.contents().contains("No admin session"));
}

#[tokio::test]
async fn test_drain_unbinds_and_resets() {
    let deleter = Arc::new(RecordingDeleter::default());
    let mut registry = bound(&deleter);
    registry.register(ResourceKind::User, "admin", true);
    registry.register_user("u1");

    registry.drain().await;

    assert!(!registry.is_bound());
    assert!(registry.is_empty());
    assert_eq!(registry.privileged(), None);

    // a second drain has nothing to do
    registry.register_order("o9");
    let report = registry.drain().await;
    assert_eq!(deleter.handles().len(), 2);
    assert_eq!(report.skipped.map(|leak| leak.orders), Some(1));
}

#[tokio::test]
async fn test_last_binding_wins() {
    let first = Arc::new(RecordingDeleter::default());
    let second = Arc::new(RecordingDeleter::default());
    let mut registry = CleanupRegistry::new();

    registry.bind_session(first.clone(), "first-token");
    registry.bind_session(second.clone(), "second-token");
    registry.register_user("u1");

    registry.drain().await;

    assert!(first.handles().is_empty());
    assert_eq!(second.tokens(), vec!["second-token".to_string()]);
}

#[tokio::test]
async fn test_forgotten_resources_are_not_deleted() {
    let deleter = Arc::new(RecordingDeleter::default());
    let mut registry = bound(&deleter);

    registry.register_product("p1");
    registry.register_product("p2");
    assert!(registry.forget(ResourceKind::Product, "p1"));
    assert!(!registry.forget(ResourceKind::Product, "p1"));

    registry.drain().await;

    assert_eq!(deleter.handles(), vec![handle(ResourceKind::Product, "p2")]);
}
