//! Storefront E2E Test Framework
//!
//! Drives a web storefront through its UI (Playwright) and its HTTP API,
//! cross-checking the two, and guarantees that every user, product and
//! order a scenario creates is deleted afterwards.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SuiteRunner                               │
//! │    ├── wait_for_storefront()                                │
//! │    └── for each ScenarioCase: Scenario::prepare + run       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Scenario                                                    │
//! │    ├── clients: auth, products, cart, orders, admin         │
//! │    ├── browser: UiFlow -> one Playwright script -> UiRun    │
//! │    └── cleanup: CleanupRegistry                             │
//! │          ├── register(kind, id, privileged)                 │
//! │          ├── bind_session(admin, token)  <- bootstrap       │
//! │          └── drain(): orders, products, users, privileged   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod bootstrap;
pub mod browser;
pub mod cleanup;
pub mod clients;
pub mod error;
pub mod pages;
pub mod poll;
pub mod readiness;
pub mod runner;
pub mod scenario;
pub mod scenarios;
pub mod steps;
pub mod transport;

pub use bootstrap::{bootstrap_cleanup_session, SessionSource};
pub use browser::{BrowserSession, UiRun};
pub use cleanup::{CleanupRegistry, DeletionRecord, DrainReport, LeakSummary, ResourceDeleter};
pub use error::{E2eError, E2eResult};
pub use runner::{RunnerConfig, SuiteRunner, TestResult, TestSuiteResult};
pub use scenario::{run_scenario, Scenario, ScenarioCase, ScenarioOutcome, ScenarioRun, TestAccount};
pub use steps::{UiFlow, UiStep};
pub use transport::{ApiResponse, ApiTransport};
