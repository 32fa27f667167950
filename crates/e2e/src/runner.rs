//! Suite runner: selects scenarios, runs them one after another and
//! aggregates the results

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use storefront_common::HarnessConfig;
use tracing::{error, info};

use crate::error::{E2eError, E2eResult};
use crate::readiness::{wait_for_storefront, ReadinessConfig};
use crate::scenario::{run_scenario, Scenario, ScenarioCase, ScenarioRun};
use crate::scenarios;

/// What cleanup did after a scenario
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupSummary {
    pub deleted: usize,
    pub failed: usize,
    /// Resources left behind because no admin session was available
    pub leaked: usize,
}

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub tags: Vec<String>,
    pub success: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub cleanup: CleanupSummary,
}

impl TestResult {
    fn from_run(run: ScenarioRun, tags: &[&str]) -> Self {
        let failed = run.cleanup.failures().count();
        let cleanup = CleanupSummary {
            deleted: run.cleanup.deletions.len() - failed,
            failed,
            leaked: run.cleanup.skipped.map_or(0, |leak| leak.total()),
        };

        Self {
            name: run.name,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            success: run.outcome.is_passed(),
            duration_ms: run.duration_ms,
            error: run.outcome.message().map(String::from),
            cleanup,
        }
    }

    fn setup_failed(case: &dyn ScenarioCase, e: &E2eError) -> Self {
        Self {
            name: case.name().to_string(),
            tags: case.tags().iter().map(|t| t.to_string()).collect(),
            success: false,
            duration_ms: 0,
            error: Some(format!("setup failed: {}", e)),
            cleanup: CleanupSummary::default(),
        }
    }
}

/// Result of running a selection of scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl TestSuiteResult {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Configuration for the suite runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub harness: Arc<HarnessConfig>,
    pub output_dir: PathBuf,
    /// `None` skips the readiness wait
    pub readiness: Option<ReadinessConfig>,
}

impl RunnerConfig {
    pub fn new(harness: Arc<HarnessConfig>) -> Self {
        Self {
            harness,
            output_dir: PathBuf::from("test-results"),
            readiness: Some(ReadinessConfig::default()),
        }
    }
}

pub struct SuiteRunner {
    config: RunnerConfig,
    cases: Vec<Box<dyn ScenarioCase>>,
}

impl SuiteRunner {
    /// Runner over the full scenario catalog
    pub fn new(config: RunnerConfig) -> Self {
        Self::with_cases(config, scenarios::catalog())
    }

    pub fn with_cases(config: RunnerConfig, cases: Vec<Box<dyn ScenarioCase>>) -> Self {
        Self { config, cases }
    }

    pub fn cases(&self) -> impl Iterator<Item = &dyn ScenarioCase> {
        self.cases.iter().map(|case| case.as_ref())
    }

    /// Scenarios matching both filters. An unknown `name` is an error, a
    /// tag nothing carries just selects nothing.
    pub fn select(&self, tag: Option<&str>, name: Option<&str>) -> E2eResult<Vec<&dyn ScenarioCase>> {
        let selected: Vec<&dyn ScenarioCase> = self
            .cases()
            .filter(|case| tag.map_or(true, |tag| case.tags().contains(&tag)))
            .filter(|case| name.map_or(true, |name| case.name() == name))
            .collect();

        match name {
            Some(name) if selected.is_empty() && !self.cases().any(|c| c.name() == name) => {
                Err(E2eError::ScenarioNotFound(name.to_string()))
            }
            _ => Ok(selected),
        }
    }

    pub async fn run_all(&self) -> E2eResult<TestSuiteResult> {
        let cases: Vec<&dyn ScenarioCase> = self.cases().collect();
        self.run_cases(&cases).await
    }

    pub async fn run_tagged(&self, tag: &str) -> E2eResult<TestSuiteResult> {
        let cases = self.select(Some(tag), None)?;
        self.run_cases(&cases).await
    }

    pub async fn run_named(&self, name: &str) -> E2eResult<TestSuiteResult> {
        let cases = self.select(None, Some(name))?;
        self.run_cases(&cases).await
    }

    /// Run scenarios sequentially, each with its own context
    pub async fn run_cases(&self, cases: &[&dyn ScenarioCase]) -> E2eResult<TestSuiteResult> {
        if let Some(readiness) = self.config.readiness {
            wait_for_storefront(&self.config.harness, readiness).await?;
        }

        let start = Instant::now();
        let mut results = Vec::with_capacity(cases.len());

        info!("Running {} scenario(s)...", cases.len());

        for case in cases {
            let result = self.run_case(*case).await;
            if result.success {
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let passed = results.iter().filter(|r| r.success).count();
        let failed = results.len() - passed;
        let duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Results: {} passed, {} failed ({} ms)",
            passed, failed, duration_ms
        );

        Ok(TestSuiteResult {
            total: results.len(),
            passed,
            failed,
            duration_ms,
            results,
        })
    }

    pub async fn run_case(&self, case: &dyn ScenarioCase) -> TestResult {
        match Scenario::prepare(self.config.harness.clone()).await {
            Ok(scenario) => TestResult::from_run(run_scenario(case, scenario).await, case.tags()),
            Err(e) => TestResult::setup_failed(case, &e),
        }
    }

    /// Write results as `test-results.json` in the output directory
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<PathBuf> {
        write_results(&self.config.output_dir, results)
    }
}

pub fn write_results(output_dir: &Path, results: &TestSuiteResult) -> E2eResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let path = output_dir.join("test-results.json");
    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(&path, json)?;

    info!("Results written to: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> SuiteRunner {
        SuiteRunner::new(RunnerConfig::new(Arc::new(HarnessConfig::default())))
    }

    #[test]
    fn test_select_by_tag_and_name() {
        let runner = runner();

        let admin = runner.select(Some("admin"), None).unwrap();
        assert_eq!(admin.len(), 8);
        assert!(admin.iter().all(|c| c.tags().contains(&"admin")));

        let one = runner.select(None, Some("update_profile")).unwrap();
        assert_eq!(one.len(), 1);

        assert!(runner.select(Some("no-such-tag"), None).unwrap().is_empty());
        assert!(runner.select(Some("admin"), Some("update_profile")).unwrap().is_empty());
        assert!(matches!(
            runner.select(None, Some("missing")),
            Err(E2eError::ScenarioNotFound(_))
        ));
    }

    #[test]
    fn test_write_results() {
        let dir = tempfile::tempdir().unwrap();
        let results = TestSuiteResult {
            total: 1,
            passed: 0,
            failed: 1,
            duration_ms: 12,
            results: vec![TestResult {
                name: "update_profile".to_string(),
                tags: vec!["profile".to_string()],
                success: false,
                duration_ms: 12,
                error: Some("boom".to_string()),
                cleanup: CleanupSummary {
                    deleted: 1,
                    failed: 0,
                    leaked: 0,
                },
            }],
        };

        let path = write_results(&dir.path().join("out"), &results).unwrap();
        let written: TestSuiteResult =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written.failed, 1);
        assert_eq!(written.results[0].error.as_deref(), Some("boom"));
        assert!(!written.all_passed());
    }
}
