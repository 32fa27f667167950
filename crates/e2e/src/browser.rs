//! Playwright browser automation
//!
//! Each [`UiFlow`] becomes one Node script driving one browser, so login
//! state in localStorage survives for the whole flow. The script always
//! closes the browser in a `finally` block, and the node process is killed
//! if the flow overruns its time budget or the session is dropped.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::Value;
use storefront_common::{BrowserKind, HarnessConfig, Viewport};
use tokio::process::Command as TokioCommand;
use tracing::{debug, warn};

use crate::error::{E2eError, E2eResult};
use crate::steps::{UiFlow, UiStep};

/// Values captured by a flow, keyed by capture name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiRun {
    pub captures: HashMap<String, Value>,
    pub duration_ms: u64,
}

impl UiRun {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.captures.get(name)
    }

    /// A probe result; anything but `true` reads as false
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.captures.get(name), Some(Value::Bool(true)))
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.captures.get(name).and_then(Value::as_str)
    }

    /// A number, or text that parses as one (badge counters, quantities)
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.captures.get(name)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn count(&self, name: &str) -> usize {
        self.int(name).and_then(|n| usize::try_from(n).ok()).unwrap_or(0)
    }
}

#[derive(Debug, Deserialize)]
struct ScriptReport {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    captures: HashMap<String, Value>,
}

/// Browser owned by one scenario
#[derive(Debug)]
pub struct BrowserSession {
    ui_root: String,
    browser: BrowserKind,
    headless: bool,
    viewport: Viewport,
    step_timeout: Duration,
    screenshot_dir: PathBuf,
    flows_run: usize,
}

impl BrowserSession {
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            ui_root: config.ui_root().to_string(),
            browser: config.browser,
            headless: config.headless,
            viewport: config.viewport,
            step_timeout: config.request_timeout(),
            screenshot_dir: config.screenshot_dir.clone(),
            flows_run: 0,
        }
    }

    pub fn flows_run(&self) -> usize {
        self.flows_run
    }

    /// Run `flow` in a fresh browser and return what it captured.
    ///
    /// A failing step aborts the flow with [`E2eError::Browser`]; observing
    /// steps never fail.
    pub async fn run(&mut self, flow: &UiFlow) -> E2eResult<UiRun> {
        if flow.is_empty() {
            return Ok(UiRun::default());
        }
        if flow
            .steps
            .iter()
            .any(|step| matches!(step, UiStep::Screenshot { .. }))
        {
            std::fs::create_dir_all(&self.screenshot_dir)?;
        }

        let start = Instant::now();
        self.flows_run += 1;
        debug!(
            "Running browser flow #{} ({} steps)",
            self.flows_run,
            flow.steps.len()
        );

        let report = self.run_script(&self.build_script(&flow.steps), flow.steps.len()).await?;
        let duration_ms = start.elapsed().as_millis() as u64;

        if !report.success {
            debug!("Captures before failure: {:?}", report.captures);
            return Err(E2eError::Browser(
                report.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        Ok(UiRun {
            captures: report.captures,
            duration_ms,
        })
    }

    /// Build the Node script for a list of steps
    pub fn build_script(&self, steps: &[UiStep]) -> String {
        let mut script = format!(
            r#"const {{ chromium, firefox, webkit }} = require('playwright');

(async () => {{
  const captures = {{}};
  let failure = null;
  const browser = await {browser}.launch({{ headless: {headless} }});
  try {{
    const context = await browser.newContext({{
      viewport: {{ width: {width}, height: {height} }}
    }});
    const page = await context.newPage();
    page.setDefaultTimeout({timeout});
    const baseUrl = {base_url};
"#,
            browser = self.browser.as_str(),
            headless = self.headless,
            width = self.viewport.width,
            height = self.viewport.height,
            timeout = self.timeout_ms(None),
            base_url = js(&self.ui_root),
        );

        for (i, step) in steps.iter().enumerate() {
            script.push_str(&format!("\n    // Step {}: {}\n", i + 1, step.label()));
            script.push_str(&self.step_to_js(step));
            script.push('\n');
        }

        script.push_str(
            r#"  } catch (error) {
    failure = error.message;
  } finally {
    await browser.close();
  }
  console.log(JSON.stringify({ success: failure === null, error: failure, captures }));
  process.exit(failure === null ? 0 : 1);
})();
"#,
        );

        script
    }

    fn timeout_ms(&self, step_timeout: Option<u64>) -> u64 {
        step_timeout.unwrap_or(self.step_timeout.as_millis() as u64)
    }

    fn step_to_js(&self, step: &UiStep) -> String {
        match step {
            UiStep::Navigate { path } => {
                format!("    await page.goto(baseUrl + {});", js(path))
            }
            UiStep::Click { selector } => format!("    await page.click({});", js(selector)),
            UiStep::Fill { selector, value } => {
                format!("    await page.fill({}, {});", js(selector), js(value))
            }
            UiStep::Check { selector } => format!("    await page.check({});", js(selector)),
            UiStep::WaitFor {
                selector,
                state,
                timeout_ms,
            } => format!(
                "    await page.waitForSelector({}, {{ state: '{}', timeout: {} }});",
                js(selector),
                state.as_str(),
                self.timeout_ms(*timeout_ms)
            ),
            UiStep::WaitForText {
                selector,
                text,
                timeout_ms,
            } => format!(
                r#"    await page.waitForFunction(([s, t]) => {{
      const el = document.querySelector(s);
      return !!el && el.innerText.trim() === t;
    }}, [{}, {}], {{ timeout: {} }}).catch(() => {{}});"#,
                js(selector),
                js(text),
                self.timeout_ms(*timeout_ms)
            ),
            UiStep::WaitForCount {
                selector,
                count,
                timeout_ms,
            } => format!(
                r#"    await page.waitForFunction(([s, n]) => document.querySelectorAll(s).length === n,
      [{}, {}], {{ timeout: {} }}).catch(() => {{}});"#,
                js(selector),
                count,
                self.timeout_ms(*timeout_ms)
            ),
            UiStep::Probe {
                name,
                selector,
                timeout_ms,
            } => format!(
                "    captures[{}] = await page.waitForSelector({}, {{ state: 'visible', timeout: {} }}).then(() => true, () => false);",
                js(name),
                js(selector),
                self.timeout_ms(*timeout_ms)
            ),
            UiStep::UrlContains {
                name,
                fragment,
                timeout_ms,
            } => format!(
                "    captures[{}] = await page.waitForURL(url => url.toString().includes({}), {{ timeout: {} }}).then(() => true, () => false);",
                js(name),
                js(fragment),
                self.timeout_ms(*timeout_ms)
            ),
            UiStep::ReadText {
                name,
                selector,
                timeout_ms,
            } => format!(
                "    captures[{}] = await page.locator({}).first().innerText({{ timeout: {} }}).then(t => t.trim(), () => null);",
                js(name),
                js(selector),
                self.timeout_ms(*timeout_ms)
            ),
            UiStep::Count { name, selector } => format!(
                "    captures[{}] = await page.locator({}).count();",
                js(name),
                js(selector)
            ),
            UiStep::ReadStorage { name, key } => format!(
                "    captures[{}] = await page.evaluate(k => window.localStorage.getItem(k), {});",
                js(name),
                js(key)
            ),
            UiStep::AcceptDialogs => {
                "    page.on('dialog', dialog => dialog.accept().catch(() => {}));".to_string()
            }
            UiStep::Reload => "    await page.reload();".to_string(),
            UiStep::Sleep { ms } => format!("    await page.waitForTimeout({});", ms),
            UiStep::Screenshot { name } => {
                let path = self.screenshot_dir.join(format!("{}.png", name));
                format!(
                    "    await page.screenshot({{ path: {}, fullPage: true }});",
                    js(&path.to_string_lossy())
                )
            }
        }
    }

    async fn run_script(&self, script: &str, step_count: usize) -> E2eResult<ScriptReport> {
        let temp_dir = tempfile::tempdir()?;
        let script_path = temp_dir.path().join("flow.js");
        tokio::fs::write(&script_path, script).await?;

        let mut cmd = TokioCommand::new("node");
        cmd.arg(&script_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Resolve `playwright` from the working directory, not the temp dir
        if std::env::var_os("NODE_PATH").is_none() {
            let cwd = std::env::current_dir()?;
            cmd.env("NODE_PATH", cwd.join("node_modules"));
        }

        let child = cmd.spawn().map_err(|e| match e.kind() {
            ErrorKind::NotFound => E2eError::PlaywrightNotFound,
            _ => E2eError::Io(e),
        })?;

        let budget = self.step_timeout * (step_count as u32 + 2);
        let output = match tokio::time::timeout(budget, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => {
                warn!("Browser flow exceeded {:?}, killed", budget);
                return Err(E2eError::Browser(format!(
                    "flow did not finish within {:?}",
                    budget
                )));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if stderr.contains("Cannot find module 'playwright'") {
            return Err(E2eError::PlaywrightNotFound);
        }

        parse_report(&stdout).ok_or_else(|| {
            E2eError::Playwright(format!(
                "Script produced no report:\nstdout: {}\nstderr: {}",
                stdout, stderr
            ))
        })
    }
}

/// The report is the last JSON line the script prints
fn parse_report(stdout: &str) -> Option<ScriptReport> {
    stdout
        .lines()
        .rev()
        .filter(|line| line.trim_start().starts_with('{'))
        .find_map(|line| serde_json::from_str(line).ok())
}

/// JavaScript string literal for `s`
fn js(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::WaitState;

    fn session() -> BrowserSession {
        let config = HarnessConfig {
            base_url: "http://localhost:3000/".to_string(),
            timeout: 7,
            headless: true,
            ..Default::default()
        };
        BrowserSession::new(&config)
    }

    #[test]
    fn test_build_script_structure() {
        let script = session().build_script(&[
            UiStep::navigate("/login"),
            UiStep::fill("email-input", "user@test.com"),
            UiStep::probe("error", "error-message", 3000),
        ]);

        assert!(script.contains("chromium.launch({ headless: true })"));
        assert!(script.contains(r#"const baseUrl = "http://localhost:3000";"#));
        assert!(script.contains("page.setDefaultTimeout(7000)"));
        assert!(script.contains("// Step 2: fill:"));
        assert!(script.contains(r#"captures["error"]"#));
        assert!(script.contains("timeout: 3000"));
        assert!(script.contains("finally {\n    await browser.close();"));
    }

    #[test]
    fn test_values_are_escaped() {
        let script = session().build_script(&[UiStep::fill("name-input", "O'Brien \"x\"\n")]);
        assert!(script.contains(r#""O'Brien \"x\"\n""#));
    }

    #[test]
    fn test_wait_state_rendered() {
        let script = session().build_script(&[UiStep::WaitFor {
            selector: "#modal".to_string(),
            state: WaitState::Hidden,
            timeout_ms: Some(1500),
        }]);
        assert!(script.contains("state: 'hidden', timeout: 1500"));
    }

    #[test]
    fn test_wait_count_does_not_fail_the_flow() {
        let script = session().build_script(&[UiStep::wait_count("product-card-", 0, 2000)]);
        assert!(script.contains(r#"["[data-testid^=\"product-card-\"]", 0]"#));
        assert!(script.contains("timeout: 2000 }).catch(() => {});"));
    }

    #[test]
    fn test_parse_report_takes_last_json_line() {
        let stdout = "noise\n{\"not\": \"a report\"\n{\"success\": true, \"error\": null, \"captures\": {\"badge\": \"3\", \"ok\": true}}\n";
        let report = parse_report(stdout).unwrap();
        assert!(report.success);

        let run = UiRun {
            captures: report.captures,
            duration_ms: 0,
        };
        assert_eq!(run.int("badge"), Some(3));
        assert!(run.flag("ok"));
        assert!(!run.flag("missing"));
        assert_eq!(run.count("missing"), 0);
    }

    #[test]
    fn test_parse_report_none_without_json() {
        assert!(parse_report("Error: boom\n    at foo").is_none());
    }
}
