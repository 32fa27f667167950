//! Browser step vocabulary
//!
//! A scenario describes its UI part as a list of [`UiStep`]s which the
//! browser session compiles into a single Playwright script. Steps that
//! observe the page (`Probe`, `UrlContains`, `ReadText`, `Count`,
//! `ReadStorage`) record their result under a capture name instead of
//! failing, so the scenario can assert on them next to the API checks.

use serde::{Deserialize, Serialize};

/// CSS selector for a `data-testid` attribute
pub fn testid(id: &str) -> String {
    format!("[data-testid=\"{}\"]", id)
}

/// CSS selector for every `data-testid` starting with `prefix`
pub fn testid_prefix(prefix: &str) -> String {
    format!("[data-testid^=\"{}\"]", prefix)
}

/// A single browser step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UiStep {
    /// Navigate to a path relative to the UI base URL
    Navigate { path: String },

    /// Click an element
    Click { selector: String },

    /// Replace the contents of an input
    Fill { selector: String, value: String },

    /// Tick a checkbox
    Check { selector: String },

    /// Wait for an element to reach `state`; fails the flow on timeout
    WaitFor {
        selector: String,
        #[serde(default)]
        state: WaitState,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },

    /// Wait for text without failing; used after actions that re-render
    WaitForText {
        selector: String,
        text: String,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },

    /// Wait until exactly `count` elements match, without failing
    WaitForCount {
        selector: String,
        count: usize,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },

    /// Capture whether an element becomes visible within the timeout
    Probe {
        name: String,
        selector: String,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },

    /// Capture whether the URL comes to contain `fragment`
    UrlContains {
        name: String,
        fragment: String,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },

    /// Capture an element's trimmed inner text (null when absent)
    ReadText {
        name: String,
        selector: String,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },

    /// Capture how many elements match
    Count { name: String, selector: String },

    /// Capture a localStorage entry
    ReadStorage { name: String, key: String },

    /// Accept every native dialog (confirm/alert) from here on
    AcceptDialogs,

    /// Reload the current page
    Reload,

    /// Wait for a fixed amount of time (use sparingly)
    Sleep { ms: u64 },

    /// Take a full-page screenshot
    Screenshot { name: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitState {
    #[default]
    Visible,
    Hidden,
    Attached,
    Detached,
}

impl WaitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitState::Visible => "visible",
            WaitState::Hidden => "hidden",
            WaitState::Attached => "attached",
            WaitState::Detached => "detached",
        }
    }
}

impl UiStep {
    pub fn navigate(path: impl Into<String>) -> Self {
        UiStep::Navigate { path: path.into() }
    }

    pub fn click(id: &str) -> Self {
        UiStep::Click {
            selector: testid(id),
        }
    }

    pub fn fill(id: &str, value: impl Into<String>) -> Self {
        UiStep::Fill {
            selector: testid(id),
            value: value.into(),
        }
    }

    pub fn check(id: &str) -> Self {
        UiStep::Check {
            selector: testid(id),
        }
    }

    pub fn wait_visible(id: &str) -> Self {
        UiStep::WaitFor {
            selector: testid(id),
            state: WaitState::Visible,
            timeout_ms: None,
        }
    }

    pub fn wait_text(id: &str, text: impl Into<String>) -> Self {
        UiStep::WaitForText {
            selector: testid(id),
            text: text.into(),
            timeout_ms: None,
        }
    }

    pub fn probe(name: &str, id: &str, timeout_ms: u64) -> Self {
        UiStep::Probe {
            name: name.to_string(),
            selector: testid(id),
            timeout_ms: Some(timeout_ms),
        }
    }

    pub fn url_contains(name: &str, fragment: &str) -> Self {
        UiStep::UrlContains {
            name: name.to_string(),
            fragment: fragment.to_string(),
            timeout_ms: None,
        }
    }

    pub fn read_text(name: &str, id: &str) -> Self {
        UiStep::ReadText {
            name: name.to_string(),
            selector: testid(id),
            timeout_ms: None,
        }
    }

    pub fn count(name: &str, prefix: &str) -> Self {
        UiStep::Count {
            name: name.to_string(),
            selector: testid_prefix(prefix),
        }
    }

    pub fn read_storage(name: &str, key: &str) -> Self {
        UiStep::ReadStorage {
            name: name.to_string(),
            key: key.to_string(),
        }
    }

    /// Wait for the number of elements whose test id starts with `prefix`
    pub fn wait_count(prefix: &str, count: usize, timeout_ms: u64) -> Self {
        UiStep::WaitForCount {
            selector: testid_prefix(prefix),
            count,
            timeout_ms: Some(timeout_ms),
        }
    }

    pub fn sleep(ms: u64) -> Self {
        UiStep::Sleep { ms }
    }

    /// Capture name, for steps that record one
    pub fn capture_name(&self) -> Option<&str> {
        match self {
            UiStep::Probe { name, .. }
            | UiStep::UrlContains { name, .. }
            | UiStep::ReadText { name, .. }
            | UiStep::Count { name, .. }
            | UiStep::ReadStorage { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Short label used in logs and generated script comments
    pub fn label(&self) -> String {
        match self {
            UiStep::Navigate { path } => format!("navigate:{}", path),
            UiStep::Click { selector } => format!("click:{}", selector),
            UiStep::Fill { selector, .. } => format!("fill:{}", selector),
            UiStep::Check { selector } => format!("check:{}", selector),
            UiStep::WaitFor { selector, state, .. } => {
                format!("wait:{}:{}", selector, state.as_str())
            }
            UiStep::WaitForText { selector, .. } => format!("wait_text:{}", selector),
            UiStep::WaitForCount {
                selector, count, ..
            } => format!("wait_count:{}:{}", selector, count),
            UiStep::Probe { name, .. } => format!("probe:{}", name),
            UiStep::UrlContains { fragment, .. } => format!("url_contains:{}", fragment),
            UiStep::ReadText { name, .. } => format!("read_text:{}", name),
            UiStep::Count { name, .. } => format!("count:{}", name),
            UiStep::ReadStorage { key, .. } => format!("read_storage:{}", key),
            UiStep::AcceptDialogs => "accept_dialogs".to_string(),
            UiStep::Reload => "reload".to_string(),
            UiStep::Sleep { ms } => format!("sleep:{}ms", ms),
            UiStep::Screenshot { name } => format!("screenshot:{}", name),
        }
    }
}

/// Ordered list of steps run in one browser
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiFlow {
    pub steps: Vec<UiStep>,
}

impl UiFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, step: UiStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn then_all(mut self, steps: impl IntoIterator<Item = UiStep>) -> Self {
        self.steps.extend(steps);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Names the flow will capture, in step order
    pub fn capture_names(&self) -> Vec<&str> {
        self.steps.iter().filter_map(UiStep::capture_name).collect()
    }
}

impl From<Vec<UiStep>> for UiFlow {
    fn from(steps: Vec<UiStep>) -> Self {
        Self { steps }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flow_json() {
        let json = r#"{
            "steps": [
                {"action": "navigate", "path": "/login"},
                {"action": "fill", "selector": "[data-testid=\"email-input\"]", "value": "a@b.c"},
                {"action": "wait_for", "selector": "[data-testid=\"cart-badge\"]", "state": "hidden"},
                {"action": "accept_dialogs"}
            ]
        }"#;
        let flow: UiFlow = serde_json::from_str(json).unwrap();
        assert_eq!(flow.steps.len(), 4);
        assert_eq!(flow.steps[0], UiStep::navigate("/login"));
        assert!(matches!(
            flow.steps[2],
            UiStep::WaitFor {
                state: WaitState::Hidden,
                timeout_ms: None,
                ..
            }
        ));
    }

    #[test]
    fn test_capture_names_in_order() {
        let flow = UiFlow::new()
            .then(UiStep::navigate("/"))
            .then(UiStep::probe("modal", "product-modal", 5000))
            .then(UiStep::click("add-to-cart-btn"))
            .then(UiStep::read_text("badge", "cart-badge"))
            .then(UiStep::read_storage("token", "token"));
        assert_eq!(flow.capture_names(), vec!["modal", "badge", "token"]);
    }

    #[test]
    fn test_testid_selectors() {
        assert_eq!(testid("submit-btn"), r#"[data-testid="submit-btn"]"#);
        assert_eq!(testid_prefix("order-card-"), r#"[data-testid^="order-card-"]"#);
    }
}
