//! Waiting for the storefront to come up before a run

use std::time::{Duration, Instant};

use reqwest::StatusCode;
use storefront_common::{Endpoints, HarnessConfig};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{E2eError, E2eResult};

/// How long and how often to probe
#[derive(Debug, Clone, Copy)]
pub struct ReadinessConfig {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            interval: Duration::from_millis(500),
        }
    }
}

/// Targets that must answer before scenarios start
fn probe_urls(config: &HarnessConfig) -> [String; 2] {
    [
        format!("{}/", config.ui_root()),
        format!("{}{}?limit=1", config.api_root(), Endpoints::PRODUCTS),
    ]
}

/// A server error means the backend is up but not ready yet
fn is_ready(status: StatusCode) -> bool {
    !status.is_server_error()
}

/// Block until both the UI and the API answer, or fail with
/// [`E2eError::StorefrontUnavailable`] once `readiness.timeout` elapses.
pub async fn wait_for_storefront(
    config: &HarnessConfig,
    readiness: ReadinessConfig,
) -> E2eResult<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()?;

    let start = Instant::now();
    let mut attempts = 0;

    for url in probe_urls(config) {
        loop {
            attempts += 1;

            match client.get(&url).send().await {
                Ok(resp) if is_ready(resp.status()) => break,
                Ok(resp) => warn!("{} returned {}", url, resp.status()),
                Err(e) => {
                    if attempts == 1 {
                        info!("Waiting for storefront at {}...", url);
                    }
                    // Connection refused is expected while the storefront starts
                    if !e.is_connect() {
                        warn!("Readiness probe error: {}", e);
                    }
                }
            }

            if start.elapsed() >= readiness.timeout {
                return Err(E2eError::StorefrontUnavailable(attempts));
            }
            sleep(readiness.interval).await;
        }
    }

    info!("Storefront is ready ({} probes)", attempts);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_urls_strip_trailing_slash() {
        let config = HarnessConfig {
            base_url: "http://localhost:3000/".to_string(),
            api_url: "http://localhost:5000/".to_string(),
            ..Default::default()
        };
        let [ui, api] = probe_urls(&config);
        assert_eq!(ui, "http://localhost:3000/");
        assert_eq!(api, "http://localhost:5000/api/products?limit=1");
    }

    #[test]
    fn test_client_errors_count_as_ready() {
        assert!(is_ready(StatusCode::OK));
        assert!(is_ready(StatusCode::UNAUTHORIZED));
        assert!(!is_ready(StatusCode::BAD_GATEWAY));
    }

    #[tokio::test]
    async fn test_unreachable_storefront_times_out() {
        let config = HarnessConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        let readiness = ReadinessConfig {
            timeout: Duration::from_millis(100),
            interval: Duration::from_millis(20),
        };
        let err = wait_for_storefront(&config, readiness).await.unwrap_err();
        assert!(matches!(err, E2eError::StorefrontUnavailable(n) if n >= 1));
    }
}
