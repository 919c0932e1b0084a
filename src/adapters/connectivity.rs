//! Outbound connectivity probe

use crate::domain::{BookerError, Result};
use reqwest::ClientBuilder;
use std::time::Duration;

/// Default probe timeout
pub const CONNECTIVITY_TIMEOUT: Duration = Duration::from_secs(5);

/// Returns `Ok(true)` when `url` answers with 200 within `timeout`
///
/// Network failures and non-200 statuses are reported as `Ok(false)`; only a
/// client that cannot be built is an error.
pub async fn check_connectivity(url: &str, timeout: Duration) -> Result<bool> {
    let client = ClientBuilder::new()
        .timeout(timeout)
        .build()
        .map_err(|e| BookerError::Connection(format!("Failed to build HTTP client: {e}")))?;

    match client.get(url).send().await {
        Ok(resp) => {
            let ok = resp.status() == reqwest::StatusCode::OK;
            tracing::debug!(url, status = %resp.status(), "Connectivity check answered");
            Ok(ok)
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "Connectivity check failed");
            Ok(false)
        }
    }
}
