//! Polling waits
//!
//! Every wait polls at a bounded interval until its condition holds or its
//! timeout elapses. Element waits that fail terminate the browser session;
//! the download-count wait only reports whether the target was reached.

use crate::adapters::browser::{BrowserSession, Locator};
use crate::config::ExportConfig;
use crate::domain::{BrowserError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;

/// Intervals and timeouts for the polling waits
#[derive(Debug, Clone)]
pub struct WaitConfig {
    /// Default element and download timeout
    pub wait_time: Duration,

    /// Poll interval for element presence and clickability
    pub element_poll: Duration,

    /// Poll interval while waiting for a loader to appear
    pub loader_poll: Duration,

    /// Poll interval for the download directory
    pub file_poll: Duration,
}

impl WaitConfig {
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            wait_time: Duration::from_secs(config.wait_time_secs),
            element_poll: Duration::from_millis(config.element_poll_interval_ms),
            loader_poll: Duration::from_millis(100),
            file_poll: Duration::from_millis(config.file_poll_interval_ms),
        }
    }

    /// How long a loader gets to show up: half the wait time
    pub fn loader_short_wait(&self) -> Duration {
        self.wait_time / 2
    }

    /// How long a loader gets to clear: the full wait time
    pub fn loader_long_wait(&self) -> Duration {
        self.wait_time
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self::from_config(&ExportConfig::default())
    }
}

/// Polls until `locator` is present
///
/// On timeout the session is terminated and
/// [`BrowserError::ElementNotFound`] returned when `quit_on_fail` is set;
/// otherwise the miss is logged and `Ok(None)` returned.
pub async fn wait_for_element<B: BrowserSession>(
    browser: &B,
    locator: &Locator,
    timeout: Duration,
    poll: Duration,
    quit_on_fail: bool,
) -> Result<Option<B::Element>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(element) = browser.locate(locator).await? {
            return Ok(Some(element));
        }
        if Instant::now() >= deadline {
            break;
        }
        tokio::time::sleep(poll).await;
    }

    if quit_on_fail {
        tracing::warn!(locator = %locator, timeout_ms = timeout.as_millis(), "Element not found, closing session");
        browser.quit().await?;
        Err(BrowserError::ElementNotFound(locator.to_string()).into())
    } else {
        tracing::info!(locator = %locator, "Element not found");
        Ok(None)
    }
}

/// Like [`wait_for_element`] with `quit_on_fail`, returning the element itself
pub async fn require_element<B: BrowserSession>(
    browser: &B,
    locator: &Locator,
    waits: &WaitConfig,
) -> Result<B::Element> {
    wait_for_element(browser, locator, waits.wait_time, waits.element_poll, true)
        .await?
        .ok_or_else(|| BrowserError::ElementNotFound(locator.to_string()).into())
}

/// Polls until `element` is displayed and enabled
///
/// On timeout the session is terminated and the element reported as not
/// clickable.
pub async fn wait_for_clickable<B: BrowserSession>(
    browser: &B,
    element: &B::Element,
    description: &str,
    timeout: Duration,
    poll: Duration,
) -> Result<B::Element> {
    tracing::debug!(element = description, "Waiting for element to be clickable");
    let deadline = Instant::now() + timeout;
    loop {
        if browser.is_clickable(element).await? {
            return Ok(element.clone());
        }
        if Instant::now() >= deadline {
            break;
        }
        tokio::time::sleep(poll).await;
    }

    browser.quit().await?;
    Err(BrowserError::ElementNotFound(format!("{description} (clickable)")).into())
}

/// Waits for a transient loading indicator to appear and then disappear
///
/// The appearance is polled at `poll` for up to `short_timeout`, the
/// disappearance for up to `long_timeout`. Either step timing out fails with
/// [`BrowserError::LoaderTimeout`].
pub async fn wait_for_loader_cycle<B: BrowserSession>(
    browser: &B,
    locator: &Locator,
    short_timeout: Duration,
    long_timeout: Duration,
    poll: Duration,
) -> Result<()> {
    let deadline = Instant::now() + short_timeout;
    loop {
        if browser.locate(locator).await?.is_some() {
            break;
        }
        if Instant::now() >= deadline {
            tracing::warn!(locator = %locator, "Loader not found");
            return Err(BrowserError::LoaderTimeout(format!("{locator} never appeared")).into());
        }
        tokio::time::sleep(poll).await;
    }

    let deadline = Instant::now() + long_timeout;
    loop {
        if browser.locate(locator).await?.is_none() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            tracing::warn!(locator = %locator, "Loader did not clear");
            return Err(BrowserError::LoaderTimeout(format!("{locator} never cleared")).into());
        }
        tokio::time::sleep(poll).await;
    }
}

/// Whether a directory entry counts as a finished download
///
/// Partial downloads (`*.crdownload`, any case) and Chrome's own cache files
/// are ignored.
pub fn is_completed_download(file_name: &str) -> bool {
    !file_name.to_lowercase().contains("crdownload") && !file_name.contains("Chrome")
}

/// Scratch directory the browser downloads into
#[derive(Debug, Clone)]
pub struct DownloadDirectory {
    path: PathBuf,
}

impl DownloadDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of finished downloads currently in the directory
    pub fn file_count(&self) -> Result<usize> {
        let mut count = 0;
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            if is_completed_download(&entry.file_name().to_string_lossy()) {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Polls until at least `target` finished downloads are present
    ///
    /// Returns `false` on timeout; never fails because of it.
    pub async fn wait_until_file_count(
        &self,
        target: usize,
        timeout: Duration,
        poll: Duration,
    ) -> Result<bool> {
        tracing::debug!(target_count = target, dir = %self.path.display(), "Waiting for file count");
        let deadline = Instant::now() + timeout;
        loop {
            if self.file_count()? >= target {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(poll).await;
        }
    }
}
