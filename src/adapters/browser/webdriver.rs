//! WebDriver-backed browser session
//!
//! Talks to a running chromedriver through `thirtyfour`. Chrome is configured
//! to save downloads into the scratch directory without prompting.

use super::locator::Locator;
use super::traits::BrowserSession;
use crate::config::{BrowserConfig, Environment};
use crate::domain::{BookerError, BrowserError, Result};
use async_trait::async_trait;
use serde_json::json;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use thirtyfour::{By, ChromiumLikeCapabilities, DesiredCapabilities, WebDriver, WebElement};

/// Chrome session driven over the WebDriver protocol
pub struct WebDriverSession {
    driver: WebDriver,
    terminated: AtomicBool,
}

impl WebDriverSession {
    /// Connects to the WebDriver server and opens a Chrome session
    ///
    /// Headless mode follows the environment unless `browser.headless`
    /// forces it.
    ///
    /// # Errors
    ///
    /// Returns [`BookerError::Connection`] if the WebDriver server cannot be
    /// reached or refuses the capabilities.
    pub async fn connect(
        config: &BrowserConfig,
        environment: &Environment,
        download_dir: &Path,
    ) -> Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if config.is_headless(environment) {
            caps.set_headless()?;
        }
        for arg in &config.chrome_args {
            caps.add_arg(arg)?;
        }
        caps.add_experimental_option(
            "prefs",
            json!({
                "download.default_directory": download_dir.to_string_lossy(),
                "download.prompt_for_download": false,
                "download.directory_upgrade": true,
                "safebrowsing.enabled": true,
            }),
        )?;

        tracing::info!(
            webdriver_url = %config.webdriver_url,
            headless = config.is_headless(environment),
            download_dir = %download_dir.display(),
            "Opening browser session"
        );

        let driver = WebDriver::new(config.webdriver_url.as_str(), caps)
            .await
            .map_err(|e| {
                BookerError::Connection(format!(
                    "Failed to open WebDriver session at {}: {e}",
                    config.webdriver_url
                ))
            })?;

        Ok(Self {
            driver,
            terminated: AtomicBool::new(false),
        })
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.is_terminated() {
            return Err(BrowserError::SessionTerminated(
                "browser session already closed".to_string(),
            )
            .into());
        }
        Ok(())
    }

    fn by(locator: &Locator) -> By {
        match locator {
            Locator::Id(v) => By::Id(v.as_str()),
            Locator::XPath(v) => By::XPath(v.as_str()),
            Locator::Css(v) => By::Css(v.as_str()),
        }
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    type Element = WebElement;

    async fn navigate(&self, url: &str) -> Result<()> {
        self.ensure_alive()?;
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn refresh(&self) -> Result<()> {
        self.ensure_alive()?;
        self.driver.refresh().await?;
        Ok(())
    }

    async fn locate(&self, locator: &Locator) -> Result<Option<WebElement>> {
        self.ensure_alive()?;
        let mut found = self.driver.find_all(Self::by(locator)).await?;
        if found.is_empty() {
            Ok(None)
        } else {
            Ok(Some(found.swap_remove(0)))
        }
    }

    async fn is_clickable(&self, element: &WebElement) -> Result<bool> {
        self.ensure_alive()?;
        Ok(element.is_clickable().await?)
    }

    async fn click(&self, element: &WebElement) -> Result<()> {
        self.ensure_alive()?;
        element.click().await?;
        Ok(())
    }

    async fn type_into(&self, element: &WebElement, text: &str) -> Result<()> {
        self.ensure_alive()?;
        element.send_keys(text).await?;
        Ok(())
    }

    async fn run_script(&self, script: &str) -> Result<()> {
        self.ensure_alive()?;
        self.driver.execute(script, Vec::new()).await?;
        Ok(())
    }

    async fn quit(&self) -> Result<()> {
        if self.terminated.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        tracing::info!("Closing browser session");
        self.driver.clone().quit().await?;
        Ok(())
    }

    fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }
}
