//! Export flows
//!
//! Each flow drives the browser to one report page, triggers the CSV export
//! and moves the downloaded file into the destination tree:
//!
//! - [`customers`] - trigger, find the export link by its time label, download
//! - [`appointments`] - one export per [`ChunkedRange`] window
//! - [`orders`] - one export per window, with a longer download wait
//!
//! Any failure inside a flow closes the browser session and is returned
//! wrapped as [`BookerError::Flow`] naming the flow.

pub mod appointments;
pub mod chunked;
pub mod customers;
pub mod labels;
pub mod orders;
pub mod summary;

pub use appointments::AppointmentDateType;
pub use chunked::ChunkedRange;
pub use customers::CustomerView;
pub use labels::{Clock, FixedClock, SystemClock};
pub use summary::{FlowOutcome, RunSummary};

use crate::adapters::browser::locator::booker;
use crate::adapters::browser::{BrowserSession, Locator};
use crate::config::{BookerExportConfig, BookerUrls};
use crate::core::navigation::BookerPages;
use crate::core::relocate::FileRelocator;
use crate::core::wait::{require_element, wait_for_clickable, DownloadDirectory, WaitConfig};
use crate::domain::{BookerError, EntityType, ExportError, ExportWindow, Location, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Fixed pauses of the customers flow
#[derive(Debug, Clone)]
pub struct CustomerTimings {
    /// Pause between the export click and looking for the confirmation dialog
    pub ok_button_delay: Duration,
    /// Pause after confirming the dialog
    pub after_ok_delay: Duration,
    /// Pause before reloading the page once a link label matched
    pub before_refresh_delay: Duration,
    /// Pause after that reload
    pub after_refresh_delay: Duration,
    /// Pause between clicking the download link and counting files
    pub before_download_delay: Duration,
    /// Reloads while waiting for the download link to become active
    pub link_refresh_attempts: u32,
    /// Wait per reload for the download link
    pub link_wait: Duration,
}

impl Default for CustomerTimings {
    fn default() -> Self {
        Self {
            ok_button_delay: Duration::from_secs(5),
            after_ok_delay: Duration::from_secs(2),
            before_refresh_delay: Duration::from_secs(3),
            after_refresh_delay: Duration::from_secs(1),
            before_download_delay: Duration::from_secs(1),
            link_refresh_attempts: 10,
            link_wait: Duration::from_secs(300),
        }
    }
}

/// Everything the flows need besides the browser and the file system
#[derive(Debug, Clone)]
pub struct FlowSettings {
    pub urls: BookerUrls,
    pub waits: WaitConfig,
    /// Time zone the UI renders timestamps in
    pub timezone: Tz,
    pub window_days: u32,
    pub location_switch_delay: Duration,
    /// Location the customers flow impersonates
    pub customers_location: Location,
    pub customers: CustomerTimings,
    /// Pause between setting a date range value and dispatching `change`
    pub script_settle_delay: Duration,
    /// Extra pause after the orders `change` event
    pub orders_settle_delay: Duration,
    pub orders_wait_for_overlay: bool,
}

impl FlowSettings {
    /// Builds the settings from a validated configuration
    pub fn from_config(config: &BookerExportConfig) -> Result<Self> {
        let timezone: Tz = config.booker.timezone.parse().map_err(|_| {
            BookerError::Configuration(format!(
                "Invalid time zone '{}'",
                config.booker.timezone
            ))
        })?;
        let customers_location = config
            .location(&config.export.customers_location)
            .cloned()
            .ok_or_else(|| {
                BookerError::Configuration(format!(
                    "Unknown customers location '{}'",
                    config.export.customers_location
                ))
            })?;

        Ok(Self {
            urls: config.booker.urls.clone(),
            waits: WaitConfig::from_config(&config.export),
            timezone,
            window_days: config.export.window_days,
            location_switch_delay: Duration::from_millis(config.export.location_switch_delay_ms),
            customers_location,
            customers: CustomerTimings {
                link_refresh_attempts: config.export.link_refresh_attempts,
                link_wait: Duration::from_secs(config.export.link_refresh_wait_secs),
                ..CustomerTimings::default()
            },
            script_settle_delay: Duration::from_millis(100),
            orders_settle_delay: Duration::from_millis(200),
            orders_wait_for_overlay: config.export.orders_wait_for_overlay,
        })
    }
}

/// Runs export flows against one browser session
pub struct Exporter<'a, B: BrowserSession> {
    browser: &'a B,
    settings: &'a FlowSettings,
    downloads: DownloadDirectory,
    relocator: FileRelocator,
    clock: Arc<dyn Clock>,
}

impl<'a, B: BrowserSession> Exporter<'a, B> {
    pub fn new(
        browser: &'a B,
        settings: &'a FlowSettings,
        downloads: DownloadDirectory,
        relocator: FileRelocator,
    ) -> Self {
        Self {
            browser,
            settings,
            downloads,
            relocator,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the wall clock used to timestamp export triggers
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn browser(&self) -> &B {
        self.browser
    }

    pub fn settings(&self) -> &FlowSettings {
        self.settings
    }

    pub(crate) fn pages(&self) -> BookerPages<'_, B> {
        BookerPages::new(
            self.browser,
            &self.settings.urls,
            &self.settings.waits,
            self.settings.location_switch_delay,
        )
    }

    /// Signs in to the brand account
    pub async fn login(&self, account: &str, username: &str, password: &str) -> Result<()> {
        self.guarded("login", self.pages().login(account, username, password))
            .await
    }

    /// Exports `[start, end]` window by window and relocates each file
    ///
    /// `trigger` sets the window's date range and clicks export; the loop
    /// then waits up to `download_timeout` for the file count to grow by one.
    /// The first failing window aborts the rest.
    pub(crate) async fn export_windows<'s, F, Fut>(
        &'s self,
        entity: EntityType,
        location: &Location,
        start: NaiveDate,
        end: NaiveDate,
        download_timeout: Duration,
        trigger: F,
    ) -> Result<Vec<(ExportWindow, Option<std::path::PathBuf>)>>
    where
        F: Fn(ExportWindow) -> Fut,
        Fut: Future<Output = Result<()>> + 's,
    {
        let mut exported = Vec::new();
        for window in ChunkedRange::new(start, end, self.settings.window_days) {
            let file_count = self.downloads.file_count()?;
            crate::log_window_export!(entity, window);
            trigger(window).await?;

            if !self
                .downloads
                .wait_until_file_count(file_count + 1, download_timeout, self.settings.waits.file_poll)
                .await?
            {
                return Err(ExportError::DownloadTimeout {
                    entity: entity.to_string(),
                    timeout_secs: download_timeout.as_secs(),
                }
                .into());
            }

            let moved = self.relocator.move_exported_file(
                entity,
                Some(location.id.as_str()),
                Some(window.start()),
                Some(window.end()),
            )?;
            exported.push((window, moved));
        }
        Ok(exported)
    }

    /// Types `window` into a report date-range input and fires `change`
    ///
    /// The page uses jQuery bindings, so the value is set through `$()` and
    /// the event dispatched by hand.
    pub(crate) async fn set_date_range(&self, input_id: &str, window: ExportWindow) -> Result<()> {
        require_element(self.browser, &Locator::id(input_id), &self.settings.waits).await?;
        self.browser
            .run_script(&set_value_script(input_id, &window.ui_range()))
            .await?;
        tokio::time::sleep(self.settings.script_settle_delay).await;
        self.browser.run_script(&change_event_script(input_id)).await
    }

    /// Clicks the report export button once it is present and enabled
    pub(crate) async fn click_export(&self) -> Result<()> {
        let waits = &self.settings.waits;
        let button = require_element(self.browser, &booker::export_button(), waits).await?;
        let button =
            wait_for_clickable(self.browser, &button, "export button", waits.wait_time, waits.element_poll)
                .await?;
        self.browser.click(&button).await
    }

    /// Awaits a flow step, closing the session and naming the flow on failure
    pub(crate) async fn guarded<T>(
        &self,
        flow: &str,
        step: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match step.await {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(flow, error = %e, "Export flow failed");
                if let Err(quit_err) = self.browser.quit().await {
                    tracing::warn!(error = %quit_err, "Failed to close browser session");
                }
                Err(e.in_flow(flow))
            }
        }
    }
}

fn set_value_script(input_id: &str, value: &str) -> String {
    format!("$('#{input_id}').val('{value}');")
}

fn change_event_script(input_id: &str) -> String {
    format!(
        "let event = new Event('change'); document.querySelector('#{input_id}').dispatchEvent(event);"
    )
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::browser::MockBrowser;
    use crate::config::load_config_str;

    #[test]
    fn test_date_range_scripts() {
        assert_eq!(
            set_value_script("ctl00_ctl00_content_content_txtDate", "01/01/2024 - 01/11/2024"),
            "$('#ctl00_ctl00_content_content_txtDate').val('01/01/2024 - 01/11/2024');"
        );
        assert!(change_event_script("x").contains("document.querySelector('#x').dispatchEvent(event)"));
    }

    #[test]
    fn test_settings_from_config() {
        let config = load_config_str(
            r#"
[booker]
account = "brand"
username = "user"
password = "pass"

[export]
link_refresh_attempts = 4
location_switch_delay_ms = 250
"#,
        )
        .unwrap();

        let settings = FlowSettings::from_config(&config).unwrap();
        assert_eq!(settings.timezone, chrono_tz::America::Los_Angeles);
        assert_eq!(settings.customers_location.id.as_str(), "36085");
        assert_eq!(settings.customers.link_refresh_attempts, 4);
        assert_eq!(settings.customers.link_wait, Duration::from_secs(300));
        assert_eq!(settings.location_switch_delay, Duration::from_millis(250));
        assert!(settings.orders_wait_for_overlay);
    }

    #[tokio::test]
    async fn test_failed_login_quits_and_names_flow() {
        let scratch = tempfile::tempdir().unwrap();
        let browser = MockBrowser::new();
        let settings = test_support::fast_settings();
        let exporter = Exporter::new(
            &browser,
            &settings,
            DownloadDirectory::new(scratch.path()),
            FileRelocator::new(scratch.path(), None),
        );

        let err = exporter.login("brand", "user", "pass").await.unwrap_err();
        assert!(err.to_string().starts_with("login flow failed"));
        assert!(browser.is_terminated());
    }
}
