//! Customers export flow
//!
//! The customers page does not download directly. Clicking export queues a
//! job whose result shows up in an export history list as a link labelled
//! with the minute the job was requested; the link becomes downloadable once
//! the job finishes.

use super::labels::probe_labels;
use super::summary::FlowOutcome;
use super::Exporter;
use crate::adapters::browser::locator::booker;
use crate::adapters::browser::BrowserSession;
use crate::core::wait::wait_for_element;
use crate::domain::{EntityType, ExportError, Result, ViewId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

const FLOW: &str = "customers";

/// Saved customer list views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerView {
    /// Every customer
    All,
    /// Customers added today
    AddedToday,
    /// Customers added during the last year
    AddedLastYear,
    /// Customers added during the last week
    AddedLastWeek,
}

impl CustomerView {
    pub fn view_id(self) -> ViewId {
        match self {
            CustomerView::All => ViewId::new(57514),
            CustomerView::AddedToday => ViewId::new(59300),
            CustomerView::AddedLastYear => ViewId::new(59301),
            CustomerView::AddedLastWeek => ViewId::new(59303),
        }
    }
}

impl<B: BrowserSession> Exporter<'_, B> {
    /// Exports the customer list for `view`
    ///
    /// The file is relocated as `Customer <trigger date>.csv` with no
    /// location component.
    pub async fn customers(&self, view: CustomerView) -> Result<FlowOutcome> {
        self.guarded(FLOW, self.run_customers(view.view_id())).await
    }

    async fn run_customers(&self, view: ViewId) -> Result<FlowOutcome> {
        let started = Instant::now();
        let location = &self.settings.customers_location;
        crate::log_flow_start!(FLOW, location.id);

        let file_count = self.downloads.file_count()?;
        let pages = self.pages();
        pages.select_location(&location.id).await?;
        pages.open_customers().await?;

        let trigger = self.start_customers_export(view).await?;
        self.download_customers_export(trigger).await?;

        tokio::time::sleep(self.settings.customers.before_download_delay).await;
        let waits = &self.settings.waits;
        if !self
            .downloads
            .wait_until_file_count(file_count + 1, waits.wait_time, waits.file_poll)
            .await?
        {
            return Err(ExportError::DownloadTimeout {
                entity: EntityType::Customer.to_string(),
                timeout_secs: waits.wait_time.as_secs(),
            }
            .into());
        }
        tracing::info!("Customer download finished");

        let anchor_date = super::labels::probe_times(trigger)[0]
            .with_timezone(&self.settings.timezone)
            .date_naive();
        let mut outcome = FlowOutcome::new(FLOW, EntityType::Customer, None);
        if let Some(path) = self.relocator.move_exported_file(
            EntityType::Customer,
            None,
            Some(anchor_date),
            None,
        )? {
            outcome.files.push(path);
        }

        outcome.duration = started.elapsed();
        crate::log_flow_complete!(FLOW, outcome.exports(), outcome.duration);
        Ok(outcome)
    }

    /// Switches the view, clicks export and confirms the dialog if one shows
    ///
    /// Returns the instant the export was triggered.
    async fn start_customers_export(&self, view: ViewId) -> Result<DateTime<Utc>> {
        tracing::info!(view = %view, "Starting customers export");
        let pages = self.pages();
        pages.change_export_view(view).await?;
        pages.click_now(&booker::export_button()).await?;
        let trigger = self.clock.now();

        let timings = &self.settings.customers;
        let waits = &self.settings.waits;
        tokio::time::sleep(timings.ok_button_delay).await;
        match wait_for_element(
            self.browser,
            &booker::ok_button(),
            waits.wait_time,
            waits.element_poll,
            false,
        )
        .await?
        {
            Some(ok) => {
                tracing::info!("Export started, confirming dialog");
                self.browser.click(&ok).await?;
                tokio::time::sleep(timings.after_ok_delay).await;
            }
            None => tracing::info!("Export started, no confirmation dialog"),
        }
        Ok(trigger)
    }

    /// Finds the export link for `trigger` and starts its download
    async fn download_customers_export(&self, trigger: DateTime<Utc>) -> Result<()> {
        let waits = &self.settings.waits;
        let labels = probe_labels(trigger, self.settings.timezone);

        let mut matched = None;
        for label in &labels {
            tracing::info!(label = %label, "Searching for export link");
            let found = wait_for_element(
                self.browser,
                &booker::export_label(label),
                waits.wait_time,
                waits.element_poll,
                false,
            )
            .await?;
            if found.is_some() {
                tracing::info!(label = %label, "Found export link");
                matched = Some(label.clone());
                break;
            }
        }
        let Some(label) = matched else {
            return Err(ExportError::ExportNotFound(format!(
                "no export link labelled {}",
                labels.join(" / ")
            ))
            .into());
        };

        let timings = &self.settings.customers;
        tokio::time::sleep(timings.before_refresh_delay).await;
        self.browser.refresh().await?;
        tokio::time::sleep(timings.after_refresh_delay).await;

        let link = booker::export_download_link(&label);
        for attempt in 1..=timings.link_refresh_attempts {
            if let Some(element) = wait_for_element(
                self.browser,
                &link,
                timings.link_wait,
                waits.element_poll,
                false,
            )
            .await?
            {
                self.browser.click(&element).await?;
                tracing::info!(label = %label, "Customer export download started");
                return Ok(());
            }
            crate::log_retry_attempt!(attempt, timings.link_refresh_attempts, "export link not ready");
            self.browser.refresh().await?;
        }

        Err(ExportError::ExportNotFound(format!("export {label} never became downloadable")).into())
    }
}
