//! Orders export flow

use super::summary::FlowOutcome;
use super::Exporter;
use crate::adapters::browser::locator::booker;
use crate::adapters::browser::BrowserSession;
use crate::core::wait::wait_for_loader_cycle;
use crate::domain::{EntityType, ExportWindow, Location, Result};
use chrono::NaiveDate;
use std::time::Instant;

const FLOW: &str = "orders";

impl<B: BrowserSession> Exporter<'_, B> {
    /// Exports orders for `location` over `[start, end]`
    ///
    /// Order exports are slower to generate, so each download gets twice the
    /// standard wait.
    pub async fn orders(
        &self,
        location: &Location,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FlowOutcome> {
        self.guarded(FLOW, self.run_orders(location, start, end)).await
    }

    async fn run_orders(
        &self,
        location: &Location,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FlowOutcome> {
        let started = Instant::now();
        crate::log_flow_start!(FLOW, location.id);

        let pages = self.pages();
        pages.select_location(&location.id).await?;
        pages.open_orders().await?;
        pages.change_export_view(location.orders_view_id).await?;

        let exported = self
            .export_windows(
                EntityType::Order,
                location,
                start,
                end,
                self.settings.waits.wait_time * 2,
                move |window| self.trigger_orders_window(window),
            )
            .await?;

        let mut outcome = FlowOutcome::new(FLOW, EntityType::Order, Some(location.id.clone()));
        for (window, moved) in exported {
            outcome.windows.push(window);
            outcome.files.extend(moved);
        }
        outcome.duration = started.elapsed();
        crate::log_flow_complete!(FLOW, outcome.exports(), outcome.duration);
        Ok(outcome)
    }

    async fn trigger_orders_window(&self, window: ExportWindow) -> Result<()> {
        tracing::info!(window = %window.ui_range(), "Exporting orders");
        self.set_date_range(booker::ORDERS_DATE_INPUT_ID, window)
            .await?;
        tokio::time::sleep(self.settings.orders_settle_delay).await;

        if self.settings.orders_wait_for_overlay {
            let waits = &self.settings.waits;
            wait_for_loader_cycle(
                self.browser,
                &booker::processing_overlay(),
                waits.loader_short_wait(),
                waits.loader_long_wait(),
                waits.loader_poll,
            )
            .await?;
        }
        self.click_export().await
    }
}
