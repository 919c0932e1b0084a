//! Appointments export flow

use super::summary::FlowOutcome;
use super::Exporter;
use crate::adapters::browser::locator::booker;
use crate::adapters::browser::BrowserSession;
use crate::core::wait::wait_for_loader_cycle;
use crate::domain::{EntityType, ExportWindow, Location, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

const FLOW: &str = "appointments";

/// Which date the appointments report filters on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentDateType {
    /// Date the appointment takes place (the report default)
    #[default]
    DateOn,
    /// Date the appointment was booked
    DateCreated,
}

impl std::str::FromStr for AppointmentDateType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "date_on" => Ok(Self::DateOn),
            "date_created" => Ok(Self::DateCreated),
            other => Err(format!(
                "Invalid date_type '{other}'. Must be one of: date_on, date_created"
            )),
        }
    }
}

impl<B: BrowserSession> Exporter<'_, B> {
    /// Exports appointments for `location` over `[start, end]`
    ///
    /// One file per window, relocated to
    /// `Appointment/<location id>/Appointment <start>-<end>.csv`.
    pub async fn appointments(
        &self,
        location: &Location,
        start: NaiveDate,
        end: NaiveDate,
        date_type: AppointmentDateType,
    ) -> Result<FlowOutcome> {
        self.guarded(
            FLOW,
            self.run_appointments(location, start, end, date_type),
        )
        .await
    }

    async fn run_appointments(
        &self,
        location: &Location,
        start: NaiveDate,
        end: NaiveDate,
        date_type: AppointmentDateType,
    ) -> Result<FlowOutcome> {
        let started = Instant::now();
        crate::log_flow_start!(FLOW, location.id);

        let pages = self.pages();
        pages.select_location(&location.id).await?;
        pages.open_appointments().await?;
        if date_type == AppointmentDateType::DateCreated {
            pages.change_date_type(booker::APPOINTMENT_CREATED_ON).await?;
        }
        pages.change_export_view(location.appointments_view_id).await?;

        let exported = self
            .export_windows(
                EntityType::Appointment,
                location,
                start,
                end,
                self.settings.waits.wait_time,
                move |window| self.trigger_appointments_window(window),
            )
            .await?;

        let mut outcome = FlowOutcome::new(FLOW, EntityType::Appointment, Some(location.id.clone()));
        for (window, moved) in exported {
            outcome.windows.push(window);
            outcome.files.extend(moved);
        }
        outcome.duration = started.elapsed();
        crate::log_flow_complete!(FLOW, outcome.exports(), outcome.duration);
        Ok(outcome)
    }

    async fn trigger_appointments_window(&self, window: ExportWindow) -> Result<()> {
        tracing::info!(window = %window.ui_range(), "Exporting appointments");
        self.set_date_range(booker::APPOINTMENTS_DATE_INPUT_ID, window)
            .await?;

        let waits = &self.settings.waits;
        wait_for_loader_cycle(
            self.browser,
            &booker::processing_overlay(),
            waits.loader_short_wait(),
            waits.loader_long_wait(),
            waits.loader_poll,
        )
        .await?;
        self.pages().click_now(&booker::export_button()).await
    }
}
