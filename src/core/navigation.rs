//! Sign-in, location impersonation and report page navigation

use crate::adapters::browser::locator::booker;
use crate::adapters::browser::{BrowserSession, Locator};
use crate::config::BookerUrls;
use crate::core::wait::{require_element, WaitConfig};
use crate::domain::{BookerError, BrowserError, LocationId, Result, ViewId};
use std::time::Duration;

/// UI action sequences on the Booker admin pages
pub struct BookerPages<'a, B: BrowserSession> {
    browser: &'a B,
    urls: &'a BookerUrls,
    waits: &'a WaitConfig,
    location_switch_delay: Duration,
}

impl<'a, B: BrowserSession> BookerPages<'a, B> {
    pub fn new(
        browser: &'a B,
        urls: &'a BookerUrls,
        waits: &'a WaitConfig,
        location_switch_delay: Duration,
    ) -> Self {
        Self {
            browser,
            urls,
            waits,
            location_switch_delay,
        }
    }

    /// Signs in: account name first, then username and password
    ///
    /// Success is not verified here; a failed sign-in surfaces as a missing
    /// element on the next page.
    pub async fn login(&self, account: &str, username: &str, password: &str) -> Result<()> {
        tracing::info!(account, "Selecting account");
        self.browser.navigate(&self.urls.signin).await?;
        let account_field = require_element(self.browser, &booker::account_name_input(), self.waits).await?;
        self.browser.type_into(&account_field, account).await?;
        self.click_now(&booker::submit_button()).await?;

        tracing::info!(username, "Logging in");
        let username_field = require_element(self.browser, &booker::username_input(), self.waits).await?;
        let password_field = self.find_now(&booker::password_input()).await?;
        self.browser.type_into(&username_field, username).await?;
        self.browser.type_into(&password_field, password).await?;
        self.click_now(&booker::submit_button()).await
    }

    /// Impersonates the location with the given site id
    ///
    /// Pauses afterwards so the session switch completes server-side; the
    /// switch itself is not read back.
    pub async fn select_location(&self, location: &LocationId) -> Result<()> {
        self.open_locations().await?;
        tracing::info!(location = %location, "Selecting location");
        let link = require_element(self.browser, &booker::impersonate_link(location), self.waits).await?;
        self.browser.click(&link).await?;
        tokio::time::sleep(self.location_switch_delay).await;
        Ok(())
    }

    pub async fn open_locations(&self) -> Result<()> {
        self.open("locations", &self.urls.locations).await
    }

    pub async fn open_customers(&self) -> Result<()> {
        self.open("customers", &self.urls.customers).await
    }

    pub async fn open_appointments(&self) -> Result<()> {
        self.open("appointments", &self.urls.appointments).await
    }

    pub async fn open_orders(&self) -> Result<()> {
        self.open("orders", &self.urls.orders).await
    }

    /// Switches the report to a saved view
    ///
    /// # Errors
    ///
    /// Any failure is reported as [`BrowserError::ViewChange`].
    pub async fn change_export_view(&self, view: ViewId) -> Result<()> {
        tracing::info!(view = %view, "Changing export view");
        self.choose_option(&booker::view_select(), &view.to_string())
            .await
            .map_err(|e| BrowserError::ViewChange(format!("view {view}: {e}")).into())
    }

    /// Switches the appointments date filter type
    pub async fn change_date_type(&self, value: &str) -> Result<()> {
        tracing::info!(date_type = value, "Changing date type");
        self.choose_option(&booker::date_type_select(), value)
            .await
            .map_err(|e| BrowserError::ViewChange(format!("date type {value}: {e}")).into())
    }

    async fn choose_option(&self, select: &Locator, value: &str) -> Result<()> {
        let select_element = require_element(self.browser, select, self.waits).await?;
        self.browser.click(&select_element).await?;
        self.click_now(&booker::option(value)).await?;
        require_element(self.browser, &booker::selected_option(value), self.waits).await?;
        Ok(())
    }

    async fn open(&self, page: &str, url: &str) -> Result<()> {
        tracing::info!(page, "Navigating");
        self.browser.navigate(url).await
    }

    async fn find_now(&self, locator: &Locator) -> Result<B::Element> {
        self.browser
            .locate(locator)
            .await?
            .ok_or_else(|| BookerError::from(BrowserError::ElementNotFound(locator.to_string())))
    }

    /// Clicks an element that must already be on the page
    pub async fn click_now(&self, locator: &Locator) -> Result<()> {
        let element = self.find_now(locator).await?;
        self.browser.click(&element).await
    }
}
