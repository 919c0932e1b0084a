//! Browser session abstraction
//!
//! The export flows only need a handful of UI primitives. They are expressed
//! here so the flows run unchanged against a real WebDriver session or the
//! scripted [`MockBrowser`](super::mock::MockBrowser).

use super::locator::Locator;
use crate::domain::Result;
use async_trait::async_trait;

/// Browser session driving the Booker web UI
///
/// A session is owned by one invocation and used sequentially. Once
/// [`quit`](BrowserSession::quit) has been called every other operation fails
/// with [`BrowserError::SessionTerminated`](crate::domain::BrowserError::SessionTerminated).
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Handle to an element located on the current page
    type Element: Clone + Send + Sync;

    /// Loads `url` in the current tab
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Reloads the current page
    async fn refresh(&self) -> Result<()>;

    /// Looks up an element without waiting
    ///
    /// Returns `Ok(None)` when nothing on the page matches.
    async fn locate(&self, locator: &Locator) -> Result<Option<Self::Element>>;

    /// Whether the element is displayed and enabled
    async fn is_clickable(&self, element: &Self::Element) -> Result<bool>;

    async fn click(&self, element: &Self::Element) -> Result<()>;

    /// Sends keystrokes to an input element
    async fn type_into(&self, element: &Self::Element, text: &str) -> Result<()>;

    /// Executes JavaScript in the page, ignoring its return value
    async fn run_script(&self, script: &str) -> Result<()>;

    /// Terminates the session
    ///
    /// Idempotent: quitting an already terminated session is a no-op.
    async fn quit(&self) -> Result<()>;

    fn is_terminated(&self) -> bool;
}
