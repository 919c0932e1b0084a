//! Browser automation
//!
//! - [`BrowserSession`] - the UI primitives the export flows rely on
//! - [`WebDriverSession`] - Chrome over WebDriver via `thirtyfour`
//! - [`MockBrowser`] - scripted in-memory session for tests
//! - [`locator::booker`] - element locators of the Booker admin pages

pub mod locator;
pub mod mock;
pub mod traits;
pub mod webdriver;

pub use locator::Locator;
pub use mock::{BrowserCall, MockAction, MockBrowser, MockElement};
pub use traits::BrowserSession;
pub use webdriver::WebDriverSession;
