//! External system adapters
//!
//! - [`browser`]: UI automation behind the [`browser::BrowserSession`] trait
//! - [`analytics`]: flow event sinks
//! - [`connectivity`]: outbound network probe

pub mod analytics;
pub mod browser;
pub mod connectivity;
