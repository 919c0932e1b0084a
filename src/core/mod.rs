//! Core export orchestration
//!
//! # Modules
//!
//! - [`wait`] - polling waits for UI conditions and download arrival
//! - [`relocate`] - moves downloaded files into the destination tree
//! - [`navigation`] - sign-in, location impersonation and page helpers
//! - [`export`] - the customers, appointments and orders flows
//! - [`tasks`] - invocation requests, the task table and dispatch
//!
//! # Invocation Workflow
//!
//! 1. **Resolve**: parse the request and resolve task, locations and dates
//! 2. **Sign in**: authenticate the browser session on the brand account
//! 3. **Export**: run each flow of the task; windows are exported in order
//! 4. **Relocate**: move every downloaded file into the destination tree
//! 5. **Report**: emit one analytics event per flow and flush at the end
//!
//! # Example
//!
//! ```rust,no_run
//! use booker_export::adapters::analytics::NullSink;
//! use booker_export::adapters::browser::WebDriverSession;
//! use booker_export::config::{load_config, Environment};
//! use booker_export::core::export::{Exporter, FlowSettings};
//! use booker_export::core::relocate::FileRelocator;
//! use booker_export::core::tasks::{run_task, InvocationRequest};
//! use booker_export::core::wait::DownloadDirectory;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("booker.toml")?;
//! let settings = FlowSettings::from_config(&config)?;
//! let scratch = Path::new("/tmp/downloads");
//! let browser = WebDriverSession::connect(&config.browser, &config.environment, scratch).await?;
//!
//! let exporter = Exporter::new(
//!     &browser,
//!     &settings,
//!     DownloadDirectory::new(scratch),
//!     FileRelocator::new(scratch, Some("/data/booker".into())),
//! );
//! let invocation = InvocationRequest::parse(r#"{"task": "orders", "location": "ll"}"#)?
//!     .resolve(&config, chrono::Utc::now(), settings.timezone)?;
//! let summary = run_task(&exporter, &invocation, &NullSink).await?;
//! println!("{}", summary.message());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod navigation;
pub mod relocate;
pub mod tasks;
pub mod wait;
