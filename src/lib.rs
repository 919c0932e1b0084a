// Booker Export - Browser-driven CSV export collector for Booker
// Copyright (c) 2025 Booker Export Contributors
// Licensed under the MIT License

//! # booker-export - CSV exports from the Booker admin UI
//!
//! Booker exposes no API for bulk data, so booker-export drives a Chrome
//! session through the admin pages, triggers the built-in CSV exports for
//! customers, appointments and orders, and moves each downloaded file into a
//! destination tree for downstream ingestion.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export flows, waits, relocation and task dispatch
//! - [`adapters`] - Browser automation, analytics sink, connectivity probe
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Destination Layout
//!
//! ```text
//! <destination>/Customer/Customer 2024-01-05.csv
//! <destination>/Appointment/51309/Appointment 2024-01-01-2024-01-11.csv
//! <destination>/Order/36085/Order 2024-01-12-2024-01-22.csv
//! ```
//!
//! ## Chunked Exports
//!
//! Appointments and orders are exported in fixed windows so no single report
//! grows past what the UI can produce:
//!
//! ```rust
//! use booker_export::core::export::ChunkedRange;
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 1, 25).unwrap();
//! let windows: Vec<String> = ChunkedRange::new(start, end, 11)
//!     .map(|w| w.ui_range())
//!     .collect();
//!
//! assert_eq!(windows, vec![
//!     "01/01/2024 - 01/11/2024",
//!     "01/12/2024 - 01/22/2024",
//!     "01/23/2024 - 02/02/2024",
//! ]);
//! ```
//!
//! ## Error Handling
//!
//! All library errors are [`domain::BookerError`]. A failure inside an
//! export flow closes the browser session and is returned wrapped with the
//! flow name:
//!
//! ```rust,no_run
//! use booker_export::domain::BookerError;
//!
//! fn example() -> Result<(), BookerError> {
//!     let config = booker_export::config::load_config("booker.toml")?;
//!     println!("{} locations configured", config.locations.len());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
