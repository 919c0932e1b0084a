//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for booker-export using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// booker-export - Booker CSV export automation
#[derive(Parser, Debug)]
#[command(name = "booker-export")]
#[command(version, about, long_about = None)]
#[command(author = "Booker Export Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "booker.toml", env = "BOOKER_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "BOOKER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one export task
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
