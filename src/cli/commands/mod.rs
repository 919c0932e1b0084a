//! CLI command implementations
//!
//! Commands return process exit codes:
//! - 0: success
//! - 2: configuration error or bad request
//! - 4: connection error (network, WebDriver server)
//! - 5: fatal error (flow failure, timeout)

pub mod init;
pub mod run;
pub mod validate;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_CONFIG: i32 = 2;
pub const EXIT_CONNECTION: i32 = 4;
pub const EXIT_FATAL: i32 = 5;
