//! Logging setup.
//!
//! Everything logs through the `log` facade; `env_logger` is only wired up
//! here, once, by the binary.

mod init;

pub use init::{init_logging, LoggingConfig};
