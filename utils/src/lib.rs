//! Shared utilities for the Sphygmos client core.

pub mod logging;
pub mod time;

pub use logging::{init_logging, LogFormat};
pub use time::format_countdown;
