//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, politeness, caps, directory defaults)
//! - Library configuration and logging option types

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, DirectorySite, LogFormat, LogLevel};
