//! # Marquee Common Library
//!
//! Shared code for the Marquee name-ranking workspace:
//! - Error and result types
//! - TOML configuration loading and resolution
//! - Logging initialization
//! - Time helpers

pub mod config;
pub mod error;
pub mod logging;
pub mod time;

pub use config::MarqueeConfig;
pub use error::{Error, Result};
