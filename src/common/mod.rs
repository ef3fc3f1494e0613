//! Common utilities shared across the runner

pub mod config;
pub mod error;
pub mod logging;

pub use config::Configuration;
pub use error::{Error, Result};
