//! # nexis-core
//!
//! Core traits, configuration, speech sanitizing, and error handling for the
//! Nexis assistant.

pub mod config;
pub mod error;
pub mod sanitize;
pub mod traits;

pub use config::shellexpand;
