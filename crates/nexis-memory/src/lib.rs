//! # nexis-memory
//!
//! Persistent notes and reminders for Nexis (SQLite-backed).

pub mod store;

pub use store::{Note, Reminder, Store};
