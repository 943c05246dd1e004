//! Core domain + application logic for textline.
//!
//! This crate is intentionally framework-agnostic. The completion API, the SMS
//! gateway and the HTTP surface live behind ports (traits) implemented in
//! adapter crates.

pub mod composer;
pub mod config;
pub mod delivery;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod logging;
pub mod ports;
pub mod service;

pub use errors::{Error, Result};
