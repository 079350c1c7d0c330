//! cops-client - request helpers for the COPS platform API
//!
//! This crate wraps an HTTP transport with GET/POST/PUT/DELETE helpers that
//! resolve the API base URL from a session cookie, send form-encoded bodies,
//! route failed responses to a shared notifier and run the logout flow.

pub mod cli;
pub mod config;
pub mod cookies;
pub mod error;
pub mod exit_code;
pub mod form;
pub mod http;
pub mod logging;
pub mod navigation;
pub mod output;
pub mod rejection;
pub mod session;
pub mod utils;

pub use error::{CopsError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
