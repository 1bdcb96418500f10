//! Middleware module
//!
//! HTTP request logging

pub mod logging;

pub use logging::request_logging_middleware;
