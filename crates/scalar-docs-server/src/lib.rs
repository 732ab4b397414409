//! Demo server for the scalar-docs middleware.
//!
//! This library exposes the server pieces for the test harness.
//! The main entry point is the `scalar-docs` binary.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod server;

pub use config::ServerConfig;
pub use error::ServerError;
