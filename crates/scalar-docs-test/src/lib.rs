//! Test harness for the scalar-docs middleware.
//!
//! Provides `TestProject` for laying out spec files in a temporary
//! directory and `TestServer` for full-stack HTTP tests against it.

pub mod server;

#[cfg(test)]
mod scenarios;

pub use server::{TestError, TestProject, TestServer};
