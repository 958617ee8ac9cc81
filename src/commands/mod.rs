//! Command implementations for the CLI
//!
//! - start: Start the query service
//! - build: Build the dataset artifact from the source workbooks
//! - test: Check configuration and artifact validity
//! - config: Configuration display

pub mod build;
pub mod config;
pub mod start;
