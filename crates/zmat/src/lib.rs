//! zmat library: configuration, dispatch and exit codes for the `zmat` binary.

pub mod app;
pub mod config;
pub mod errors;
