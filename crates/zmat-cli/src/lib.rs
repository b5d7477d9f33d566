//! # zmat-cli
//!
//! CLI output, result presentation and shell completion.

pub mod completion;
pub mod output;
pub mod presenter;

pub use presenter::{CliPresenter, RunRecord, RunReport};
