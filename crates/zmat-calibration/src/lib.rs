//! # zmat-calibration
//!
//! Measures where Strassen overtakes the classical kernel on this machine
//! and persists the resulting thresholds as a calibration profile.

pub mod calibration;
pub mod io;
pub mod microbench;
pub mod profile;
pub mod runner;

pub use calibration::{CalibrationEngine, CalibrationMode};
pub use profile::CalibrationProfile;
