//! # zmat-memory
//!
//! Memory management for the `zmat` workspace.
//!
//! Provides a pool of reusable `BigInt` cell buffers organised by size class,
//! and the atomic counters used to track pool and scratch-matrix usage.
#![warn(missing_docs)]

pub mod pool;
pub mod stats;

pub use pool::CellPool;
pub use stats::{AtomicPoolStats, AtomicScratchStats, PoolStats, ScratchStats};
