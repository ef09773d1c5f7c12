//! # stagedb
//!
//! A stage-based snapshot harness for embedded SQLite datasets: stages are
//! named database snapshots derived from one another by whole-file cloning,
//! populated through batched bulk inserts, and read through typed query
//! helpers.

pub mod bulk;
pub mod cli;
pub mod commands;
pub mod data;
pub mod error;
pub mod loader;
pub mod progress;
pub mod queries;
pub mod query;
pub mod schema;
pub mod sql;
pub mod stage;
pub mod workspace;

pub use error::{Result, StagedbError};
pub use query::Row;
pub use stage::{StageHandle, StageStore};
pub use workspace::StagedbWorkspace;

/// Current format version for stagedb workspaces
pub const FORMAT_VERSION: &str = "1.0.0";

/// Default batch size for name/lookup tables
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Default batch size for high-volume fact tables
pub const FACT_BATCH_SIZE: usize = 50_000;
