// src/lib.rs
//! Character frequency tables: load snapshots of per-character counts,
//! reconcile successive snapshots, and answer point and ranked queries.
//!
//! ```text
//! snapshot text ──> parser::load ──> FrequencyTable ──> get / rank / total_count
//!                                         │
//!            later snapshot ──> merge ────┘  (counts may only go up)
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod persistence;
pub mod pipeline;

pub use crate::config::Config;
pub use crate::core::merge::{merge, merge_with, MergeReport, Regression, RegressionPolicy};
pub use crate::core::parser::load;
pub use crate::core::table::{FrequencyTable, Ranking};
pub use crate::core::types::{Count, FrequencyEntry};
pub use crate::core::writer::to_snapshot_string;
pub use crate::error::{CountError, FreqError, ParseError, RegressionError, Result};
pub use crate::pipeline::SnapshotPipeline;
