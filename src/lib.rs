// lib.rs - clustnum library root

//! # clustnum - Deterministic numbered clusters from sequence clustering
//!
//! This library turns the representative/member table produced by a sequence
//! clustering engine (MMseqs2) into uniquely numbered, stable clusters.
//!
//! ## Features
//!
//! - **Stable numbering**: clusters are numbered 1..K in the order their
//!   representatives first appear in the table, never by sorting or hashing
//! - **Partition checking**: a sequence assigned to two clusters is an error
//! - **Engine abstraction**: MMseqs2 runs as an external process behind the
//!   `ClusteringEngine` trait, with scoped scratch space
//! - **Multiple formats**: TSV, long TSV, commented summary, JSON
//! - **All-or-nothing output**: results replace the destination atomically
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use clustnum::prelude::*;
//!
//! let engine = PrecomputedTable::new("clu.tsv");
//! let config = PipelineConfig::new("sequences.faa", "clusters.tsv");
//! let summary = Pipeline::new(&engine, &config).run()?;
//! println!("{} clusters", summary.clusters);
//! # Ok::<(), clustnum::PipelineError>(())
//! ```

// Re-export all main modules
pub mod cli;
pub mod core;
pub mod data;
pub mod engine;
pub mod error;
pub mod output;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, ValidationResult};
    pub use crate::core::{aggregate_records, Cluster, ClusterAggregator, ClusterCollection};
    pub use crate::core::{Pipeline, PipelineConfig, RunState, RunSummary};
    pub use crate::data::{AssignmentReader, AssignmentRecord, Delimiter, SequenceCensus};
    pub use crate::engine::{ClusterMode, ClusteringEngine, CoverageMode, EngineParams};
    pub use crate::engine::{EngineFactory, EngineSettings, MmseqsEngine, PrecomputedTable};
    pub use crate::error::PipelineError;
    pub use crate::output::{write_clusters, OutputFormat};
}

// Re-export main types at the root level for convenience
pub use cli::{Args, ValidationResult};
pub use core::{Cluster, ClusterCollection, Pipeline, PipelineConfig};
pub use data::{AssignmentRecord, SequenceId};
pub use engine::{ClusteringEngine, EngineParams};
pub use error::{FailureKind, PipelineError};
