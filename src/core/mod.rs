// mod.rs - Core logic module

pub mod aggregate;
pub mod pipeline;
pub mod state;

// Re-export main types for convenience
pub use aggregate::{aggregate_records, Cluster, ClusterAggregator, ClusterCollection};
pub use pipeline::{Pipeline, PipelineConfig, RunSummary};
pub use state::{RunState, RunTracker};
