// mod.rs - Clustering engines module root

pub mod factory;
pub mod mmseqs;
pub mod precomputed;
pub mod traits;

// Re-export main types for convenience
pub use factory::{EngineFactory, EngineSettings};
pub use mmseqs::MmseqsEngine;
pub use precomputed::PrecomputedTable;
pub use traits::{
    AssignmentTable, ClusterMode, ClusteringEngine, CoverageMode, EngineParams, EngineStep,
};
