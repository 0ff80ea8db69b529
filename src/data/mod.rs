// mod.rs - Data structures module

pub mod fasta;
pub mod loaders;
pub mod record;

// Re-export main types for convenience
pub use fasta::SequenceCensus;
pub use loaders::{AssignmentReader, Delimiter};
pub use record::{AssignmentRecord, SequenceId};
