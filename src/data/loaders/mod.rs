// mod.rs - Assignment table loaders

pub mod tsv;

pub use tsv::{AssignmentReader, Delimiter};
