// fasta.rs - Input sequence census for cross-checking clustering coverage

use bio::io::fasta;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::core::ClusterCollection;
use crate::data::record::SequenceId;

/// Identifiers found in the input sequence collection, in file order
#[derive(Debug, Clone, Default)]
pub struct SequenceCensus {
    pub ids: Vec<SequenceId>,
    pub total_residues: usize,
    pub duplicate_ids: usize,
    seen: HashSet<SequenceId>,
}

/// Mismatches between the input collection and the clusters built from it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CensusReport {
    /// In the input, but in no cluster
    pub unclustered: Vec<SequenceId>,
    /// In a cluster, but not in the input
    pub unknown: Vec<SequenceId>,
}

impl CensusReport {
    pub fn is_consistent(&self) -> bool {
        self.unclustered.is_empty() && self.unknown.is_empty()
    }
}

impl SequenceCensus {
    /// Scan a FASTA file. Only identifiers and lengths are kept.
    pub fn from_fasta(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open sequence file '{}': {}", path.display(), e))?;
        Self::from_reader(BufReader::new(file))
            .map_err(|e| format!("Invalid FASTA record in {}: {}", path.display(), e))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, String> {
        let reader = fasta::Reader::new(reader);
        let mut census = Self::default();

        for record_result in reader.records() {
            let record = record_result.map_err(|e| e.to_string())?;
            let id = record.id().to_string();
            census.total_residues += record.seq().len();
            if census.seen.insert(id.clone()) {
                census.ids.push(id);
            } else {
                census.duplicate_ids += 1;
            }
        }

        Ok(census)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Compare against the clusters. Both lists keep their source order.
    pub fn compare(&self, clusters: &ClusterCollection) -> CensusReport {
        let unclustered = self
            .ids
            .iter()
            .filter(|id| clusters.cluster_of(id).is_none())
            .cloned()
            .collect();

        let unknown = clusters
            .iter()
            .flat_map(|cluster| cluster.members.iter())
            .filter(|member| !self.contains(member))
            .cloned()
            .collect();

        CensusReport { unclustered, unknown }
    }
}
