// config.rs - Configuration file support

use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    // Input/Output
    pub input: Option<String>,
    pub output: Option<String>,
    pub assignments: Option<String>,

    // Engine
    pub engine: Option<String>,
    pub mmseqs_bin: Option<String>,
    pub threads: Option<usize>,
    pub tmp_dir: Option<String>,

    // Clustering parameters
    pub min_aln_len: Option<u32>,
    pub cluster_mode: Option<String>,
    pub cov_mode: Option<String>,
    pub min_seq_id: Option<f64>,

    // Output
    pub format: Option<String>,
    pub delimiter: Option<String>,
    pub min_size: Option<usize>,

    // Flags
    pub no_census: Option<bool>,
    pub dry_run: Option<bool>,
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config = Self::from_toml(&content)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        println!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# clustnum.toml - Configuration file for clustnum
# Command line arguments will override these settings

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# Input sequence collection (FASTA)
input = "/path/to/sequences.faa"

# Output file for numbered clusters
output = "clusters.tsv"

# Existing representative/member table (skips the engine when set)
# assignments = "clu.tsv"

# =============================================================================
# ENGINE
# =============================================================================

# Clustering engine: mmseqs, precomputed
engine = "mmseqs"

# Path to the mmseqs executable
mmseqs_bin = "mmseqs"

# Number of engine threads (omit to let the engine decide)
# threads = 16

# Directory for engine scratch space (omit for the system temp dir)
# tmp_dir = "/scratch"

# =============================================================================
# CLUSTERING PARAMETERS
# =============================================================================

# Minimum alignment length in residues
min_aln_len = 0

# Cluster mode: set-cover, connected, greedy, greedy-memory (or 0-3)
cluster_mode = "set-cover"

# Coverage mode: bidirectional, target, query, target-length, query-length, shorter (or 0-5)
cov_mode = "bidirectional"

# Minimum sequence identity (0.0-1.0)
min_seq_id = 0.9

# =============================================================================
# OUTPUT
# =============================================================================

# Output format: tsv, long, summary, json
format = "tsv"

# Assignment table delimiter: tab, whitespace
delimiter = "tab"

# Omit clusters with fewer members from the output
min_size = 1

# =============================================================================
# FLAGS
# =============================================================================

# Skip scanning the input FASTA for coverage warnings
no_census = false

# Validate inputs and print planned engine commands without running them
dry_run = false
"#
        .to_string()
    }
}
