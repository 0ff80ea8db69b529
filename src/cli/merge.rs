// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Input/Output
        if self.input.is_none() {
            self.input = config.input;
        }
        if self.output.is_none() {
            self.output = config.output;
        }
        if self.assignments.is_none() {
            self.assignments = config.assignments;
        }

        // Engine (only override defaults, not explicit CLI values)
        if let Some(engine) = config.engine.filter(|_| self.engine == "mmseqs") {
            self.engine = engine;
        }
        if let Some(bin) = config.mmseqs_bin.filter(|_| self.mmseqs_bin == "mmseqs") {
            self.mmseqs_bin = bin;
        }
        if self.threads.is_none() {
            self.threads = config.threads;
        }
        if self.tmp_dir.is_none() {
            self.tmp_dir = config.tmp_dir;
        }

        // Clustering parameters
        if let Some(len) = config.min_aln_len.filter(|_| self.min_aln_len == 0) {
            self.min_aln_len = len;
        }
        if let Some(mode) = config.cluster_mode.filter(|_| self.cluster_mode == "set-cover") {
            self.cluster_mode = mode;
        }
        if let Some(mode) = config.cov_mode.filter(|_| self.cov_mode == "bidirectional") {
            self.cov_mode = mode;
        }
        if let Some(id) = config.min_seq_id.filter(|_| self.min_seq_id == 0.9) {
            self.min_seq_id = id;
        }

        // Output
        if let Some(format) = config.format.filter(|_| self.format == "tsv") {
            self.format = format;
        }
        if let Some(delimiter) = config.delimiter.filter(|_| self.delimiter == "tab") {
            self.delimiter = delimiter;
        }
        if let Some(size) = config.min_size.filter(|_| self.min_size == 1) {
            self.min_size = size;
        }

        // Flags (CLI flags take precedence, config only sets if not explicitly set)
        if !self.no_census && config.no_census.unwrap_or(false) {
            self.no_census = true;
        }
        if !self.dry_run && config.dry_run.unwrap_or(false) {
            self.dry_run = true;
        }

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self, String> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}
