// traits.rs - Clustering engine capability and its parameter set

use std::fmt::{self, Debug, Display};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tempfile::TempPath;

use crate::error::PipelineError;

/// The three external invocations, in the order they must run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineStep {
    /// Build the engine's internal sequence index
    CreateDb,
    /// Cluster the indexed sequences
    Cluster,
    /// Export the representative/member table
    CreateTsv,
}

impl EngineStep {
    pub const ALL: [EngineStep; 3] = [EngineStep::CreateDb, EngineStep::Cluster, EngineStep::CreateTsv];

    pub fn name(&self) -> &'static str {
        match self {
            EngineStep::CreateDb => "createdb",
            EngineStep::Cluster => "cluster",
            EngineStep::CreateTsv => "createtsv",
        }
    }
}

impl Display for EngineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Clustering strategy (`--cluster-mode`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClusterMode {
    #[default]
    SetCover,
    Connected,
    Greedy,
    GreedyMemory,
}

impl FromStr for ClusterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "0" | "set-cover" | "setcover" => Ok(ClusterMode::SetCover),
            "1" | "connected" | "connected-component" => Ok(ClusterMode::Connected),
            "2" | "greedy" | "cd-hit" => Ok(ClusterMode::Greedy),
            "3" | "greedy-memory" => Ok(ClusterMode::GreedyMemory),
            _ => Err(format!(
                "Invalid cluster mode: {}. Use: set-cover (0), connected (1), greedy (2), greedy-memory (3)",
                s
            )),
        }
    }
}

impl ClusterMode {
    /// Numeric code understood by the engine
    pub fn code(&self) -> u8 {
        match self {
            ClusterMode::SetCover => 0,
            ClusterMode::Connected => 1,
            ClusterMode::Greedy => 2,
            ClusterMode::GreedyMemory => 3,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            ClusterMode::SetCover => "greedy set cover",
            ClusterMode::Connected => "connected component",
            ClusterMode::Greedy => "greedy incremental (CD-HIT like)",
            ClusterMode::GreedyMemory => "greedy incremental, low memory",
        }
    }
}

/// How alignment coverage is computed (`--cov-mode`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoverageMode {
    #[default]
    Bidirectional,
    Target,
    Query,
    TargetLength,
    QueryLength,
    Shorter,
}

impl FromStr for CoverageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "0" | "bidirectional" | "both" => Ok(CoverageMode::Bidirectional),
            "1" | "target" => Ok(CoverageMode::Target),
            "2" | "query" => Ok(CoverageMode::Query),
            "3" | "target-length" => Ok(CoverageMode::TargetLength),
            "4" | "query-length" => Ok(CoverageMode::QueryLength),
            "5" | "shorter" => Ok(CoverageMode::Shorter),
            _ => Err(format!(
                "Invalid coverage mode: {}. Use: bidirectional (0), target (1), query (2), target-length (3), query-length (4), shorter (5)",
                s
            )),
        }
    }
}

impl CoverageMode {
    pub fn code(&self) -> u8 {
        match self {
            CoverageMode::Bidirectional => 0,
            CoverageMode::Target => 1,
            CoverageMode::Query => 2,
            CoverageMode::TargetLength => 3,
            CoverageMode::QueryLength => 4,
            CoverageMode::Shorter => 5,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            CoverageMode::Bidirectional => "coverage of query and target",
            CoverageMode::Target => "coverage of target",
            CoverageMode::Query => "coverage of query",
            CoverageMode::TargetLength => "target length ratio",
            CoverageMode::QueryLength => "query length ratio",
            CoverageMode::Shorter => "coverage of shorter sequence",
        }
    }
}

/// Parameters fixed for one clustering run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineParams {
    /// Minimum alignment length in residues
    pub min_aln_len: u32,
    pub cluster_mode: ClusterMode,
    pub cov_mode: CoverageMode,
    /// Minimum sequence identity, fraction in [0, 1]
    pub min_seq_id: f64,
    pub threads: Option<usize>,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            min_aln_len: 0,
            cluster_mode: ClusterMode::SetCover,
            cov_mode: CoverageMode::Bidirectional,
            min_seq_id: 0.9,
            threads: None,
        }
    }
}

impl EngineParams {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.min_seq_id) {
            return Err(format!(
                "Minimum sequence identity must be between 0.0 and 1.0 (got {})",
                self.min_seq_id
            ));
        }
        if self.threads == Some(0) {
            return Err("Thread count must be at least 1".to_string());
        }
        Ok(())
    }

    /// Arguments for the cluster step, in engine syntax
    pub fn cluster_args(&self) -> Vec<String> {
        let mut args = vec![
            "--min-aln-len".to_string(),
            self.min_aln_len.to_string(),
            "--cluster-mode".to_string(),
            self.cluster_mode.code().to_string(),
            "--cov-mode".to_string(),
            self.cov_mode.code().to_string(),
            "--min-seq-id".to_string(),
            self.min_seq_id.to_string(),
        ];
        if let Some(threads) = self.threads {
            args.push("--threads".to_string());
            args.push(threads.to_string());
        }
        args
    }
}

/// The exported representative/member table.
///
/// Tables the engine produced in scratch space are deleted when this value
/// drops; tables supplied by the user are left alone.
#[derive(Debug)]
pub struct AssignmentTable {
    path: PathBuf,
    _cleanup: Option<TempPath>,
}

impl AssignmentTable {
    /// A table the caller owns
    pub fn existing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _cleanup: None,
        }
    }

    /// A scratch table removed on drop
    pub fn temporary(path: TempPath) -> Self {
        Self {
            path: path.to_path_buf(),
            _cleanup: Some(path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_temporary(&self) -> bool {
        self._cleanup.is_some()
    }
}

/// A black-box similarity clustering engine.
///
/// `run` executes every step in order and reports each completed step through
/// `on_step`. The first failing step ends the run with `EngineStepFailure`.
pub trait ClusteringEngine: Debug {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn run(
        &self,
        params: &EngineParams,
        input: &Path,
        on_step: &mut dyn FnMut(EngineStep),
    ) -> Result<AssignmentTable, PipelineError>;

    /// Whether `run` reads the input sequence collection
    fn requires_input(&self) -> bool {
        true
    }

    /// Human-readable commands `run` would execute, for dry runs
    fn planned_commands(&self, _params: &EngineParams, _input: &Path) -> Vec<String> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_parse_names_and_codes() {
        assert_eq!("set-cover".parse::<ClusterMode>().unwrap(), ClusterMode::SetCover);
        assert_eq!("2".parse::<ClusterMode>().unwrap(), ClusterMode::Greedy);
        assert_eq!("Connected".parse::<ClusterMode>().unwrap().code(), 1);
        assert!("7".parse::<ClusterMode>().is_err());

        assert_eq!("1".parse::<CoverageMode>().unwrap(), CoverageMode::Target);
        assert_eq!("shorter".parse::<CoverageMode>().unwrap().code(), 5);
        assert!("sideways".parse::<CoverageMode>().is_err());
    }

    #[test]
    fn test_params_validation() {
        assert!(EngineParams::default().validate().is_ok());

        let params = EngineParams {
            min_seq_id: 1.2,
            ..EngineParams::default()
        };
        assert!(params.validate().is_err());

        let params = EngineParams {
            threads: Some(0),
            ..EngineParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_cluster_args() {
        let params = EngineParams {
            min_aln_len: 50,
            cluster_mode: ClusterMode::Greedy,
            cov_mode: CoverageMode::Query,
            min_seq_id: 0.5,
            threads: Some(8),
        };
        assert_eq!(
            params.cluster_args(),
            vec![
                "--min-aln-len", "50", "--cluster-mode", "2", "--cov-mode", "2", "--min-seq-id",
                "0.5", "--threads", "8"
            ]
        );
    }

    #[test]
    fn test_step_order_and_names() {
        let names: Vec<&str> = EngineStep::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["createdb", "cluster", "createtsv"]);
    }
}
