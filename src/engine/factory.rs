// factory.rs - Engine lookup by name

use std::path::PathBuf;

use super::mmseqs::MmseqsEngine;
use super::precomputed::PrecomputedTable;
use super::traits::ClusteringEngine;

/// Everything needed to construct any of the built-in engines
#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    /// Engine executable (mmseqs)
    pub executable: Option<PathBuf>,
    /// Parent directory for scratch space and the exported table
    pub scratch_root: Option<PathBuf>,
    /// Existing table (precomputed)
    pub assignments: Option<PathBuf>,
}

pub struct EngineFactory;

impl EngineFactory {
    /// Create an engine by name
    pub fn create(name: &str, settings: &EngineSettings) -> Result<Box<dyn ClusteringEngine>, String> {
        match name {
            "mmseqs" => {
                let executable = settings
                    .executable
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("mmseqs"));
                Ok(Box::new(MmseqsEngine::new(executable, settings.scratch_root.clone())))
            }
            "precomputed" => {
                let path = settings
                    .assignments
                    .clone()
                    .ok_or("The precomputed engine requires --assignments")?;
                Ok(Box::new(PrecomputedTable::new(path)))
            }
            _ => Err(format!(
                "Unknown clustering engine: {}. Available: {}",
                name,
                Self::names().join(", ")
            )),
        }
    }

    /// List all available engines
    pub fn list_available() -> Vec<(&'static str, &'static str)> {
        vec![
            ("mmseqs", "MMseqs2 createdb + cluster + createtsv"),
            ("precomputed", "Existing representative/member table (no engine invocation)"),
        ]
    }

    pub fn names() -> Vec<&'static str> {
        Self::list_available().into_iter().map(|(name, _)| name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_known_engines() {
        let settings = EngineSettings {
            assignments: Some(PathBuf::from("clusters.tsv")),
            ..EngineSettings::default()
        };
        assert_eq!(EngineFactory::create("mmseqs", &settings).unwrap().name(), "mmseqs");
        let engine = EngineFactory::create("precomputed", &settings).unwrap();
        assert_eq!(engine.name(), "precomputed");
        assert!(!engine.requires_input());
    }

    #[test]
    fn test_precomputed_needs_table() {
        let err = EngineFactory::create("precomputed", &EngineSettings::default()).unwrap_err();
        assert!(err.contains("--assignments"));
    }

    #[test]
    fn test_unknown_engine_lists_names() {
        let err = EngineFactory::create("blastclust", &EngineSettings::default()).unwrap_err();
        assert!(err.contains("mmseqs"));
        assert!(err.contains("precomputed"));
    }
}
