// mmseqs.rs - MMseqs2 command-line engine

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use tempfile::TempDir;

use super::traits::{AssignmentTable, ClusteringEngine, EngineParams, EngineStep};
use crate::error::PipelineError;

/// Lines of engine stderr kept in a failure message
const STDERR_TAIL_LINES: usize = 5;

/// Runs `createdb`, `cluster` and `createtsv` as child processes.
///
/// Sequence index, cluster database and the engine's own tmp directory live
/// in one scratch `TempDir` that is removed when `run` returns, whatever the
/// outcome. Only the exported table outlives the call.
#[derive(Debug, Clone)]
pub struct MmseqsEngine {
    executable: PathBuf,
    scratch_root: Option<PathBuf>,
}

impl MmseqsEngine {
    pub fn new(executable: impl Into<PathBuf>, scratch_root: Option<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            scratch_root,
        }
    }

    fn step_args(
        step: EngineStep,
        params: &EngineParams,
        input: &Path,
        layout: &ScratchLayout,
        table: &Path,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![step.name().into()];
        match step {
            EngineStep::CreateDb => {
                args.push(input.into());
                args.push(layout.db.clone().into());
            }
            EngineStep::Cluster => {
                args.push(layout.db.clone().into());
                args.push(layout.clusters.clone().into());
                args.push(layout.tmp.clone().into());
                args.extend(params.cluster_args().into_iter().map(OsString::from));
            }
            EngineStep::CreateTsv => {
                args.push(layout.db.clone().into());
                args.push(layout.db.clone().into());
                args.push(layout.clusters.clone().into());
                args.push(table.into());
                if let Some(threads) = params.threads {
                    args.push("--threads".into());
                    args.push(threads.to_string().into());
                }
            }
        }
        args
    }

    fn run_step(&self, step: EngineStep, args: &[OsString]) -> Result<Duration, PipelineError> {
        log::debug!(
            "running {} {}",
            self.executable.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("mmseqs {}", step));
        spinner.enable_steady_tick(Duration::from_millis(120));

        let started = Instant::now();
        let output = Command::new(&self.executable).args(args).output();
        spinner.finish_and_clear();

        let output = output.map_err(|e| PipelineError::EngineStepFailure {
            step,
            cause: format!("could not execute '{}': {}", self.executable.display(), e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: Vec<&str> = stderr
                .lines()
                .filter(|l| !l.trim().is_empty())
                .collect();
            let tail = tail[tail.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");
            let cause = if tail.is_empty() {
                format!("{}", output.status)
            } else {
                format!("{}\n{}", output.status, tail)
            };
            return Err(PipelineError::EngineStepFailure { step, cause });
        }

        let elapsed = started.elapsed();
        log::debug!("step {} finished in {:.2?}", step, elapsed);
        Ok(elapsed)
    }

    fn create_scratch(&self) -> std::io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("clustnum-");
        match &self.scratch_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
    }

    fn create_table_path(&self) -> std::io::Result<tempfile::TempPath> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("clustnum-").suffix(".tsv");
        let file = match &self.scratch_root {
            Some(root) => builder.tempfile_in(root)?,
            None => builder.tempfile()?,
        };
        Ok(file.into_temp_path())
    }
}

/// Engine database paths inside the scratch directory
struct ScratchLayout {
    db: PathBuf,
    clusters: PathBuf,
    tmp: PathBuf,
}

impl ScratchLayout {
    fn under(root: &Path) -> Self {
        Self {
            db: root.join("seqdb"),
            clusters: root.join("clu"),
            tmp: root.join("tmp"),
        }
    }
}

impl ClusteringEngine for MmseqsEngine {
    fn name(&self) -> &'static str {
        "mmseqs"
    }

    fn description(&self) -> &'static str {
        "MMseqs2 createdb + cluster + createtsv"
    }

    fn run(
        &self,
        params: &EngineParams,
        input: &Path,
        on_step: &mut dyn FnMut(EngineStep),
    ) -> Result<AssignmentTable, PipelineError> {
        let scratch = self
            .create_scratch()
            .map_err(|e| PipelineError::EngineStepFailure {
                step: EngineStep::CreateDb,
                cause: format!("could not create scratch directory: {}", e),
            })?;
        let layout = ScratchLayout::under(scratch.path());
        std::fs::create_dir_all(&layout.tmp).map_err(|e| PipelineError::EngineStepFailure {
            step: EngineStep::CreateDb,
            cause: format!("could not create '{}': {}", layout.tmp.display(), e),
        })?;
        let table = self
            .create_table_path()
            .map_err(|e| PipelineError::EngineStepFailure {
                step: EngineStep::CreateTsv,
                cause: format!("could not reserve table file: {}", e),
            })?;
        log::debug!("scratch directory {}", scratch.path().display());

        for step in EngineStep::ALL {
            let args = Self::step_args(step, params, input, &layout, &table);
            self.run_step(step, &args)?;
            on_step(step);
        }

        // scratch drops here; the table survives
        Ok(AssignmentTable::temporary(table))
    }

    fn planned_commands(&self, params: &EngineParams, input: &Path) -> Vec<String> {
        let layout = ScratchLayout::under(Path::new("<scratch>"));
        let table = Path::new("<table.tsv>");
        EngineStep::ALL
            .iter()
            .map(|&step| {
                let args = Self::step_args(step, params, input, &layout, table);
                let mut line = self.executable.display().to_string();
                for arg in args {
                    line.push(' ');
                    line.push_str(&arg.to_string_lossy());
                }
                line
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ClusterMode, CoverageMode};

    #[cfg(unix)]
    #[test]
    fn test_planned_commands() {
        let engine = MmseqsEngine::new("mmseqs", None);
        let params = EngineParams {
            min_aln_len: 30,
            cluster_mode: ClusterMode::Connected,
            cov_mode: CoverageMode::Target,
            min_seq_id: 0.95,
            threads: None,
        };
        let commands = engine.planned_commands(&params, Path::new("in.faa"));

        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0], "mmseqs createdb in.faa <scratch>/seqdb");
        assert_eq!(
            commands[1],
            "mmseqs cluster <scratch>/seqdb <scratch>/clu <scratch>/tmp --min-aln-len 30 --cluster-mode 1 --cov-mode 1 --min-seq-id 0.95"
        );
        assert_eq!(
            commands[2],
            "mmseqs createtsv <scratch>/seqdb <scratch>/seqdb <scratch>/clu <table.tsv>"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_executable_fails_first_step() {
        let scratch = tempfile::tempdir().unwrap();
        let engine = MmseqsEngine::new(
            "/nonexistent/clustnum-mmseqs",
            Some(scratch.path().to_path_buf()),
        );
        let mut completed = Vec::new();
        let err = engine
            .run(&EngineParams::default(), Path::new("in.faa"), &mut |s| completed.push(s))
            .unwrap_err();

        assert!(completed.is_empty());
        match err {
            PipelineError::EngineStepFailure { step, .. } => assert_eq!(step, EngineStep::CreateDb),
            other => panic!("expected EngineStepFailure, got {:?}", other),
        }
        // scratch directory and reserved table are both gone
        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_step_failure() {
        // `false` ignores its arguments and exits 1
        let engine = MmseqsEngine::new("false", None);
        let err = engine
            .run(&EngineParams::default(), Path::new("in.faa"), &mut |_| {})
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::EngineStepFailure { step: EngineStep::CreateDb, .. }
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_steps_reported_in_order() {
        // `true` succeeds for every step but writes nothing into the table
        let scratch = tempfile::tempdir().unwrap();
        let engine = MmseqsEngine::new("true", Some(scratch.path().to_path_buf()));
        let mut completed = Vec::new();
        let table = engine
            .run(&EngineParams::default(), Path::new("in.faa"), &mut |s| completed.push(s))
            .unwrap();

        assert_eq!(completed, EngineStep::ALL.to_vec());
        assert!(table.is_temporary());
        assert!(table.path().exists());

        // only the table remains next to the removed scratch directory
        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 1);
        let path = table.path().to_path_buf();
        drop(table);
        assert!(!path.exists());
    }
}
