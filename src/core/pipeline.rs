// pipeline.rs - Engine steps followed by read, aggregate and write

use std::path::PathBuf;

use crate::core::aggregate::ClusterAggregator;
use crate::core::state::{RunState, RunTracker};
use crate::data::fasta::{CensusReport, SequenceCensus};
use crate::data::loaders::{AssignmentReader, Delimiter};
use crate::engine::{ClusteringEngine, EngineParams, EngineStep};
use crate::error::PipelineError;
use crate::output::{write_clusters, OutputFormat, WriteReport};

/// Inputs of one run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Sequence collection handed to the engine
    pub input: PathBuf,
    pub output: PathBuf,
    pub params: EngineParams,
    pub delimiter: Delimiter,
    pub format: OutputFormat,
    pub min_size: usize,
    /// Identifiers of the input, when scanned beforehand
    pub census: Option<SequenceCensus>,
}

impl PipelineConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            params: EngineParams::default(),
            delimiter: Delimiter::Tab,
            format: OutputFormat::Tsv,
            min_size: 1,
            census: None,
        }
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub engine: &'static str,
    pub records: usize,
    pub repeated_pairs: usize,
    pub clusters: usize,
    pub total_sequences: usize,
    pub singletons: usize,
    /// (number, size) of the largest cluster
    pub largest: Option<(usize, usize)>,
    pub census: Option<CensusReport>,
    pub write: WriteReport,
}

/// Runs one clustering job from `NotStarted` to `Done` or `Failed`.
///
/// A run is single use; after it ends, build a new `Pipeline` to retry.
pub struct Pipeline<'a> {
    engine: &'a dyn ClusteringEngine,
    config: &'a PipelineConfig,
    tracker: RunTracker,
}

impl<'a> Pipeline<'a> {
    pub fn new(engine: &'a dyn ClusteringEngine, config: &'a PipelineConfig) -> Self {
        Self {
            engine,
            config,
            tracker: RunTracker::new(),
        }
    }

    pub fn state(&self) -> &RunState {
        self.tracker.state()
    }

    pub fn tracker(&self) -> &RunTracker {
        &self.tracker
    }

    /// Execute every step. The first failure aborts the run.
    pub fn run(&mut self) -> Result<RunSummary, PipelineError> {
        if *self.tracker.state() != RunState::NotStarted {
            return Err(PipelineError::InvalidParameter(format!(
                "run already finished in state {}",
                self.tracker.state()
            )));
        }

        match self.execute() {
            Ok(summary) => Ok(summary),
            Err(e) => {
                let step = match &e {
                    PipelineError::EngineStepFailure { step, .. } => Some(step.name()),
                    _ => None,
                };
                self.tracker.fail(step, e.to_string());
                Err(e)
            }
        }
    }

    fn execute(&mut self) -> Result<RunSummary, PipelineError> {
        let engine = self.engine;
        let config = self.config;

        println!("🧬 Clustering with {} ({})", engine.name(), engine.description());
        let tracker = &mut self.tracker;
        let mut out_of_order: Option<EngineStep> = None;
        let table = engine.run(&config.params, &config.input, &mut |step: EngineStep| {
            if out_of_order.is_some() {
                return;
            }
            if tracker.state().pending_step() != Some(step.name()) {
                out_of_order = Some(step);
                return;
            }
            tracker.advance();
            println!("  ✅ {} done", step);
        })?;

        if let Some(step) = out_of_order {
            return Err(PipelineError::EngineStepFailure {
                step,
                cause: format!(
                    "engine reported step out of order (state {})",
                    self.tracker.state()
                ),
            });
        }

        if *self.tracker.state() != RunState::TableExported {
            return Err(PipelineError::EngineStepFailure {
                step: EngineStep::CreateTsv,
                cause: format!(
                    "engine returned without completing all steps (state {})",
                    self.tracker.state()
                ),
            });
        }

        println!("📄 Reading assignment table: {}", table.path().display());
        let mut reader = AssignmentReader::open(table.path(), config.delimiter)?;
        let mut aggregator = ClusterAggregator::new();
        for record in reader.by_ref() {
            aggregator.push(record?);
        }
        let records = reader.records_read();
        // scratch tables are removed here
        drop(table);
        self.tracker.advance();

        let repeated_pairs = aggregator.repeated_pairs();
        if repeated_pairs > 0 {
            println!("⚠️  {} repeated assignment pairs ignored", repeated_pairs);
        }
        let clusters = aggregator.finish()?;
        self.tracker.advance();
        println!(
            "✅ {} records grouped into {} clusters",
            records,
            clusters.len()
        );

        let census = config.census.as_ref().map(|census| {
            let report = census.compare(&clusters);
            if !report.unclustered.is_empty() {
                println!(
                    "⚠️  {} input sequences are not in any cluster (first: {})",
                    report.unclustered.len(),
                    report.unclustered[0]
                );
            }
            if !report.unknown.is_empty() {
                println!(
                    "⚠️  {} clustered identifiers are not in the input (first: {})",
                    report.unknown.len(),
                    report.unknown[0]
                );
            }
            report
        });

        let write = write_clusters(&config.output, config.format, &clusters, config.min_size)?;
        self.tracker.advance();
        println!(
            "✅ Clusters written to: {} ({} format, {} clusters)",
            write.path.display(),
            config.format.name(),
            write.clusters_written
        );

        self.tracker.advance();
        Ok(RunSummary {
            engine: engine.name(),
            records,
            repeated_pairs,
            clusters: clusters.len(),
            total_sequences: clusters.total_members(),
            singletons: clusters.singleton_count(),
            largest: clusters.largest().map(|c| (c.number, c.size())),
            census,
            write,
        })
    }
}
