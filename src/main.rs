// main.rs - CLI entry point

use std::fmt;
use std::time::Instant;

use clustnum::cli::Config;
use clustnum::core::RunState;
use clustnum::prelude::*;

/// Anything that ends the process with a non-zero code
enum MainError {
    Usage(String),
    Pipeline(PipelineError),
}

impl From<String> for MainError {
    fn from(s: String) -> Self {
        MainError::Usage(s)
    }
}

impl From<PipelineError> for MainError {
    fn from(e: PipelineError) -> Self {
        MainError::Pipeline(e)
    }
}

impl MainError {
    fn exit_code(&self) -> i32 {
        match self {
            MainError::Usage(_) => 1,
            MainError::Pipeline(e) => e.exit_code(),
        }
    }
}

impl fmt::Display for MainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MainError::Usage(msg) => write!(f, "{}", msg),
            MainError::Pipeline(e) => write!(f, "{}", e),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run_main() -> Result<(), MainError> {
    let mut args: Args = argh::from_env();

    // Handle generate config first
    if args.generate_config {
        let sample_config = Config::generate_sample();
        println!("{}", sample_config);
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    // Load configuration file if specified
    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
    }

    let validation = validate_args(&args)?;

    println!("🚀 clustnum v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "🕒 Started: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let engine = EngineFactory::create(&validation.engine_name, &validation.engine_settings)?;
    let params = &validation.params;
    println!("⚙️  Engine: {}", engine.name());
    if engine.requires_input() {
        println!(
            "⚙️  Parameters: min-aln-len {}, cluster-mode {} ({}), cov-mode {} ({}), min-seq-id {}",
            params.min_aln_len,
            params.cluster_mode.code(),
            params.cluster_mode.description(),
            params.cov_mode.code(),
            params.cov_mode.description(),
            params.min_seq_id
        );
    }

    // Census of the input collection, engine mode only
    let census = match &validation.census_input {
        Some(input) => {
            let census = SequenceCensus::from_fasta(input)?;
            if census.is_empty() {
                return Err(MainError::Usage(format!(
                    "Input sequence file contains no records: {}",
                    input.display()
                )));
            }
            println!(
                "🧬 Input: {} sequences, {} residues",
                census.len(),
                census.total_residues
            );
            if census.duplicate_ids > 0 {
                println!("⚠️  {} duplicate sequence identifiers in input", census.duplicate_ids);
            }
            Some(census)
        }
        _ => None,
    };

    let input = validation.input.clone().unwrap_or_default();

    if args.dry_run {
        println!("📋 Planned steps:");
        for command in engine.planned_commands(params, &input) {
            println!("  {}", command);
        }
        println!("✅ Dry run completed successfully");
        return Ok(());
    }

    let config = PipelineConfig {
        input,
        output: validation.output.clone(),
        params: validation.params.clone(),
        delimiter: validation.delimiter,
        format: validation.format,
        min_size: validation.min_size,
        census,
    };

    let total_start = Instant::now();
    let mut pipeline = Pipeline::new(engine.as_ref(), &config);
    let result = pipeline.run();
    if let RunState::Failed { step, .. } = pipeline.state() {
        eprintln!("❌ Run failed at step '{}'", step);
    }
    let summary = result?;

    println!("\n📊 === SUMMARY ===");
    println!("  • Assignment records: {}", summary.records);
    println!("  • Clusters: {}", summary.clusters);
    println!("  • Sequences: {}", summary.total_sequences);
    println!("  • Singletons: {}", summary.singletons);
    if let Some((number, size)) = summary.largest {
        println!("  • Largest cluster: {} ({} members)", number, size);
    }
    if config.min_size > 1 {
        println!(
            "  • Written (size >= {}): {} clusters",
            config.min_size, summary.write.clusters_written
        );
    }
    println!("  • Output CRC32: {:08x}", summary.write.crc32);
    println!("⏱️  Total time: {:.2?}", total_start.elapsed());

    Ok(())
}
