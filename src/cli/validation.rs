// validation.rs - Input validation utilities

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::cli::args::Args;
use crate::data::Delimiter;
use crate::engine::{ClusterMode, CoverageMode, EngineFactory, EngineParams, EngineSettings};
use crate::output::OutputFormat;

pub struct ValidationResult {
    pub engine_name: String,
    pub engine_settings: EngineSettings,
    pub params: EngineParams,
    pub input: Option<PathBuf>,
    /// FASTA to scan before clustering; only set when the engine reads `input`
    pub census_input: Option<PathBuf>,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub delimiter: Delimiter,
    pub min_size: usize,
}

/// Validate all command line arguments
pub fn validate_args(args: &Args) -> Result<ValidationResult, String> {
    // A table given on its own means the precomputed engine
    let engine_name = if args.assignments.is_some() && args.engine == "mmseqs" {
        "precomputed".to_string()
    } else {
        args.engine.clone()
    };
    if !EngineFactory::names().contains(&engine_name.as_str()) {
        return Err(format!(
            "Invalid engine '{}'. Available: {}",
            engine_name,
            EngineFactory::names().join(", ")
        ));
    }

    let output = args.output.as_ref().ok_or("--output is required")?;
    let output = PathBuf::from(output);
    if output.is_dir() {
        return Err(format!("Output path '{}' is a directory", output.display()));
    }

    // Input is only needed when the engine actually runs
    let input = match (&args.input, engine_name.as_str()) {
        (Some(path), _) => {
            let path = PathBuf::from(path);
            if !path.is_file() {
                return Err(format!("Input sequence file not found: {}", path.display()));
            }
            Some(path)
        }
        (None, "precomputed") => None,
        (None, _) => return Err("--input is required when running the clustering engine".to_string()),
    };

    let census_input = match engine_name.as_str() {
        "precomputed" => None,
        _ if args.no_census => None,
        _ => input.clone(),
    };

    if let Some(table) = &args.assignments {
        if !Path::new(table).is_file() {
            return Err(format!("Assignment table not found: {}", table));
        }
    } else if engine_name == "precomputed" {
        return Err("--engine precomputed requires --assignments".to_string());
    }

    if let Some(dir) = &args.tmp_dir {
        if !Path::new(dir).is_dir() {
            return Err(format!("Scratch directory does not exist: {}", dir));
        }
    }

    let params = EngineParams {
        min_aln_len: args.min_aln_len,
        cluster_mode: ClusterMode::from_str(&args.cluster_mode)?,
        cov_mode: CoverageMode::from_str(&args.cov_mode)?,
        min_seq_id: args.min_seq_id,
        threads: args.threads,
    };
    params.validate()?;

    let format = OutputFormat::from_str(&args.format)?;
    let delimiter = Delimiter::from_str(&args.delimiter)?;

    if args.min_size == 0 {
        return Err("Minimum cluster size must be at least 1".to_string());
    }

    let engine_settings = EngineSettings {
        executable: Some(PathBuf::from(&args.mmseqs_bin)),
        scratch_root: args.tmp_dir.as_ref().map(PathBuf::from),
        assignments: args.assignments.as_ref().map(PathBuf::from),
    };

    Ok(ValidationResult {
        engine_name,
        engine_settings,
        params,
        input,
        census_input,
        output,
        format,
        delimiter,
        min_size: args.min_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use argh::FromArgs;

    fn parse(args: &[&str]) -> Args {
        Args::from_args(&["clustnum"], args).unwrap()
    }

    #[test]
    fn test_assignments_select_precomputed_engine() {
        let table = tempfile::NamedTempFile::new().unwrap();
        let table_path = table.path().to_str().unwrap();
        let args = parse(&["--assignments", table_path, "--output", "out.tsv"]);

        let result = validate_args(&args).unwrap();
        assert_eq!(result.engine_name, "precomputed");
        assert!(result.input.is_none());
        assert_eq!(result.format, OutputFormat::Tsv);
        assert_eq!(result.delimiter, Delimiter::Tab);
    }

    #[test]
    fn test_census_only_in_engine_mode() {
        let input = tempfile::NamedTempFile::new().unwrap();
        let input_path = input.path().to_str().unwrap();
        let table = tempfile::NamedTempFile::new().unwrap();
        let table_path = table.path().to_str().unwrap();

        let args = parse(&["--input", input_path, "--output", "out.tsv"]);
        assert_eq!(validate_args(&args).unwrap().census_input.as_deref(), Some(input.path()));

        let args = parse(&["--input", input_path, "--output", "out.tsv", "--no-census"]);
        assert!(validate_args(&args).unwrap().census_input.is_none());

        let args = parse(&["--input", input_path, "--assignments", table_path, "--output", "out.tsv"]);
        let result = validate_args(&args).unwrap();
        assert_eq!(result.engine_name, "precomputed");
        assert!(result.input.is_some());
        assert!(result.census_input.is_none());
    }

    #[test]
    fn test_engine_mode_needs_input() {
        let args = parse(&["--output", "out.tsv"]);
        let err = validate_args(&args).err().unwrap();
        assert!(err.contains("--input"));
    }

    #[test]
    fn test_output_required() {
        let args = parse(&["--input", "seqs.faa"]);
        let err = validate_args(&args).err().unwrap();
        assert!(err.contains("--output"));
    }

    #[test]
    fn test_parameters_parsed() {
        let input = tempfile::NamedTempFile::new().unwrap();
        let args = parse(&[
            "--input",
            input.path().to_str().unwrap(),
            "--output",
            "out.tsv",
            "--cluster-mode",
            "2",
            "--cov-mode",
            "query",
            "--min-seq-id",
            "0.3",
            "--min-aln-len",
            "25",
            "--format",
            "summary",
        ]);

        let result = validate_args(&args).unwrap();
        assert_eq!(result.engine_name, "mmseqs");
        assert_eq!(result.params.cluster_mode, ClusterMode::Greedy);
        assert_eq!(result.params.cov_mode, CoverageMode::Query);
        assert_eq!(result.params.min_seq_id, 0.3);
        assert_eq!(result.params.min_aln_len, 25);
        assert_eq!(result.format, OutputFormat::Summary);
    }

    #[test]
    fn test_bad_values_rejected() {
        let input = tempfile::NamedTempFile::new().unwrap();
        let input = input.path().to_str().unwrap().to_string();
        let base = ["--input", input.as_str(), "--output", "out.tsv"];

        for extra in [
            vec!["--min-seq-id", "1.5"],
            vec!["--cluster-mode", "9"],
            vec!["--format", "xml"],
            vec!["--delimiter", "comma"],
            vec!["--min-size", "0"],
            vec!["--engine", "cd-hit"],
        ] {
            let mut argv: Vec<&str> = base.to_vec();
            argv.extend(extra.iter());
            assert!(validate_args(&parse(&argv)).is_err(), "accepted {:?}", extra);
        }
    }
}
