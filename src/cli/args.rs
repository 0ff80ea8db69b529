// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs)]
/// clustnum - Deterministic numbered clusters from MMseqs2 clustering
pub struct Args {
    /// input sequence collection (FASTA)
    #[argh(option)]
    pub input: Option<String>,

    /// output file for numbered clusters
    #[argh(option)]
    pub output: Option<String>,

    /// existing representative/member table; skips the engine
    #[argh(option)]
    pub assignments: Option<String>,

    /// clustering engine: mmseqs, precomputed (default: mmseqs)
    #[argh(option, default = "String::from(\"mmseqs\")")]
    pub engine: String,

    /// path to the mmseqs executable (default: mmseqs)
    #[argh(option, default = "String::from(\"mmseqs\")")]
    pub mmseqs_bin: String,

    /// minimum alignment length in residues (default: 0)
    #[argh(option, default = "0")]
    pub min_aln_len: u32,

    /// cluster mode: set-cover, connected, greedy, greedy-memory or 0-3 (default: set-cover)
    #[argh(option, default = "String::from(\"set-cover\")")]
    pub cluster_mode: String,

    /// coverage mode: bidirectional, target, query, target-length, query-length, shorter or 0-5 (default: bidirectional)
    #[argh(option, default = "String::from(\"bidirectional\")")]
    pub cov_mode: String,

    /// minimum sequence identity (0.0-1.0, default: 0.9)
    #[argh(option, default = "0.9")]
    pub min_seq_id: f64,

    /// number of engine threads (default: engine decides)
    #[argh(option)]
    pub threads: Option<usize>,

    /// directory for engine scratch space (default: system temp dir)
    #[argh(option)]
    pub tmp_dir: Option<String>,

    /// output format: tsv, long, summary, json (default: tsv)
    #[argh(option, default = "String::from(\"tsv\")")]
    pub format: String,

    /// assignment table delimiter: tab, whitespace (default: tab)
    #[argh(option, default = "String::from(\"tab\")")]
    pub delimiter: String,

    /// omit clusters with fewer members from the output (default: 1)
    #[argh(option, default = "1")]
    pub min_size: usize,

    /// skip scanning the input FASTA for coverage warnings
    #[argh(switch)]
    pub no_census: bool,

    /// validate inputs and print planned engine commands without running them
    #[argh(switch)]
    pub dry_run: bool,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}
