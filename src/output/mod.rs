// mod.rs - Output formatters module

use std::fs::create_dir_all;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::core::{Cluster, ClusterCollection};
use crate::error::PipelineError;

/// Layout of the numbered cluster file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `<number>\t<member>\t<member>...`
    #[default]
    Tsv,
    /// `<number>\t<member>`, one member per line
    Long,
    /// Commented header, then `Cluster_<number>\t<size>\t<representative>\t<members>`
    Summary,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" => Ok(OutputFormat::Tsv),
            "long" => Ok(OutputFormat::Long),
            "summary" => Ok(OutputFormat::Summary),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unsupported output format: {}. Use: tsv, long, summary, json", s)),
        }
    }
}

impl OutputFormat {
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Tsv => "tsv",
            OutputFormat::Long => "long",
            OutputFormat::Summary => "summary",
            OutputFormat::Json => "json",
        }
    }
}

/// What ended up in the output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub path: PathBuf,
    pub clusters_written: usize,
    pub members_written: usize,
    pub bytes: u64,
    /// CRC32 of the exact bytes written
    pub crc32: u32,
}

/// Passes bytes through while keeping a running CRC32 and byte count
struct ChecksumWriter<W: Write> {
    inner: W,
    hasher: crc32fast::Hasher,
    bytes: u64,
}

impl<W: Write> ChecksumWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: crc32fast::Hasher::new(),
            bytes: 0,
        }
    }

    fn finish(self) -> (W, u32, u64) {
        (self.inner, self.hasher.finalize(), self.bytes)
    }
}

impl<W: Write> Write for ChecksumWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.bytes += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[derive(Serialize)]
struct JsonCluster<'a> {
    number: usize,
    representative: &'a str,
    size: usize,
    members: &'a [String],
}

#[derive(Serialize)]
struct JsonClusters<'a> {
    total_clusters: usize,
    total_sequences: usize,
    clusters: Vec<JsonCluster<'a>>,
}

/// Clusters that pass the size filter, still by ascending number
fn selected(clusters: &ClusterCollection, min_size: usize) -> Vec<&Cluster> {
    clusters.iter().filter(|c| c.size() >= min_size).collect()
}

/// Write `<number>\t<member>\t<member>...`
///
/// Members are tab-separated: a tab can never be part of an identifier in
/// either input mode, while a comma can.
pub fn write_tsv<W: Write>(writer: &mut W, clusters: &[&Cluster]) -> io::Result<()> {
    for cluster in clusters {
        writeln!(writer, "{}\t{}", cluster.number, cluster.members.join("\t"))?;
    }
    Ok(())
}

/// Write one `<number>\t<member>` line per member
pub fn write_long<W: Write>(writer: &mut W, clusters: &[&Cluster]) -> io::Result<()> {
    for cluster in clusters {
        for member in &cluster.members {
            writeln!(writer, "{}\t{}", cluster.number, member)?;
        }
    }
    Ok(())
}

/// Write the commented summary layout
pub fn write_summary<W: Write>(writer: &mut W, clusters: &[&Cluster]) -> io::Result<()> {
    let total_sequences: usize = clusters.iter().map(|c| c.size()).sum();

    writeln!(writer, "# MMseqs2 Clusters")?;
    writeln!(writer, "# Total clusters: {}", clusters.len())?;
    writeln!(writer, "# Total sequences: {}", total_sequences)?;
    writeln!(writer, "#")?;
    writeln!(
        writer,
        "# Format: Cluster_ID<TAB>Size<TAB>Representative<TAB>Members (comma-separated)"
    )?;
    writeln!(writer, "#")?;

    for cluster in clusters {
        writeln!(
            writer,
            "Cluster_{}\t{}\t{}\t{}",
            cluster.number,
            cluster.size(),
            cluster.representative,
            cluster.members.join(",")
        )?;
    }
    Ok(())
}

/// Write a JSON document
pub fn write_json<W: Write>(writer: &mut W, clusters: &[&Cluster]) -> io::Result<()> {
    let document = JsonClusters {
        total_clusters: clusters.len(),
        total_sequences: clusters.iter().map(|c| c.size()).sum(),
        clusters: clusters
            .iter()
            .map(|c| JsonCluster {
                number: c.number,
                representative: &c.representative,
                size: c.size(),
                members: &c.members,
            })
            .collect(),
    };
    serde_json::to_writer_pretty(&mut *writer, &document)?;
    writeln!(writer)?;
    Ok(())
}

/// Serialize clusters in the given format to any writer
pub fn render<W: Write>(
    writer: &mut W,
    format: OutputFormat,
    clusters: &ClusterCollection,
    min_size: usize,
) -> io::Result<()> {
    let chosen = selected(clusters, min_size);
    match format {
        OutputFormat::Tsv => write_tsv(writer, &chosen),
        OutputFormat::Long => write_long(writer, &chosen),
        OutputFormat::Summary => write_summary(writer, &chosen),
        OutputFormat::Json => write_json(writer, &chosen),
    }
}

/// Write clusters to `path`, all or nothing.
///
/// Output goes to a temporary file beside `path` and replaces it only after a
/// complete flush and sync. On any error the temporary file is removed and
/// `path` is left as it was.
pub fn write_clusters(
    path: &Path,
    format: OutputFormat,
    clusters: &ClusterCollection,
    min_size: usize,
) -> Result<WriteReport, PipelineError> {
    let (crc32, bytes) = write_atomically(path, |writer| {
        render(writer, format, clusters, min_size)
    })?;

    let chosen = selected(clusters, min_size);
    Ok(WriteReport {
        path: path.to_path_buf(),
        clusters_written: chosen.len(),
        members_written: chosen.iter().map(|c| c.size()).sum(),
        bytes,
        crc32,
    })
}

/// Run `fill` against a temporary file beside `path`, then move it into
/// place. Returns the CRC32 and length of what was persisted.
fn write_atomically<F>(path: &Path, fill: F) -> Result<(u32, u64), PipelineError>
where
    F: FnOnce(&mut ChecksumWriter<BufWriter<NamedTempFile>>) -> io::Result<()>,
{
    let fail = |cause: String| PipelineError::WriteFailure {
        path: path.to_path_buf(),
        cause,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    create_dir_all(&parent).map_err(|e| {
        fail(format!(
            "Failed to create parent directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    let tmp = NamedTempFile::new_in(&parent)
        .map_err(|e| fail(format!("Failed to create temporary output file: {}", e)))?;

    let mut writer = ChecksumWriter::new(BufWriter::new(tmp));
    fill(&mut writer)
        .map_err(|e| fail(format!("Write error: {}", e)))?;
    writer
        .flush()
        .map_err(|e| fail(format!("Flush error: {}", e)))?;

    let (buffered, crc32, bytes) = writer.finish();
    let tmp = buffered
        .into_inner()
        .map_err(|e| fail(format!("Flush error: {}", e.error())))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| fail(format!("Sync error: {}", e)))?;
    tmp.persist(path)
        .map_err(|e| fail(format!("Failed to replace output file: {}", e.error)))?;

    Ok((crc32, bytes))
}
