// tsv.rs - Streaming reader for engine assignment tables

use crate::data::record::AssignmentRecord;
use crate::error::PipelineError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Field separator used in the assignment table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// Single tab character (MMseqs2 `createtsv` output)
    #[default]
    Tab,
    /// Any run of ASCII/Unicode whitespace
    Whitespace,
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tab" | "\\t" | "tsv" => Ok(Delimiter::Tab),
            "whitespace" | "ws" | "space" => Ok(Delimiter::Whitespace),
            _ => Err(format!("Invalid delimiter: {}. Use: tab, whitespace", s)),
        }
    }
}

impl Delimiter {
    pub fn name(&self) -> &'static str {
        match self {
            Delimiter::Tab => "tab",
            Delimiter::Whitespace => "whitespace",
        }
    }

    /// First two fields of a line; columns past the second are ignored.
    /// Fields are returned verbatim, no trimming or case folding.
    fn split_pair<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
        let (representative, member) = match self {
            Delimiter::Tab => {
                let mut fields = line.split('\t');
                (fields.next()?, fields.next()?)
            }
            Delimiter::Whitespace => {
                let mut fields = line.split_whitespace();
                (fields.next()?, fields.next()?)
            }
        };
        if representative.is_empty() || member.is_empty() {
            return None;
        }
        Some((representative, member))
    }
}

/// Lazy reader over an assignment table.
///
/// Yields one `AssignmentRecord` per non-blank line. The first error ends the
/// stream. A table that yields no records at all ends with `EmptyInput`,
/// since the engine emits a self-referential line even for a lone sequence.
pub struct AssignmentReader<R: BufRead> {
    reader: R,
    buf: Vec<u8>,
    source: PathBuf,
    delimiter: Delimiter,
    line_num: usize,
    records_read: usize,
    finished: bool,
}

impl AssignmentReader<BufReader<File>> {
    /// Open an assignment table file for streaming
    pub fn open(path: &Path, delimiter: Delimiter) -> Result<Self, PipelineError> {
        let file = File::open(path).map_err(|e| PipelineError::Read {
            path: path.to_path_buf(),
            cause: e.to_string(),
        })?;
        Ok(Self::from_reader(BufReader::new(file), path, delimiter))
    }
}

impl<R: BufRead> AssignmentReader<R> {
    pub fn from_reader(reader: R, source: impl Into<PathBuf>, delimiter: Delimiter) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            source: source.into(),
            delimiter,
            line_num: 0,
            records_read: 0,
            finished: false,
        }
    }

    /// Records yielded so far
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Physical lines consumed so far, blank ones included
    pub fn lines_read(&self) -> usize {
        self.line_num
    }

    /// Next physical line without its `\n` / `\r\n` terminator.
    /// `Ok(None)` at end of stream.
    fn next_line(&mut self) -> std::io::Result<Option<&[u8]>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        Ok(Some(&self.buf))
    }

    fn fail(&mut self, err: PipelineError) -> Option<Result<AssignmentRecord, PipelineError>> {
        self.finished = true;
        Some(Err(err))
    }
}

impl<R: BufRead> Iterator for AssignmentReader<R> {
    type Item = Result<AssignmentRecord, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let next = self.next_line().map(|bytes| {
                bytes.map(|bytes| {
                    std::str::from_utf8(bytes)
                        .map(str::to_owned)
                        .map_err(|_| String::from_utf8_lossy(bytes).into_owned())
                })
            });
            let line = match next {
                Ok(Some(line)) => line,
                Err(e) => {
                    let err = PipelineError::Read {
                        path: self.source.clone(),
                        cause: format!("line {}: {}", self.line_num + 1, e),
                    };
                    return self.fail(err);
                }
                Ok(None) => {
                    self.finished = true;
                    if self.records_read == 0 {
                        return Some(Err(PipelineError::EmptyInput {
                            path: self.source.clone(),
                        }));
                    }
                    return None;
                }
            };
            self.line_num += 1;

            // identifiers must be text; undecodable lines are reported lossily
            let line = match line {
                Ok(line) => line,
                Err(content) => {
                    let err = PipelineError::MalformedRecord {
                        line: self.line_num,
                        content,
                    };
                    return self.fail(err);
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            return match self.delimiter.split_pair(&line) {
                Some((representative, member)) => {
                    self.records_read += 1;
                    Some(Ok(AssignmentRecord::new(representative, member)))
                }
                None => {
                    let err = PipelineError::MalformedRecord {
                        line: self.line_num,
                        content: line,
                    };
                    self.fail(err)
                }
            };
        }
    }
}
