// error.rs - Pipeline error taxonomy and exit codes

use std::path::PathBuf;
use thiserror::Error;

use crate::engine::EngineStep;

/// Coarse failure classes, each with its own process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Usage,
    Engine,
    Aggregation,
    Write,
}

impl FailureKind {
    pub fn exit_code(&self) -> i32 {
        match self {
            FailureKind::Usage => 1,
            FailureKind::Engine => 2,
            FailureKind::Aggregation => 3,
            FailureKind::Write => 4,
        }
    }
}

/// Every way a clustering run can fail. None of these are recovered locally.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("engine step '{step}' failed: {cause}")]
    EngineStepFailure { step: EngineStep, cause: String },

    #[error("malformed assignment record at line {line}: '{content}' (expected at least 2 fields)")]
    MalformedRecord { line: usize, content: String },

    #[error("assignment table '{}' contains no records", .path.display())]
    EmptyInput { path: PathBuf },

    #[error(
        "sequence '{member}' is a member of two clusters (representatives '{first_representative}' and '{second_representative}')"
    )]
    DuplicateMembership {
        member: String,
        first_representative: String,
        second_representative: String,
    },

    #[error("failed to read '{}': {cause}", .path.display())]
    Read { path: PathBuf, cause: String },

    #[error("failed to write '{}': {cause}", .path.display())]
    WriteFailure { path: PathBuf, cause: String },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl PipelineError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PipelineError::EngineStepFailure { .. } => FailureKind::Engine,
            PipelineError::MalformedRecord { .. }
            | PipelineError::EmptyInput { .. }
            | PipelineError::DuplicateMembership { .. }
            | PipelineError::Read { .. } => FailureKind::Aggregation,
            PipelineError::WriteFailure { .. } => FailureKind::Write,
            PipelineError::InvalidParameter(_) => FailureKind::Usage,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_kind() {
        let engine = PipelineError::EngineStepFailure {
            step: EngineStep::Cluster,
            cause: "exit status 1".to_string(),
        };
        let aggregation = PipelineError::DuplicateMembership {
            member: "A".to_string(),
            first_representative: "A".to_string(),
            second_representative: "B".to_string(),
        };
        let write = PipelineError::WriteFailure {
            path: PathBuf::from("out.tsv"),
            cause: "disk full".to_string(),
        };

        assert_eq!(engine.exit_code(), 2);
        assert_eq!(aggregation.exit_code(), 3);
        assert_eq!(write.exit_code(), 4);
        assert_eq!(PipelineError::InvalidParameter("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_messages_name_the_offender() {
        let err = PipelineError::DuplicateMembership {
            member: "seq7".to_string(),
            first_representative: "seq1".to_string(),
            second_representative: "seq2".to_string(),
        };
        assert!(err.to_string().contains("'seq7'"));

        let err = PipelineError::MalformedRecord {
            line: 12,
            content: "lonely".to_string(),
        };
        assert!(err.to_string().contains("line 12"));
        assert!(err.to_string().contains("lonely"));
    }
}
