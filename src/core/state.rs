// state.rs - Run state machine

use std::fmt::{self, Display};
use std::time::{Duration, Instant};

/// Where a run is. Each state has exactly one successor; any step may fail
/// into the terminal `Failed` state instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    IndexBuilt,
    Clustered,
    TableExported,
    Parsed,
    Aggregated,
    Written,
    Done,
    Failed { step: String, cause: String },
}

impl RunState {
    /// The step that moves this state to its successor
    pub fn pending_step(&self) -> Option<&'static str> {
        match self {
            RunState::NotStarted => Some("createdb"),
            RunState::IndexBuilt => Some("cluster"),
            RunState::Clustered => Some("createtsv"),
            RunState::TableExported => Some("parse"),
            RunState::Parsed => Some("aggregate"),
            RunState::Aggregated => Some("write"),
            RunState::Written => Some("finalize"),
            RunState::Done | RunState::Failed { .. } => None,
        }
    }

    pub fn successor(&self) -> Option<RunState> {
        match self {
            RunState::NotStarted => Some(RunState::IndexBuilt),
            RunState::IndexBuilt => Some(RunState::Clustered),
            RunState::Clustered => Some(RunState::TableExported),
            RunState::TableExported => Some(RunState::Parsed),
            RunState::Parsed => Some(RunState::Aggregated),
            RunState::Aggregated => Some(RunState::Written),
            RunState::Written => Some(RunState::Done),
            RunState::Done | RunState::Failed { .. } => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Failed { .. })
    }
}

impl Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::NotStarted => write!(f, "NotStarted"),
            RunState::IndexBuilt => write!(f, "IndexBuilt"),
            RunState::Clustered => write!(f, "Clustered"),
            RunState::TableExported => write!(f, "TableExported"),
            RunState::Parsed => write!(f, "Parsed"),
            RunState::Aggregated => write!(f, "Aggregated"),
            RunState::Written => write!(f, "Written"),
            RunState::Done => write!(f, "Done"),
            RunState::Failed { step, cause } => write!(f, "Failed({}, {})", step, cause),
        }
    }
}

/// Tracks one run's state and the time each step took
#[derive(Debug)]
pub struct RunTracker {
    state: RunState,
    history: Vec<(RunState, Duration)>,
    step_started: Instant,
}

impl RunTracker {
    pub fn new() -> Self {
        Self {
            state: RunState::NotStarted,
            history: Vec::new(),
            step_started: Instant::now(),
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// States reached so far with the duration of the step leading to each
    pub fn history(&self) -> &[(RunState, Duration)] {
        &self.history
    }

    /// Move to the successor state. Terminal states do not move.
    pub fn advance(&mut self) -> &RunState {
        if let Some(next) = self.state.successor() {
            let elapsed = self.step_started.elapsed();
            log::debug!("{} -> {} ({:.2?})", self.state, next, elapsed);
            self.history.push((next.clone(), elapsed));
            self.state = next;
            self.step_started = Instant::now();
        }
        &self.state
    }

    /// Move to `Failed`. The step defaults to whichever step was pending.
    pub fn fail(&mut self, step: Option<&str>, cause: impl Into<String>) {
        if self.state.is_terminal() {
            return;
        }
        let step = step
            .or_else(|| self.state.pending_step())
            .unwrap_or("unknown")
            .to_string();
        let failed = RunState::Failed {
            step,
            cause: cause.into(),
        };
        log::debug!("{} -> {}", self.state, failed);
        self.history.push((failed.clone(), self.step_started.elapsed()));
        self.state = failed;
    }
}

impl Default for RunTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_walk() {
        let mut tracker = RunTracker::new();
        let mut visited = vec![tracker.state().to_string()];
        while !tracker.state().is_terminal() {
            visited.push(tracker.advance().to_string());
        }
        assert_eq!(
            visited,
            vec![
                "NotStarted", "IndexBuilt", "Clustered", "TableExported", "Parsed", "Aggregated",
                "Written", "Done"
            ]
        );
        assert_eq!(tracker.history().len(), 7);

        // Done stays Done
        tracker.advance();
        assert_eq!(*tracker.state(), RunState::Done);
    }

    #[test]
    fn test_failure_names_pending_step() {
        let mut tracker = RunTracker::new();
        tracker.advance();
        tracker.fail(None, "exit status 1");
        assert_eq!(
            *tracker.state(),
            RunState::Failed {
                step: "cluster".to_string(),
                cause: "exit status 1".to_string()
            }
        );

        // Failed is terminal
        tracker.advance();
        tracker.fail(Some("write"), "late");
        assert!(matches!(tracker.state(), RunState::Failed { step, .. } if step == "cluster"));
    }

    #[test]
    fn test_explicit_step_name() {
        let mut tracker = RunTracker::new();
        tracker.fail(Some("createdb"), "not found");
        assert!(tracker.state().to_string().starts_with("Failed(createdb"));
    }
}
