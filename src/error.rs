//! Crate-wide error type.

use thiserror::Error;

use crate::models::Task;

/// Result alias used throughout the crate.
pub type SchedResult<T> = Result<T, SchedError>;

/// Errors raised by the queue, loader, configuration, and simulator.
#[derive(Debug, Error)]
pub enum SchedError {
    /// Insertion into a queue that is already at capacity.
    ///
    /// Carries the rejected task back to the caller so it can be
    /// dropped, retried, or reported.
    #[error("task queue is full (capacity {capacity}), cannot insert '{}'", .task.name)]
    CapacityExceeded {
        /// Capacity of the queue that refused the task.
        capacity: usize,
        /// The task that was not inserted.
        task: Box<Task>,
    },

    /// Extraction from an empty queue.
    #[error("task queue is empty")]
    EmptyQueue,

    /// Bad task data (name too long, malformed input record).
    #[error("invalid input{}: {reason}", line_suffix(.line))]
    InvalidInput {
        /// 1-based input line, when the error came from the loader.
        line: Option<usize>,
        /// What was wrong.
        reason: String,
    },

    /// Configuration could not be parsed or failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O failure while reading input or configuration.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Internal invariant broken (e.g. non-empty queue failed to extract).
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// The run exceeded its configured time budget.
    #[error("simulation exceeded {limit} time units")]
    TimeLimit {
        /// The configured limit.
        limit: u64,
    },
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(" at line {l}")).unwrap_or_default()
}

impl SchedError {
    /// Builds an `InvalidInput` error without a line number.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            line: None,
            reason: reason.into(),
        }
    }

    /// Builds an `InvalidInput` error tied to an input line.
    pub fn invalid_at(line: usize, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            line: Some(line),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        assert_eq!(
            SchedError::invalid("name too long").to_string(),
            "invalid input: name too long"
        );
        assert_eq!(
            SchedError::invalid_at(3, "missing duration").to_string(),
            "invalid input at line 3: missing duration"
        );
    }

    #[test]
    fn test_capacity_message_names_task() {
        let err = SchedError::CapacityExceeded {
            capacity: 2,
            task: Box::new(Task::new("W7", 1, 1).unwrap()),
        };
        assert_eq!(
            err.to_string(),
            "task queue is full (capacity 2), cannot insert 'W7'"
        );
    }
}
