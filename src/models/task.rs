//! Task model.
//!
//! A task is a unit of work serviced by the single simulated server.
//! It keeps its original duration for reporting and a separate
//! remaining counter that the simulator drains one time unit at a time.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SchedError, SchedResult};

/// Maximum task name length in characters.
///
/// Generated names (`W1`..`W10`) need three characters.
pub const MAX_NAME_LEN: usize = 8;

/// A task to be dispatched.
///
/// # Time Representation
/// Durations are in abstract simulation time units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    /// Short identifier (non-empty, no whitespace, at most [`MAX_NAME_LEN`] chars).
    pub name: String,
    /// Scheduling priority (higher = more urgent).
    pub priority: i32,
    /// Duration as given at creation.
    pub duration: i64,
    /// Time at which the task entered the queue (0 for the initial batch).
    #[serde(default)]
    pub release_time: u64,
    /// Time units still to be serviced. Never negative.
    remaining: i64,
}

impl Task {
    /// Creates a new task.
    ///
    /// Any priority and duration are accepted; a non-positive duration
    /// yields a task that is already serviced.
    ///
    /// # Errors
    /// `InvalidInput` if the name is empty, contains whitespace, or is
    /// longer than [`MAX_NAME_LEN`]. Names are never truncated.
    pub fn new(name: impl Into<String>, priority: i32, duration: i64) -> SchedResult<Self> {
        let name = name.into();
        check_name(&name)?;
        Ok(Self {
            name,
            priority,
            duration,
            release_time: 0,
            remaining: duration.max(0),
        })
    }

    /// Sets the release (queue entry) time.
    pub fn with_release_time(mut self, release_time: u64) -> Self {
        self.release_time = release_time;
        self
    }

    /// Time units still to be serviced.
    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    /// Whether the task has been fully serviced.
    pub fn is_serviced(&self) -> bool {
        self.remaining == 0
    }

    /// Services one time unit. Saturates at zero.
    pub fn tick(&mut self) {
        self.remaining = (self.remaining - 1).max(0);
    }
}

/// Serialized form of [`Task`], checked on the way in.
#[derive(Deserialize)]
struct TaskRecord {
    name: String,
    priority: i32,
    duration: i64,
    #[serde(default)]
    release_time: u64,
    remaining: Option<i64>,
}

impl TryFrom<TaskRecord> for Task {
    type Error = SchedError;

    fn try_from(record: TaskRecord) -> SchedResult<Self> {
        let mut task = Task::new(record.name, record.priority, record.duration)?
            .with_release_time(record.release_time);
        if let Some(remaining) = record.remaining {
            if !(0..=task.remaining).contains(&remaining) {
                return Err(SchedError::invalid(format!(
                    "task '{}' remaining {remaining} outside [0, {}]",
                    task.name, task.remaining
                )));
            }
            task.remaining = remaining;
        }
        Ok(task)
    }
}

fn check_name(name: &str) -> SchedResult<()> {
    if name.is_empty() {
        return Err(SchedError::invalid("task name is empty"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(SchedError::invalid(format!(
            "task name '{name}' contains whitespace"
        )));
    }
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(SchedError::invalid(format!(
            "task name '{name}' is {len} characters, limit is {MAX_NAME_LEN}"
        )));
    }
    Ok(())
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {}  {}", self.name, self.priority, self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_new() {
        let task = Task::new("A", 5, 3).unwrap();
        assert_eq!(task.name, "A");
        assert_eq!(task.priority, 5);
        assert_eq!(task.duration, 3);
        assert_eq!(task.remaining(), 3);
        assert_eq!(task.release_time, 0);
        assert!(!task.is_serviced());

        let late = task.with_release_time(40);
        assert_eq!(late.release_time, 40);
    }

    #[test]
    fn test_name_limits() {
        assert!(Task::new("ABCDEFGH", 0, 1).is_ok());
        assert!(matches!(
            Task::new("ABCDEFGHI", 0, 1),
            Err(SchedError::InvalidInput { .. })
        ));
        assert!(Task::new("", 0, 1).is_err());
        assert!(Task::new("A B", 0, 1).is_err());
    }

    #[test]
    fn test_negative_values() {
        // Negative priority is legal; negative duration means nothing to service
        let task = Task::new("N", -4, -2).unwrap();
        assert_eq!(task.priority, -4);
        assert_eq!(task.duration, -2);
        assert_eq!(task.remaining(), 0);
        assert!(task.is_serviced());
    }

    #[test]
    fn test_tick_saturates() {
        let mut task = Task::new("T", 1, 2).unwrap();
        task.tick();
        assert_eq!(task.remaining(), 1);
        task.tick();
        task.tick();
        assert_eq!(task.remaining(), 0);
        assert!(task.is_serviced());
        // Original duration is kept for reporting
        assert_eq!(task.duration, 2);
    }

    #[test]
    fn test_display() {
        let task = Task::new("W3", 7, 12).unwrap();
        assert_eq!(task.to_string(), "W3  7  12");
    }

    #[test]
    fn test_serde_roundtrip() {
        let task = Task::new("B", 9, 2).unwrap();
        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);

        let mut partly = Task::new("A", 5, 3).unwrap();
        partly.tick();
        let json = serde_json::to_string(&partly).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back.remaining(), 2);
    }

    #[test]
    fn test_deserialize_checks_fields() {
        let ok: Task = serde_json::from_str(r#"{"name":"W1","priority":3,"duration":4}"#).unwrap();
        assert_eq!(ok.remaining(), 4);
        assert_eq!(ok.release_time, 0);

        let long = r#"{"name":"ABCDEFGHI","priority":0,"duration":1}"#;
        assert!(serde_json::from_str::<Task>(long).is_err());
        let blank = r#"{"name":"","priority":0,"duration":1}"#;
        assert!(serde_json::from_str::<Task>(blank).is_err());
        let negative = r#"{"name":"A","priority":0,"duration":3,"remaining":-1}"#;
        assert!(serde_json::from_str::<Task>(negative).is_err());
        let too_much = r#"{"name":"A","priority":0,"duration":3,"remaining":4}"#;
        assert!(serde_json::from_str::<Task>(too_much).is_err());
    }
}
