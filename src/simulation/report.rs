//! Simulation report (run trace).
//!
//! Records every dispatch and every random arrival in the order they
//! happened, plus the total elapsed time of the run.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Task;

/// One dispatch: a task leaving the queue to be serviced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRecord {
    /// Dispatch sequence number, starting at 1.
    pub seq: usize,
    /// Task name.
    pub name: String,
    /// Task priority.
    pub priority: i32,
    /// Original duration.
    pub duration: i64,
    /// Time the task entered the queue.
    pub released_at: u64,
    /// Elapsed time when service started.
    pub started_at: u64,
}

impl DispatchRecord {
    /// Records the dispatch of `task` at `started_at`.
    pub fn new(seq: usize, task: &Task, started_at: u64) -> Self {
        Self {
            seq,
            name: task.name.clone(),
            priority: task.priority,
            duration: task.duration,
            released_at: task.release_time,
            started_at,
        }
    }

    /// Elapsed time when service finished.
    pub fn finished_at(&self) -> u64 {
        self.started_at + self.duration.max(0) as u64
    }

    /// Time spent waiting in the queue.
    pub fn wait_time(&self) -> u64 {
        self.started_at.saturating_sub(self.released_at)
    }

    /// Time from queue entry to completion.
    pub fn flow_time(&self) -> u64 {
        self.finished_at().saturating_sub(self.released_at)
    }
}

impl fmt::Display for DispatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}  {}  {}  {}",
            self.seq, self.name, self.priority, self.duration, self.started_at
        )
    }
}

/// One random arrival during service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrivalRecord {
    /// Task name.
    pub name: String,
    /// Task priority.
    pub priority: i32,
    /// Task duration.
    pub duration: i64,
    /// Elapsed time of the arrival.
    pub at: u64,
    /// Whether the task made it into the queue.
    pub accepted: bool,
}

impl ArrivalRecord {
    /// Records the arrival of `task` at `at`, assumed accepted.
    pub fn new(task: &Task, at: u64) -> Self {
        Self {
            name: task.name.clone(),
            priority: task.priority,
            duration: task.duration,
            at,
            accepted: true,
        }
    }
}

impl fmt::Display for ArrivalRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.accepted { "Detected" } else { "Rejected" };
        write!(
            f,
            "{verb} random task! ({} with priority {} duration {})",
            self.name, self.priority, self.duration
        )
    }
}

/// A single observable event of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    /// A task was extracted and started.
    Dispatched(DispatchRecord),
    /// A random task arrived.
    Arrived(ArrivalRecord),
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dispatched(d) => fmt::Display::fmt(d, f),
            Self::Arrived(a) => fmt::Display::fmt(a, f),
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Events in chronological order.
    pub events: Vec<SimEvent>,
    /// Total elapsed time units.
    pub total_time: u64,
}

impl SimulationReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn record(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Dispatch records, in dispatch order.
    pub fn dispatches(&self) -> impl Iterator<Item = &DispatchRecord> {
        self.events.iter().filter_map(|e| match e {
            SimEvent::Dispatched(d) => Some(d),
            SimEvent::Arrived(_) => None,
        })
    }

    /// Arrival records, accepted or not.
    pub fn arrivals(&self) -> impl Iterator<Item = &ArrivalRecord> {
        self.events.iter().filter_map(|e| match e {
            SimEvent::Arrived(a) => Some(a),
            SimEvent::Dispatched(_) => None,
        })
    }

    /// Task names in dispatch order.
    pub fn dispatch_order(&self) -> Vec<&str> {
        self.dispatches().map(|d| d.name.as_str()).collect()
    }

    /// Number of dispatches.
    pub fn dispatch_count(&self) -> usize {
        self.dispatches().count()
    }

    /// Number of arrivals that were dropped on a full queue.
    pub fn rejected_count(&self) -> usize {
        self.arrivals().filter(|a| !a.accepted).count()
    }
}
