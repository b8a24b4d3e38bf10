//! Task list loader.
//!
//! Reads one task per line in the form `<name> <priority> <duration>`,
//! whitespace delimited. Blank lines and lines starting with `#` are
//! skipped. Any other line that does not parse is rejected with its
//! 1-based line number.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{SchedError, SchedResult};
use crate::models::Task;
use crate::queue::TaskQueue;

/// Parses a single record. Returns `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str, line_no: usize) -> SchedResult<Option<Task>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = trimmed.split_whitespace().collect();
    let [name, priority, duration] = fields[..] else {
        return Err(SchedError::invalid_at(
            line_no,
            format!(
                "expected '<name> <priority> <duration>', got {} field(s)",
                fields.len()
            ),
        ));
    };

    let priority: i32 = priority
        .parse()
        .map_err(|_| SchedError::invalid_at(line_no, format!("bad priority '{priority}'")))?;
    let duration: i64 = duration
        .parse()
        .map_err(|_| SchedError::invalid_at(line_no, format!("bad duration '{duration}'")))?;

    Task::new(name, priority, duration)
        .map(Some)
        .map_err(|e| match e {
            SchedError::InvalidInput { reason, .. } => SchedError::invalid_at(line_no, reason),
            other => other,
        })
}

/// Reads all tasks from a buffered reader.
pub fn read_tasks<R: BufRead>(reader: R) -> SchedResult<Vec<Task>> {
    let mut tasks = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        if let Some(task) = parse_line(&line?, i + 1)? {
            tasks.push(task);
        }
    }
    Ok(tasks)
}

/// Reads all tasks from a file.
pub fn load_file(path: impl AsRef<Path>) -> SchedResult<Vec<Task>> {
    let path = path.as_ref();
    let tasks = read_tasks(BufReader::new(File::open(path)?))?;
    debug!(path = %path.display(), count = tasks.len(), "tasks loaded");
    Ok(tasks)
}

/// Reads tasks and inserts them into `queue`.
///
/// Returns the number of tasks inserted.
pub fn load_into<R: BufRead>(reader: R, queue: &mut TaskQueue) -> SchedResult<usize> {
    let tasks = read_tasks(reader)?;
    let count = tasks.len();
    for task in tasks {
        queue.insert(task)?;
    }
    Ok(count)
}
