//! Input validation for simulation runs.
//!
//! Checks configuration and the initial task batch before a run, and
//! reports every problem found rather than stopping at the first. Detects:
//! - Empty generator ranges (min > max)
//! - Generated names that cannot fit the name limit
//! - Arrival rules outside their valid domain
//! - Zero-capacity queues
//! - Initial batches larger than the queue

use crate::config::SimulationConfig;
use crate::generator::{ArrivalModel, ARRIVAL_SENTINEL};
use crate::models::{Task, MAX_NAME_LEN};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A generator range has min > max.
    EmptyRange,
    /// A Bernoulli probability is outside `[0, 1]` or not finite.
    InvalidProbability,
    /// A sentinel window extends past the draw range.
    ArrivalWindow,
    /// A bounded queue with capacity zero.
    ZeroCapacity,
    /// Generated names can exceed the name limit.
    NameTooLong,
    /// The initial batch does not fit the queue.
    TooManyTasks,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a simulation configuration.
///
/// Checks:
/// 1. Generator priority, duration, and name-index ranges are non-empty
/// 2. The longest generated name fits [`MAX_NAME_LEN`]
/// 3. Bernoulli probability is finite and in `[0, 1]`
/// 4. Sentinel window lies inside `[0, denominator]`
/// 5. Bounded capacity is positive
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_config(config: &SimulationConfig) -> ValidationResult {
    let mut errors = Vec::new();
    let g = &config.generator;

    if g.priority_min > g.priority_max {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyRange,
            format!("Priority range [{}, {}] is empty", g.priority_min, g.priority_max),
        ));
    }
    if g.duration_min > g.duration_max {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyRange,
            format!("Duration range [{}, {}] is empty", g.duration_min, g.duration_max),
        ));
    }
    if g.name_index_min > g.name_index_max {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyRange,
            format!(
                "Name index range [{}, {}] is empty",
                g.name_index_min, g.name_index_max
            ),
        ));
    }

    // Index digits grow with the value, so the max index gives the longest name
    let longest = g.name_prefix.chars().count() + g.name_index_max.to_string().len();
    if longest > MAX_NAME_LEN {
        errors.push(ValidationError::new(
            ValidationErrorKind::NameTooLong,
            format!(
                "Generated names reach {longest} characters ('{}{}'), limit is {MAX_NAME_LEN}",
                g.name_prefix, g.name_index_max
            ),
        ));
    }

    match config.arrival {
        ArrivalModel::Bernoulli { probability }
            if !probability.is_finite() || !(0.0..=1.0).contains(&probability) =>
        {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidProbability,
                format!("Arrival probability {probability} is outside [0, 1]"),
            ));
        }
        ArrivalModel::Sentinel {
            numerator,
            denominator,
        } if numerator > 0
            && u64::from(ARRIVAL_SENTINEL) + u64::from(numerator) > u64::from(denominator) + 1 =>
        {
            errors.push(ValidationError::new(
                ValidationErrorKind::ArrivalWindow,
                format!(
                    "Arrival window [{ARRIVAL_SENTINEL}, {}) does not fit draw range \
                     [0, {denominator}]",
                    u64::from(ARRIVAL_SENTINEL) + u64::from(numerator)
                ),
            ));
        }
        _ => {}
    }

    if config.capacity == Some(0) {
        errors.push(ValidationError::new(
            ValidationErrorKind::ZeroCapacity,
            "Queue capacity is zero",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a configuration together with the initial task batch.
///
/// Adds a `TooManyTasks` error when the batch cannot fit the queue.
pub fn validate_input(tasks: &[Task], config: &SimulationConfig) -> ValidationResult {
    let mut errors = validate_config(config).err().unwrap_or_default();

    if let Some(capacity) = config.capacity {
        if tasks.len() > capacity {
            errors.push(ValidationError::new(
                ValidationErrorKind::TooManyTasks,
                format!(
                    "{} initial tasks exceed queue capacity {capacity}",
                    tasks.len()
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
