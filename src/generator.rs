//! Random task generation and arrival checks.
//!
//! All randomness flows through an injected [`rand::Rng`] handle, so a
//! seeded generator reproduces the same arrivals and tasks.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SchedResult;
use crate::models::Task;

/// First value of the winning window in a sentinel arrival check.
pub const ARRIVAL_SENTINEL: u32 = 2;

/// Ranges used to draw random tasks. All bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Lowest generated priority.
    pub priority_min: i32,
    /// Highest generated priority.
    pub priority_max: i32,
    /// Shortest generated duration.
    pub duration_min: i64,
    /// Longest generated duration.
    pub duration_max: i64,
    /// Name prefix; the suffix is a random index.
    pub name_prefix: String,
    /// Lowest name index.
    pub name_index_min: u32,
    /// Highest name index.
    pub name_index_max: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            priority_min: 0,
            priority_max: 10,
            duration_min: 0,
            duration_max: 50,
            name_prefix: "W".to_string(),
            name_index_min: 1,
            name_index_max: 10,
        }
    }
}

impl GeneratorConfig {
    /// Sets the priority range.
    pub fn with_priority_range(mut self, min: i32, max: i32) -> Self {
        self.priority_min = min;
        self.priority_max = max;
        self
    }

    /// Sets the duration range.
    pub fn with_duration_range(mut self, min: i64, max: i64) -> Self {
        self.duration_min = min;
        self.duration_max = max;
        self
    }

    /// Sets the name prefix.
    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self
    }
}

/// Per-time-unit arrival rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArrivalModel {
    /// Draw an integer in `[0, denominator]`; arrival iff it lands in
    /// `[ARRIVAL_SENTINEL, ARRIVAL_SENTINEL + numerator)`.
    ///
    /// Probability `numerator / (denominator + 1)`. The default 1/100 gives
    /// about 0.99% per unit, not 2%.
    Sentinel {
        /// Width of the winning window.
        numerator: u32,
        /// Upper bound of the draw.
        denominator: u32,
    },
    /// Exact Bernoulli draw with the given probability.
    Bernoulli {
        /// Arrival probability in `[0, 1]`.
        probability: f64,
    },
    /// No arrivals.
    Never,
}

impl Default for ArrivalModel {
    fn default() -> Self {
        Self::Sentinel {
            numerator: 1,
            denominator: 100,
        }
    }
}

impl ArrivalModel {
    /// Nominal per-unit arrival probability.
    pub fn probability(&self) -> f64 {
        match *self {
            Self::Sentinel {
                numerator,
                denominator,
            } => f64::from(numerator) / (f64::from(denominator) + 1.0),
            Self::Bernoulli { probability } => probability,
            Self::Never => 0.0,
        }
    }
}

/// Produces random tasks and decides arrivals from a single RNG.
///
/// # Example
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use u_simsched::generator::{GeneratorConfig, RandomTaskGenerator};
///
/// let mut gen = RandomTaskGenerator::new(GeneratorConfig::default(), SmallRng::seed_from_u64(7));
/// let task = gen.next_task().unwrap();
/// assert!((0..=10).contains(&task.priority));
/// ```
#[derive(Debug, Clone)]
pub struct RandomTaskGenerator<R> {
    config: GeneratorConfig,
    rng: R,
}

impl<R: Rng> RandomTaskGenerator<R> {
    /// Creates a generator over the given RNG.
    pub fn new(config: GeneratorConfig, rng: R) -> Self {
        Self { config, rng }
    }

    /// Draws a random task.
    ///
    /// Draw order: priority, duration, name index.
    ///
    /// # Errors
    /// `InvalidInput` if the prefix plus index exceeds the name limit.
    pub fn next_task(&mut self) -> SchedResult<Task> {
        let c = &self.config;
        let priority = self.rng.random_range(c.priority_min..=c.priority_max);
        let duration = self.rng.random_range(c.duration_min..=c.duration_max);
        let index = self.rng.random_range(c.name_index_min..=c.name_index_max);
        Task::new(format!("{}{index}", c.name_prefix), priority, duration)
    }

    /// Sentinel arrival check: probability `numerator / (denominator + 1)`.
    ///
    /// Consumes exactly one draw.
    pub fn arrival_check(&mut self, numerator: u32, denominator: u32) -> bool {
        let draw = self.rng.random_range(0..=denominator);
        draw >= ARRIVAL_SENTINEL && draw - ARRIVAL_SENTINEL < numerator
    }

    /// Applies an [`ArrivalModel`] for one time unit.
    pub fn arrives(&mut self, model: &ArrivalModel) -> bool {
        match *model {
            ArrivalModel::Sentinel {
                numerator,
                denominator,
            } => self.arrival_check(numerator, denominator),
            ArrivalModel::Bernoulli { probability } => {
                self.rng.random_bool(probability.clamp(0.0, 1.0))
            }
            ArrivalModel::Never => false,
        }
    }
}
