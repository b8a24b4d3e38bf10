//! Simulation configuration.
//!
//! Every field has a default: a 20-slot
//! queue, random tasks with priority `[0,10]` and duration `[0,50]`, and
//! a 1-in-101 arrival check per time unit. Configurations can be built
//! in code or read from TOML:
//!
//! ```toml
//! capacity = 32          # 0 = unbounded
//! overflow = "fail"
//! seed = 7
//!
//! [generator]
//! priority_max = 5
//!
//! [arrival]
//! kind = "bernoulli"
//! probability = 0.02
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::error::{SchedError, SchedResult};
use crate::generator::{ArrivalModel, GeneratorConfig};
use crate::queue::MAX_TASKS;
use crate::validation;

/// What to do when a random arrival meets a full queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Drop the arrival and keep running.
    #[default]
    Reject,
    /// Abort the run with `CapacityExceeded`.
    Fail,
}

/// Parameters of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Queue capacity. `None` = grow without bound (`0` in TOML).
    #[serde(deserialize_with = "capacity_or_unbounded")]
    pub capacity: Option<usize>,
    /// Handling of arrivals that do not fit.
    pub overflow: OverflowPolicy,
    /// Random task ranges.
    pub generator: GeneratorConfig,
    /// Per-unit arrival rule.
    pub arrival: ArrivalModel,
    /// RNG seed. `None` = pick one at startup.
    pub seed: Option<u64>,
    /// Abort once elapsed time reaches this many units. `None` = no limit.
    pub max_time_units: Option<u64>,
}

fn capacity_or_unbounded<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
    let value = Option::<usize>::deserialize(d)?;
    Ok(value.filter(|&c| c > 0))
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            capacity: Some(MAX_TASKS),
            overflow: OverflowPolicy::Reject,
            generator: GeneratorConfig::default(),
            arrival: ArrivalModel::default(),
            seed: None,
            max_time_units: None,
        }
    }
}

impl SimulationConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the queue capacity (`None` = unbounded).
    pub fn with_capacity(mut self, capacity: Option<usize>) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the overflow policy.
    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    /// Sets the random task ranges.
    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    /// Sets the arrival rule.
    pub fn with_arrival(mut self, arrival: ArrivalModel) -> Self {
        self.arrival = arrival;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the time budget.
    pub fn with_max_time_units(mut self, limit: u64) -> Self {
        self.max_time_units = Some(limit);
        self
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> SchedResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| SchedError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> SchedResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks the configuration, folding every problem into one error.
    pub fn validate(&self) -> SchedResult<()> {
        validation::validate_config(self).map_err(|errors| {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            SchedError::Config(messages.join("; "))
        })
    }
}
