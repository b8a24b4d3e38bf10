//! Discrete-event dispatch loop.
//!
//! # Algorithm
//!
//! 1. Extract the highest-priority task from the queue.
//! 2. Service it one time unit at a time until its remaining duration is 0.
//! 3. Before each unit elapses, roll for a random arrival; arrivals are
//!    generated and inserted immediately, so they compete at the next dispatch.
//! 4. Repeat until the queue is empty.
//!
//! There is no preemption: a dispatched task always runs to completion.
//! The run ends when the queue empties. Arrival rates that add work faster
//! than it is serviced keep it going indefinitely; `max_time_units` bounds that.

use rand::Rng;
use tracing::{debug, error, info, trace, warn};

use super::{ArrivalRecord, DispatchRecord, SimEvent, SimulationReport};
use crate::config::{OverflowPolicy, SimulationConfig};
use crate::error::{SchedError, SchedResult};
use crate::generator::{ArrivalModel, RandomTaskGenerator};
use crate::queue::TaskQueue;

/// Lifecycle of a simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    /// Not started, or finished without dispatching anything.
    Idle,
    /// A task has been extracted and is being serviced.
    Dispatching,
    /// Queue emptied after at least one dispatch. Terminal.
    Draining,
}

/// Single-server, non-preemptive priority simulator.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use u_simsched::config::SimulationConfig;
/// use u_simsched::generator::ArrivalModel;
/// use u_simsched::models::Task;
/// use u_simsched::queue::TaskQueue;
/// use u_simsched::simulation::Simulator;
///
/// let mut queue = TaskQueue::new();
/// queue.insert(Task::new("A", 5, 3).unwrap()).unwrap();
/// queue.insert(Task::new("B", 9, 2).unwrap()).unwrap();
///
/// let config = SimulationConfig::new().with_arrival(ArrivalModel::Never);
/// let mut sim = Simulator::new(&config, SmallRng::seed_from_u64(0)).unwrap();
/// let report = sim.run(&mut queue).unwrap();
/// assert_eq!(report.dispatch_order(), vec!["B", "A"]);
/// assert_eq!(report.total_time, 5);
/// ```
#[derive(Debug)]
pub struct Simulator<R> {
    generator: RandomTaskGenerator<R>,
    arrival: ArrivalModel,
    overflow: OverflowPolicy,
    max_time_units: Option<u64>,
    state: SimState,
    report: SimulationReport,
}

impl<R: Rng> Simulator<R> {
    /// Creates a simulator drawing all randomness from `rng`.
    ///
    /// # Errors
    /// `Config` if the configuration fails [`SimulationConfig::validate`].
    pub fn new(config: &SimulationConfig, rng: R) -> SchedResult<Self> {
        config.validate()?;
        Ok(Self {
            generator: RandomTaskGenerator::new(config.generator.clone(), rng),
            arrival: config.arrival.clone(),
            overflow: config.overflow,
            max_time_units: config.max_time_units,
            state: SimState::Idle,
            report: SimulationReport::new(),
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SimState {
        self.state
    }

    /// Events of the latest run so far.
    ///
    /// Holds the partial trace when a run aborts with an error.
    pub fn report(&self) -> &SimulationReport {
        &self.report
    }

    /// Drains the queue, servicing tasks and injecting random arrivals.
    ///
    /// # Errors
    /// - `CapacityExceeded` when an arrival meets a full queue under
    ///   [`OverflowPolicy::Fail`].
    /// - `TimeLimit` when `max_time_units` is reached.
    /// - `Invariant` if a non-empty queue fails to extract.
    #[tracing::instrument(skip_all, fields(initial_tasks = queue.size()))]
    pub fn run(&mut self, queue: &mut TaskQueue) -> SchedResult<SimulationReport> {
        self.state = SimState::Idle;
        self.report = SimulationReport::new();
        let mut elapsed: u64 = 0;
        let mut seq = 0usize;

        info!(
            arrival_probability = self.arrival.probability(),
            "simulation started"
        );

        while !queue.is_empty() {
            let mut task = queue.extract_max().map_err(|e| {
                error!(size = queue.size(), error = %e, "non-empty queue failed to extract");
                SchedError::Invariant(format!("extract from non-empty queue failed: {e}"))
            })?;
            self.state = SimState::Dispatching;
            seq += 1;

            debug!(
                seq,
                name = %task.name,
                priority = task.priority,
                duration = task.duration,
                elapsed,
                "dispatch"
            );
            self.report.record(SimEvent::Dispatched(DispatchRecord::new(seq, &task, elapsed)));

            while !task.is_serviced() {
                if let Some(limit) = self.max_time_units {
                    if elapsed >= limit {
                        warn!(limit, pending = queue.size(), "time limit reached");
                        self.report.total_time = elapsed;
                        return Err(SchedError::TimeLimit { limit });
                    }
                }
                if self.generator.arrives(&self.arrival) {
                    if let Err(e) = self.admit(queue, elapsed) {
                        self.report.total_time = elapsed;
                        return Err(e);
                    }
                }
                elapsed += 1;
                task.tick();
            }

            trace!(name = %task.name, elapsed, "task completed");
        }

        if seq > 0 {
            self.state = SimState::Draining;
        }
        self.report.total_time = elapsed;

        info!(
            total_time = elapsed,
            dispatches = seq,
            arrivals = self.report.arrivals().count(),
            rejected = self.report.rejected_count(),
            "task pool is now empty"
        );
        Ok(self.report.clone())
    }

    /// Generates one arrival and offers it to the queue.
    fn admit(&mut self, queue: &mut TaskQueue, elapsed: u64) -> SchedResult<()> {
        let task = self.generator.next_task()?.with_release_time(elapsed);
        let mut record = ArrivalRecord::new(&task, elapsed);

        match queue.insert(task) {
            Ok(()) => {
                debug!(
                    name = %record.name,
                    priority = record.priority,
                    duration = record.duration,
                    elapsed,
                    "random arrival"
                );
            }
            Err(SchedError::CapacityExceeded { capacity, task })
                if self.overflow == OverflowPolicy::Reject =>
            {
                warn!(name = %task.name, capacity, elapsed, "queue full, arrival rejected");
                record.accepted = false;
            }
            Err(e) => return Err(e),
        }

        self.report.record(SimEvent::Arrived(record));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorConfig;
    use crate::models::Task;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn quiet_config() -> SimulationConfig {
        SimulationConfig::new().with_arrival(ArrivalModel::Never)
    }

    fn abc_queue() -> TaskQueue {
        TaskQueue::from_tasks(
            [("A", 5, 3), ("B", 9, 2), ("C", 1, 1)]
                .into_iter()
                .map(|(n, p, d)| Task::new(n, p, d).unwrap()),
            None,
        )
        .unwrap()
    }

    fn simulate(
        config: &SimulationConfig,
        seed: u64,
        queue: &mut TaskQueue,
    ) -> SchedResult<SimulationReport> {
        Simulator::new(config, SmallRng::seed_from_u64(seed))?.run(queue)
    }

    #[test]
    fn test_scenario_without_arrivals() {
        let mut queue = abc_queue();
        let mut sim = Simulator::new(&quiet_config(), SmallRng::seed_from_u64(1)).unwrap();
        assert_eq!(sim.state(), SimState::Idle);

        let report = sim.run(&mut queue).unwrap();
        assert_eq!(report.dispatch_order(), vec!["B", "A", "C"]);
        assert_eq!(report.total_time, 6);
        assert_eq!(sim.state(), SimState::Draining);
        assert!(queue.is_empty());
        assert_eq!(sim.report(), &report);

        let starts: Vec<u64> = report.dispatches().map(|d| d.started_at).collect();
        assert_eq!(starts, vec![0, 2, 5]);
        let seqs: Vec<usize> = report.dispatches().map(|d| d.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let empty_range = SimulationConfig::new()
            .with_arrival(ArrivalModel::Bernoulli { probability: 1.0 })
            .with_generator(GeneratorConfig::default().with_priority_range(5, 1));
        let result = Simulator::new(&empty_range, SmallRng::seed_from_u64(0));
        assert!(matches!(result, Err(SchedError::Config(_))));

        let nan = SimulationConfig::new().with_arrival(ArrivalModel::Bernoulli {
            probability: f64::NAN,
        });
        let result = Simulator::new(&nan, SmallRng::seed_from_u64(0));
        assert!(matches!(result, Err(SchedError::Config(_))));
    }

    #[test]
    fn test_zero_probability_sentinel() {
        let config = SimulationConfig::new().with_arrival(ArrivalModel::Sentinel {
            numerator: 0,
            denominator: 100,
        });
        let report = simulate(&config, 5, &mut abc_queue()).unwrap();
        assert_eq!(report.total_time, 6);
        assert_eq!(report.arrivals().count(), 0);
    }

    #[test]
    fn test_default_sentinel_arrivals() {
        // Default rule fires about once per 101 units
        let config = SimulationConfig::default();
        let run = |seed| {
            let mut queue = TaskQueue::new();
            queue.insert(Task::new("LONG", 5, 2000).unwrap()).unwrap();
            simulate(&config, seed, &mut queue).unwrap()
        };

        let report = run(3);
        let arrivals = report.arrivals().count();
        assert!((5..=80).contains(&arrivals), "arrivals = {arrivals}");
        assert_eq!(report.dispatch_order()[0], "LONG");
        assert_eq!(report.dispatch_count(), 1 + arrivals - report.rejected_count());

        let serviced: i64 = report.dispatches().map(|d| d.duration.max(0)).sum();
        assert_eq!(report.total_time, serviced as u64);
        assert!(report.total_time >= 2000);
        assert_eq!(run(3), report);
    }

    #[test]
    fn test_empty_queue_stays_idle() {
        let mut queue = TaskQueue::new();
        let mut sim =
            Simulator::new(&SimulationConfig::default(), SmallRng::seed_from_u64(0)).unwrap();
        let report = sim.run(&mut queue).unwrap();
        assert_eq!(report.total_time, 0);
        assert!(report.events.is_empty());
        assert_eq!(sim.state(), SimState::Idle);
    }

    #[test]
    fn test_zero_duration_tasks_take_no_time() {
        let mut queue = TaskQueue::from_tasks(
            [Task::new("Z", 3, 0).unwrap(), Task::new("N", 2, -5).unwrap()],
            None,
        )
        .unwrap();
        // Arrivals are never rolled without a time unit to service
        let config =
            SimulationConfig::new().with_arrival(ArrivalModel::Bernoulli { probability: 1.0 });
        let report = simulate(&config, 0, &mut queue).unwrap();
        assert_eq!(report.dispatch_order(), vec!["Z", "N"]);
        assert_eq!(report.total_time, 0);
        assert_eq!(report.arrivals().count(), 0);
    }

    #[test]
    fn test_total_time_covers_initial_work() {
        for seed in 0..20 {
            let config = SimulationConfig::new()
                .with_capacity(None)
                .with_arrival(ArrivalModel::Bernoulli { probability: 0.2 })
                .with_generator(GeneratorConfig::default().with_duration_range(0, 3));
            let report = simulate(&config, seed, &mut abc_queue()).unwrap();

            assert!(report.total_time >= 6);
            let serviced: i64 = report.dispatches().map(|d| d.duration.max(0)).sum();
            assert_eq!(report.total_time, serviced as u64);
            // Every accepted arrival is eventually dispatched
            let accepted = report.arrivals().filter(|a| a.accepted).count();
            assert_eq!(report.dispatch_count(), 3 + accepted);
        }
    }

    #[test]
    fn test_arrivals_are_released_when_they_arrive() {
        let config = SimulationConfig::new()
            .with_capacity(None)
            .with_arrival(ArrivalModel::Bernoulli { probability: 0.3 })
            .with_generator(GeneratorConfig::default().with_duration_range(1, 3));
        let report = simulate(&config, 77, &mut abc_queue()).unwrap();

        for d in report.dispatches() {
            assert!(d.started_at >= d.released_at);
        }
        for a in report.arrivals() {
            assert!(a.at < report.total_time);
        }
    }

    #[test]
    fn test_high_priority_arrival_runs_next() {
        // Every unit brings a priority-10 task of length 1 until the queue fills
        let config = SimulationConfig::new()
            .with_capacity(Some(4))
            .with_arrival(ArrivalModel::Bernoulli { probability: 1.0 })
            .with_generator(
                GeneratorConfig::default()
                    .with_priority_range(10, 10)
                    .with_duration_range(0, 0),
            );
        let mut queue = TaskQueue::with_capacity(4);
        queue.insert(Task::new("LOW", 0, 2).unwrap()).unwrap();
        let report = simulate(&config, 3, &mut queue).unwrap();

        let order = report.dispatch_order();
        assert_eq!(order[0], "LOW");
        assert!(order[1..].iter().all(|n| n.starts_with('W')));
        assert_eq!(report.total_time, 2);
        assert_eq!(report.arrivals().count(), 2);
    }

    #[test]
    fn test_overflow_reject() {
        let config = SimulationConfig::new()
            .with_capacity(Some(1))
            .with_arrival(ArrivalModel::Bernoulli { probability: 1.0 })
            .with_generator(GeneratorConfig::default().with_duration_range(0, 0));
        let mut queue = TaskQueue::with_capacity(1);
        queue.insert(Task::new("A", 1, 3).unwrap()).unwrap();

        let report = simulate(&config, 0, &mut queue).unwrap();
        // Slot frees on dispatch: first arrival fits, next two bounce
        assert_eq!(report.arrivals().count(), 3);
        assert_eq!(report.rejected_count(), 2);
        assert_eq!(report.dispatch_count(), 2);
        assert_eq!(report.total_time, 3);
    }

    #[test]
    fn test_overflow_fail() {
        let config = SimulationConfig::new()
            .with_capacity(Some(1))
            .with_overflow(OverflowPolicy::Fail)
            .with_arrival(ArrivalModel::Bernoulli { probability: 1.0 });
        let mut queue = TaskQueue::with_capacity(1);
        queue.insert(Task::new("A", 1, 3).unwrap()).unwrap();
        queue.insert(Task::new("B", 1, 3).unwrap()).unwrap_err();

        let mut sim = Simulator::new(&config, SmallRng::seed_from_u64(0)).unwrap();
        assert!(matches!(
            sim.run(&mut queue),
            Err(SchedError::CapacityExceeded { capacity: 1, .. })
        ));
        // A was dispatched and the first arrival took the free slot
        let partial = sim.report();
        assert_eq!(partial.dispatch_order(), vec!["A"]);
        assert_eq!(partial.arrivals().count(), 1);
        assert_eq!(partial.total_time, 1);
    }

    #[test]
    fn test_time_limit() {
        let config = SimulationConfig::new()
            .with_capacity(None)
            .with_arrival(ArrivalModel::Bernoulli { probability: 1.0 })
            .with_generator(GeneratorConfig::default().with_duration_range(5, 5))
            .with_max_time_units(100);
        let mut queue = abc_queue();
        let mut sim = Simulator::new(&config, SmallRng::seed_from_u64(0)).unwrap();
        assert!(matches!(
            sim.run(&mut queue),
            Err(SchedError::TimeLimit { limit: 100 })
        ));

        let partial = sim.report();
        assert_eq!(partial.total_time, 100);
        assert_eq!(partial.arrivals().count(), 100);
        assert_eq!(partial.dispatch_order()[0], "B");
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let config = SimulationConfig::new()
            .with_arrival(ArrivalModel::Bernoulli { probability: 0.1 })
            .with_generator(GeneratorConfig::default().with_duration_range(1, 4));
        let run = |seed| simulate(&config, seed, &mut abc_queue()).unwrap();
        assert_eq!(run(42), run(42));
    }
}
