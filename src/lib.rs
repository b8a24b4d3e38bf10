//! Single-server priority scheduling simulator for the U-Engine ecosystem.
//!
//! Models a server that always runs the highest-priority pending task to
//! completion while new tasks arrive at random during execution.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Task`
//! - **`queue`**: `TaskQueue`, an array-backed binary max-heap keyed by priority
//! - **`generator`**: `RandomTaskGenerator` and `ArrivalModel` over an injected RNG
//! - **`simulation`**: `Simulator` dispatch loop, `SimulationReport`, `SimulationKpi`
//! - **`loader`**: `<name> <priority> <duration>` text input
//! - **`config`**: `SimulationConfig` (TOML loadable)
//! - **`validation`**: Configuration and input checks
//! - **`error`**: `SchedError`
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//! use u_simsched::config::SimulationConfig;
//! use u_simsched::generator::ArrivalModel;
//! use u_simsched::loader;
//! use u_simsched::queue::TaskQueue;
//! use u_simsched::simulation::Simulator;
//!
//! let mut queue = TaskQueue::new();
//! loader::load_into("A 5 3\nB 9 2\nC 1 1\n".as_bytes(), &mut queue).unwrap();
//!
//! let config = SimulationConfig::new().with_arrival(ArrivalModel::Never);
//! let report = Simulator::new(&config, SmallRng::seed_from_u64(1))
//!     .unwrap()
//!     .run(&mut queue)
//!     .unwrap();
//! assert_eq!(report.dispatch_order(), vec!["B", "A", "C"]);
//! assert_eq!(report.total_time, 6);
//! ```
//!
//! # References
//!
//! - Cormen et al. (2009), "Introduction to Algorithms", Ch. 6
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod config;
pub mod error;
pub mod generator;
pub mod loader;
pub mod models;
pub mod queue;
pub mod simulation;
pub mod validation;

pub use error::{SchedError, SchedResult};
