//! Dispatch simulation, run reports, and KPIs.
//!
//! `Simulator` drains a [`TaskQueue`](crate::queue::TaskQueue) one time
//! unit at a time, injecting random arrivals, and returns a
//! [`SimulationReport`] from which [`SimulationKpi`] derives summary metrics.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Law (2015), "Simulation Modeling and Analysis", Ch. 1 (discrete-event simulation)

mod engine;
mod kpi;
mod report;

pub use engine::{SimState, Simulator};
pub use kpi::SimulationKpi;
pub use report::{ArrivalRecord, DispatchRecord, SimEvent, SimulationReport};
