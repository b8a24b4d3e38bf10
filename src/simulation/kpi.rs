//! Run quality metrics (KPIs).
//!
//! Computes standard single-server queueing indicators from a
//! simulation report.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total Time | Elapsed time units until the queue emptied |
//! | Avg Wait | Mean time from release to dispatch |
//! | Max Wait | Longest single wait |
//! | Weighted Avg Wait | Wait averaged with weight `max(priority, 0) + 1` |
//! | Avg Flow Time | Mean time from release to completion |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use serde::{Deserialize, Serialize};

use super::SimulationReport;

/// Run performance indicators.
///
/// All time values are in simulation time units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationKpi {
    /// Tasks dispatched.
    pub dispatch_count: usize,
    /// Random arrivals, accepted or not.
    pub arrival_count: usize,
    /// Arrivals dropped on a full queue.
    pub rejected_count: usize,
    /// Total elapsed time units.
    pub total_time: u64,
    /// Mean wait before dispatch.
    pub avg_wait: f64,
    /// Longest wait before dispatch.
    pub max_wait: u64,
    /// Priority-weighted mean wait.
    pub weighted_avg_wait: f64,
    /// Mean time from release to completion.
    pub avg_flow_time: f64,
}

impl SimulationKpi {
    /// Computes KPIs from a report.
    pub fn calculate(report: &SimulationReport) -> Self {
        let mut dispatch_count = 0usize;
        let mut total_wait = 0u64;
        let mut max_wait = 0u64;
        let mut total_flow = 0u64;
        let mut weighted_wait = 0.0;
        let mut total_weight = 0.0;

        for d in report.dispatches() {
            dispatch_count += 1;
            let wait = d.wait_time();
            total_wait += wait;
            max_wait = max_wait.max(wait);
            total_flow += d.flow_time();

            let weight = f64::from(d.priority.max(0)) + 1.0;
            weighted_wait += weight * wait as f64;
            total_weight += weight;
        }

        let mean = |sum: u64| {
            if dispatch_count == 0 {
                0.0
            } else {
                sum as f64 / dispatch_count as f64
            }
        };

        Self {
            dispatch_count,
            arrival_count: report.arrivals().count(),
            rejected_count: report.rejected_count(),
            total_time: report.total_time,
            avg_wait: mean(total_wait),
            max_wait,
            weighted_avg_wait: if total_weight > 0.0 {
                weighted_wait / total_weight
            } else {
                0.0
            },
            avg_flow_time: mean(total_flow),
        }
    }
}
