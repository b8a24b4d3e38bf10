//! Simulation domain models.
//!
//! # Domain Mappings
//!
//! | u-simsched | Operating system | Help desk |
//! |------------|------------------|-----------|
//! | Task | Process | Ticket |
//! | priority | Nice level (inverted) | Severity |
//! | duration | CPU burst | Handling time |

mod task;

pub use task::{Task, MAX_NAME_LEN};
