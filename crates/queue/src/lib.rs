//! Background scheduling for tradepost-rs.
//!
//! This crate drives the periodic escalation sweep that enforces the
//! report SLA when no moderator responds in time.

pub mod scheduler;

pub use scheduler::{SchedulerConfig, SweepExecutor, run_scheduler};
