//! Rota generation and KPI evaluation.
//!
//! # Algorithm
//!
//! `BlockGenerator` builds one schedule per attempt by bounded
//! generate-and-test: sample a block, keep it if it satisfies the
//! uniqueness and adjacency rules, otherwise resample. `RotaScheduler`
//! retries whole attempts, then runs `QueueBeyondSelector` over the
//! accepted schedule. Neither stage is optimal or exhaustive; both
//! trade completeness for simplicity and bounded running time.
//!
//! # KPI
//!
//! `RotaKpi` summarizes per-author workload and special post counts.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 13
//!   (workforce scheduling)

mod generator;
mod kpi;
mod orchestrator;
mod selector;

pub use generator::{BlockGenerator, DEFAULT_MAX_ITER};
pub use kpi::RotaKpi;
pub use orchestrator::{Rota, RotaScheduler};
pub use selector::QueueBeyondSelector;
