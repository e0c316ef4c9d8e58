//! Job runner for U-Guillotine
//!
//! This crate provides:
//! - A JSON job format (sheets, boxes and packing configuration)
//! - Seeded synthetic cutting-list generation
//! - Built-in acceptance scenarios
//! - A runner producing JSON and CSV reports

mod dataset;
mod error;
mod result;
mod runner;
mod scenario;
mod synthetic;

pub use dataset::{Job, PieceSpec, SheetSpec};
pub use error::BenchError;
pub use result::{BenchmarkResult, CutInfo, PlacementInfo, RunResult, SheetLayout};
pub use runner::{BenchmarkConfig, BenchmarkRunner};
pub use scenario::{builtin_scenarios, CriterionResult, Scenario, ScenarioResult, SuccessCriteria};
pub use synthetic::{SyntheticGenerator, SyntheticJobs, SHEET_LENGTH, SHEET_WIDTH};
