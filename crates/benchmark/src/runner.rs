//! Job and scenario runner.

use crate::dataset::Job;
use crate::result::{BenchmarkResult, RunResult};
use crate::scenario::{Scenario, ScenarioResult};
use std::time::Instant;
use u_guillotine::PackEngine;

/// Configuration for runs.
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Worker threads per engine (overrides the job's setting when set).
    pub threads: Option<usize>,
    /// Time limit per job in milliseconds (overrides the job's setting when set).
    pub time_limit_ms: Option<u64>,
    /// Whether to attach sheet layouts to the results.
    pub include_layout: bool,
    /// Whether to show progress.
    pub show_progress: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            threads: None,
            time_limit_ms: None,
            include_layout: false,
            show_progress: true,
        }
    }
}

impl BenchmarkConfig {
    /// Creates a new configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the worker thread count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Sets the time limit per job.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Attaches layouts to results.
    pub fn with_layout(mut self, include: bool) -> Self {
        self.include_layout = include;
        self
    }

    /// Enables or disables progress output.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }
}

/// Runs jobs through the engine.
pub struct BenchmarkRunner {
    config: BenchmarkConfig,
}

impl BenchmarkRunner {
    /// Creates a new runner.
    pub fn new(config: BenchmarkConfig) -> Self {
        Self { config }
    }

    fn engine_for(&self, job: &Job) -> PackEngine {
        let mut config = job.config.clone();
        if let Some(threads) = self.config.threads {
            config = config.with_threads(threads);
        }
        if let Some(ms) = self.config.time_limit_ms {
            config = config.with_time_limit(ms);
        }
        PackEngine::new(config)
    }

    /// Runs a single job.
    pub fn run_job(&self, job: &Job) -> RunResult {
        if self.config.show_progress {
            println!("\nRunning job: {}", job.name);
            println!("  Sheets: {}", job.expand_bins().len());
            println!("  Boxes: {}", job.box_count());
        }

        let bins = job.expand_bins();
        let boxes = job.expand_boxes();
        let engine = self.engine_for(job);

        let start = Instant::now();
        let outcome = engine.run(&bins, &boxes);
        let elapsed = start.elapsed().as_millis() as u64;

        let mut result = RunResult::from_outcome(&job.name, boxes.len(), &outcome, elapsed);
        if let Ok(packing) = &outcome {
            if self.config.include_layout {
                result = result.with_layout(packing);
            }
        }

        if self.config.show_progress {
            match &outcome {
                Ok(packing) => println!(
                    "  {}: placed={}/{}, sheets={}, util={:.1}%, time={}ms",
                    packing.strategy_label(),
                    packing.placed_count(),
                    boxes.len(),
                    packing.performance.bins_used,
                    packing.utilization() * 100.0,
                    elapsed
                ),
                Err(e) => println!("  Failed ({:?}): {}", result.code, e),
            }
        }

        result
    }

    /// Runs several jobs into one report.
    pub fn run_jobs(&self, jobs: &[Job]) -> BenchmarkResult {
        let mut combined = BenchmarkResult::new();
        for job in jobs {
            combined.add_run(self.run_job(job));
        }
        combined
    }

    /// Runs a scenario and evaluates its criteria.
    pub fn run_scenario(&self, scenario: &Scenario) -> ScenarioResult {
        let engine = self.engine_for(&scenario.job);
        let start = Instant::now();
        let outcome = engine.run(&scenario.job.expand_bins(), &scenario.job.expand_boxes());
        let time_ms = start.elapsed().as_millis() as u64;

        let criteria_results = scenario.evaluate(&outcome);
        let passed = criteria_results.iter().all(|c| c.passed);

        if self.config.show_progress {
            println!(
                "[{}] {} - {}",
                if passed { "PASS" } else { "FAIL" },
                scenario.id,
                scenario.name
            );
            for c in criteria_results.iter().filter(|c| !c.passed) {
                println!(
                    "    {}: expected {}, got {}",
                    c.criterion, c.expected, c.actual
                );
            }
        }

        ScenarioResult {
            scenario_id: scenario.id.clone(),
            passed,
            criteria_results,
            time_ms,
        }
    }
}
