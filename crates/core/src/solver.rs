//! Solver trait and progress reporting.

use crate::bin::Bin;
use crate::box2d::Box2D;
use crate::result::Packing;
use crate::Result;

/// Progress callback for long-running searches.
pub type ProgressCallback = Box<dyn Fn(ProgressInfo) + Send + Sync>;

/// Progress information during a search.
#[derive(Debug, Clone, Default)]
pub struct ProgressInfo {
    /// Finished runs.
    pub runs_completed: usize,
    /// Total runs in the search.
    pub total_runs: usize,
    /// Finished runs that placed at least one box.
    pub runs_succeeded: usize,
    /// Most boxes placed by any finished run.
    pub best_boxes_packed: usize,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: u64,
    /// Label of the run that just finished.
    pub phase: String,
    /// Whether the search is still running.
    pub running: bool,
}

impl ProgressInfo {
    /// Creates a new progress info with default values.
    pub fn new() -> Self {
        Self {
            running: true,
            ..Default::default()
        }
    }

    /// Sets the run counters.
    pub fn with_runs(mut self, completed: usize, total: usize) -> Self {
        self.runs_completed = completed;
        self.total_runs = total;
        self
    }

    /// Sets the success counters.
    pub fn with_best(mut self, succeeded: usize, best_boxes_packed: usize) -> Self {
        self.runs_succeeded = succeeded;
        self.best_boxes_packed = best_boxes_packed;
        self
    }

    /// Sets the elapsed time.
    pub fn with_elapsed(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }

    /// Sets the phase description.
    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = phase.into();
        self
    }

    /// Marks the search as finished.
    pub fn finished(mut self) -> Self {
        self.running = false;
        self
    }

    /// Fraction of runs completed (0.0 to 1.0).
    pub fn progress_percent(&self) -> f64 {
        if self.total_runs > 0 {
            self.runs_completed as f64 / self.total_runs as f64
        } else {
            0.0
        }
    }
}

/// Common interface of packing solvers.
pub trait Solver {
    /// Packs `boxes` into `bins` (and auto-generated sheets, if configured).
    fn solve(&self, bins: &[Bin], boxes: &[Box2D]) -> Result<Packing>;

    /// Packs with a progress callback.
    fn solve_with_progress(
        &self,
        bins: &[Bin],
        boxes: &[Box2D],
        callback: ProgressCallback,
    ) -> Result<Packing>;

    /// Cancels an ongoing solve operation.
    fn cancel(&self);
}
