//! Heuristic search over every (score, split) pair.
//!
//! The engine runs one [`Packer`] per heuristic pair on its own copy of the
//! input and keeps the best packing. Runs are independent, so they are spread
//! over a rayon pool; results are collected in pair order and ties keep the
//! earlier pair, which makes the outcome independent of the thread count.

use crate::packer::Packer;
use rayon::prelude::*;
use u_guillotine_core::{
    heuristic_pairs, Bin, Box2D, Config, Error, Packing, ProgressCallback, ProgressInfo, Result,
    ScoreHeuristic, SplitHeuristic, Solver, EPSILON,
};

use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared flag that aborts a running search when set.
pub type CancelToken = Arc<AtomicBool>;

/// Ranking key of a successful run. Smaller is better.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunRank {
    /// Boxes left unplaced.
    pub unplaced: usize,
    /// Sheets used.
    pub bins_used: usize,
    /// Length of the largest leftover (larger is better).
    pub leftover_length: f64,
    /// Width of the largest leftover (larger is better).
    pub leftover_width: f64,
    /// Number of leftovers.
    pub leftover_count: usize,
}

impl RunRank {
    /// Extracts the ranking key of a packing.
    pub fn of(packing: &Packing) -> Self {
        Self {
            unplaced: packing.unplaced.len(),
            bins_used: packing.performance.bins_used,
            leftover_length: packing.performance.largest_leftover_length,
            leftover_width: packing.performance.largest_leftover_width,
            leftover_count: packing.performance.leftover_count,
        }
    }

    /// Orders two keys, best first.
    pub fn compare(&self, other: &RunRank) -> CmpOrdering {
        self.unplaced
            .cmp(&other.unplaced)
            .then(self.bins_used.cmp(&other.bins_used))
            .then_with(|| larger_first(self.leftover_length, other.leftover_length))
            .then_with(|| larger_first(self.leftover_width, other.leftover_width))
            .then(self.leftover_count.cmp(&other.leftover_count))
    }

    /// Returns true if this key is strictly better than `other`.
    pub fn beats(&self, other: &RunRank) -> bool {
        self.compare(other) == CmpOrdering::Less
    }
}

fn larger_first(a: f64, b: f64) -> CmpOrdering {
    if (a - b).abs() <= EPSILON {
        CmpOrdering::Equal
    } else if a > b {
        CmpOrdering::Less
    } else {
        CmpOrdering::Greater
    }
}

/// Guillotine cutting optimizer.
///
/// # Example
///
/// ```rust
/// use u_guillotine::{Bin, Box2D, Config, PackEngine};
///
/// let config = Config::new().with_kerf(3.0);
/// let engine = PackEngine::new(config);
///
/// let bins = vec![Bin::new(2000.0, 1000.0)];
/// let boxes: Vec<Box2D> = (0..5)
///     .map(|i| Box2D::new(format!("panel-{i}"), 400.0, 300.0))
///     .collect();
///
/// let packing = engine.run(&bins, &boxes).unwrap();
/// assert!(packing.all_placed());
/// assert_eq!(packing.performance.bins_used, 1);
/// ```
pub struct PackEngine {
    config: Config,
    cancelled: CancelToken,
}

impl PackEngine {
    /// Creates a new engine with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates an engine with default configuration.
    pub fn default_config() -> Self {
        Self::new(Config::default())
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a token that cancels the running search when set.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancelled.clone()
    }

    /// Requests cancellation of the running search.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Runs every heuristic pair and returns the best packing.
    pub fn run(&self, bins: &[Bin], boxes: &[Box2D]) -> Result<Packing> {
        self.search(bins, boxes, None)
    }

    /// Like [`run`](Self::run), reporting after every finished run.
    pub fn run_with_progress(
        &self,
        bins: &[Bin],
        boxes: &[Box2D],
        callback: ProgressCallback,
    ) -> Result<Packing> {
        self.search(bins, boxes, Some(&callback))
    }

    fn validate(&self, bins: &[Bin], boxes: &[Box2D]) -> Result<()> {
        if bins.is_empty() && !self.config.has_base_bin() {
            return Err(Error::NoBin);
        }
        self.config.validate()?;
        for b in boxes {
            b.validate()?;
        }
        for bin in bins {
            bin.validate()?;
        }
        Ok(())
    }

    fn search(
        &self,
        bins: &[Bin],
        boxes: &[Box2D],
        callback: Option<&ProgressCallback>,
    ) -> Result<Packing> {
        self.validate(bins, boxes)?;

        // Reset cancellation flag
        self.cancelled.store(false, Ordering::Relaxed);

        let start = Instant::now();
        let deadline = (self.config.time_limit_ms > 0)
            .then(|| start + Duration::from_millis(self.config.time_limit_ms));

        let pairs: Vec<(ScoreHeuristic, SplitHeuristic)> = heuristic_pairs().collect();
        let total = pairs.len();
        let completed = AtomicUsize::new(0);
        let succeeded = AtomicUsize::new(0);
        let best_packed = AtomicUsize::new(0);

        let run = |&(score, split): &(ScoreHeuristic, SplitHeuristic)| -> Result<Packing> {
            let mut packer = Packer::new(self.config.clone(), score, split)
                .with_cancel_flag(self.cancelled.clone());
            if let Some(deadline) = deadline {
                packer = packer.with_deadline(deadline);
            }
            let outcome = packer.pack(
                bins.to_vec(),
                boxes.iter().map(Box2D::deep_clone).collect(),
            );

            if let Ok(packing) = &outcome {
                log::debug!(
                    "Run {}: placed {}, unplaced {}, bins {}",
                    packing.strategy_label(),
                    packing.placed_count(),
                    packing.unplaced_count(),
                    packing.performance.bins_used
                );
                if packing.is_successful() {
                    succeeded.fetch_add(1, Ordering::Relaxed);
                }
                best_packed.fetch_max(packing.placed_count(), Ordering::Relaxed);
            }
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;

            if let Some(callback) = callback {
                callback(
                    ProgressInfo::new()
                        .with_runs(done, total)
                        .with_best(
                            succeeded.load(Ordering::Relaxed),
                            best_packed.load(Ordering::Relaxed),
                        )
                        .with_elapsed(start.elapsed().as_millis() as u64)
                        .with_phase(format!("{}/{}", score.name(), split.name())),
                );
            }
            outcome
        };

        let outcomes: Vec<Result<Packing>> = match self.config.threads {
            1 => pairs.iter().map(&run).collect(),
            0 => pairs.par_iter().map(&run).collect(),
            n => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| Error::Internal(format!("thread pool: {}", e)))?;
                pool.install(|| pairs.par_iter().map(&run).collect::<Vec<_>>())
            }
        };

        let result = select_best(outcomes);

        if let Some(callback) = callback {
            callback(
                ProgressInfo::new()
                    .with_runs(completed.load(Ordering::Relaxed), total)
                    .with_best(
                        succeeded.load(Ordering::Relaxed),
                        best_packed.load(Ordering::Relaxed),
                    )
                    .with_elapsed(start.elapsed().as_millis() as u64)
                    .with_phase("done")
                    .finished(),
            );
        }

        let mut packing = result?;
        packing.computation_time_ms = start.elapsed().as_millis() as u64;
        log::info!(
            "Best run {}: {} placed, {} unplaced, {} bins in {} ms",
            packing.strategy_label(),
            packing.placed_count(),
            packing.unplaced_count(),
            packing.performance.bins_used,
            packing.computation_time_ms
        );
        Ok(packing)
    }
}

/// Picks the best successful run, in pair order.
///
/// Cancellation wins over any result. A timeout only surfaces when no run
/// finished with a placement.
fn select_best(outcomes: Vec<Result<Packing>>) -> Result<Packing> {
    let total = outcomes.len();
    let mut best: Option<(RunRank, Packing)> = None;
    let mut interrupted: Option<Error> = None;
    let mut failed = 0;

    for outcome in outcomes {
        match outcome {
            Ok(packing) if packing.is_successful() => {
                let rank = RunRank::of(&packing);
                if best.as_ref().map_or(true, |(current, _)| rank.beats(current)) {
                    best = Some((rank, packing));
                }
            }
            Ok(_) => {}
            Err(Error::Cancelled) => return Err(Error::Cancelled),
            Err(e @ Error::Timeout(_)) => interrupted = Some(e),
            Err(e) => {
                log::warn!("Discarding failed run: {}", e);
                if e.is_internal() {
                    failed += 1;
                }
            }
        }
    }

    match (best, interrupted) {
        (Some((_, packing)), _) => Ok(packing),
        (None, Some(e)) => Err(e),
        (None, None) if total > 0 && failed == total => Err(Error::BadError(format!(
            "all {} runs failed internally",
            total
        ))),
        (None, None) => Err(Error::NoPlacementPossible),
    }
}

impl Solver for PackEngine {
    fn solve(&self, bins: &[Bin], boxes: &[Box2D]) -> Result<Packing> {
        self.run(bins, boxes)
    }

    fn solve_with_progress(
        &self,
        bins: &[Bin],
        boxes: &[Box2D],
        callback: ProgressCallback,
    ) -> Result<Packing> {
        self.run_with_progress(bins, boxes, callback)
    }

    fn cancel(&self) {
        PackEngine::cancel(self);
    }
}
