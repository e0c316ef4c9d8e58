//! Packing result representation.

use crate::bin::Bin;
use crate::box2d::Box2D;
use crate::cut::Cut;
use crate::heuristic::{ScoreHeuristic, SplitHeuristic};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Aggregate statistics of one packing run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Performance {
    /// Sheets holding at least one box.
    pub bins_used: usize,
    /// Boxes placed.
    pub boxes_packed: usize,
    /// Leftover pieces over all used sheets.
    pub leftover_count: usize,
    /// Length of the largest (by area) leftover, 0 if none.
    pub largest_leftover_length: f64,
    /// Width of the largest (by area) leftover, 0 if none.
    pub largest_leftover_width: f64,
}

impl Performance {
    /// Computes statistics over the used sheets in `bins`.
    pub fn from_bins(bins: &[Bin]) -> Self {
        let used = bins.iter().filter(|b| !b.boxes.is_empty());

        let mut perf = Self::default();
        let mut largest_area = 0.0;
        for bin in used {
            perf.bins_used += 1;
            perf.boxes_packed += bin.boxes.iter().map(Box2D::leaf_count).sum::<usize>();
            perf.leftover_count += bin.leftovers.len();
            for leftover in &bin.leftovers {
                if leftover.area() > largest_area {
                    largest_area = leftover.area();
                    perf.largest_leftover_length = leftover.length;
                    perf.largest_leftover_width = leftover.width;
                }
            }
        }
        perf
    }
}

/// Outcome of a packing run: placed sheets, unplaced boxes and statistics.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Packing {
    /// Used sheets with their original (untrimmed) geometry, placed boxes,
    /// cuts and leftovers.
    pub bins: Vec<Bin>,

    /// Boxes that could not be placed.
    pub unplaced: Vec<Box2D>,

    /// Run statistics.
    pub performance: Performance,

    /// Score heuristic of the run.
    pub score_heuristic: ScoreHeuristic,

    /// Split heuristic of the run.
    pub split_heuristic: SplitHeuristic,

    /// Computation time in milliseconds.
    pub computation_time_ms: u64,
}

impl Packing {
    /// Creates an empty result for the given heuristic pair.
    pub fn new(score_heuristic: ScoreHeuristic, split_heuristic: SplitHeuristic) -> Self {
        Self {
            bins: Vec::new(),
            unplaced: Vec::new(),
            performance: Performance::default(),
            score_heuristic,
            split_heuristic,
            computation_time_ms: 0,
        }
    }

    /// Returns true if every box was placed.
    pub fn all_placed(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Returns the number of placed boxes.
    pub fn placed_count(&self) -> usize {
        self.performance.boxes_packed
    }

    /// Returns the number of unplaced boxes.
    pub fn unplaced_count(&self) -> usize {
        self.unplaced.len()
    }

    /// Returns true if at least one box was placed.
    pub fn is_successful(&self) -> bool {
        self.performance.boxes_packed > 0
    }

    /// Placed box area over the trimmed area of the used sheets.
    pub fn utilization(&self) -> f64 {
        let sheet_area: f64 = self.bins.iter().map(Bin::trimmed_area).sum();
        if sheet_area <= 0.0 {
            return 0.0;
        }
        let box_area: f64 = self
            .bins
            .iter()
            .flat_map(|b| &b.boxes)
            .map(Box2D::area)
            .sum();
        box_area / sheet_area
    }

    /// Every cut over all sheets.
    pub fn cuts(&self) -> impl Iterator<Item = &Cut> {
        self.bins.iter().flat_map(|b| &b.cuts)
    }

    /// Summed length of every cut.
    pub fn total_cut_length(&self) -> f64 {
        self.cuts().map(|c| c.length).sum()
    }

    /// Heuristic pair as a short label, e.g. `BAF/SLAS`.
    pub fn strategy_label(&self) -> String {
        format!(
            "{}/{}",
            self.score_heuristic.name(),
            self.split_heuristic.name()
        )
    }

    /// Condensed statistics.
    pub fn summary(&self) -> PackSummary {
        PackSummary::from(self)
    }
}

/// Summary statistics for a packing.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackSummary {
    /// Boxes requested (placed + unplaced).
    pub total_requested: usize,
    /// Boxes placed.
    pub total_placed: usize,
    /// Sheets used.
    pub bins_used: usize,
    /// Utilization percentage.
    pub utilization_percent: f64,
    /// Number of cuts.
    pub cut_count: usize,
    /// Total cut length.
    pub cut_length: f64,
    /// Computation time in milliseconds.
    pub time_ms: u64,
    /// Winning heuristic pair.
    pub strategy: String,
}

impl From<&Packing> for PackSummary {
    fn from(packing: &Packing) -> Self {
        Self {
            total_requested: packing.placed_count() + packing.unplaced_count(),
            total_placed: packing.placed_count(),
            bins_used: packing.performance.bins_used,
            utilization_percent: packing.utilization() * 100.0,
            cut_count: packing.cuts().count(),
            cut_length: packing.total_cut_length(),
            time_ms: packing.computation_time_ms,
            strategy: packing.strategy_label(),
        }
    }
}
