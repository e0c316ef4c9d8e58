//! Fit scoring of free bins for a box.

use u_guillotine_core::{Bin, Box2D, ScoreHeuristic};

/// How closely a box matches a bin, best first.
///
/// Rotated placements rank directly after their unrotated counterparts of
/// the same quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchQuality {
    /// Both dimensions equal.
    Exact,
    /// Both dimensions equal after rotation.
    ExactRotated,
    /// Exactly one dimension equal.
    OneSide,
    /// Exactly one dimension equal after rotation.
    OneSideRotated,
    /// Strictly smaller in both dimensions.
    Interior,
    /// Strictly smaller in both dimensions after rotation.
    InteriorRotated,
}

impl MatchQuality {
    fn classify(bin_length: f64, bin_width: f64, length: f64, width: f64, rotated: bool) -> Self {
        let eq = |a: f64, b: f64| (a - b).abs() <= u_guillotine_core::EPSILON;
        let matches = usize::from(eq(bin_length, length)) + usize::from(eq(bin_width, width));
        match (matches, rotated) {
            (2, false) => Self::Exact,
            (2, true) => Self::ExactRotated,
            (1, false) => Self::OneSide,
            (1, true) => Self::OneSideRotated,
            (_, false) => Self::Interior,
            (_, true) => Self::InteriorRotated,
        }
    }
}

/// Chosen free bin and orientation for a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinChoice {
    /// Position in the candidate slice.
    pub bin_index: usize,
    /// Whether the box must be rotated.
    pub rotated: bool,
    /// Match quality of the placement.
    pub quality: MatchQuality,
    /// Heuristic score (lower is better).
    pub score: f64,
}

impl BinChoice {
    fn beats(&self, other: &BinChoice) -> bool {
        (self.quality, self.score) < (other.quality, other.score)
    }
}

/// Scores placing `b` (in its current orientation) into `bin`; lower is better.
pub fn score_by_heuristic(b: &Box2D, bin: &Bin, heuristic: ScoreHeuristic) -> f64 {
    score_dims(b.length, b.width, bin, heuristic)
}

fn score_dims(length: f64, width: f64, bin: &Bin, heuristic: ScoreHeuristic) -> f64 {
    let area_fit = bin.area() - length * width;
    let dl = (bin.length - length).abs();
    let dw = (bin.width - width).abs();

    match heuristic {
        ScoreHeuristic::BestAreaFit => area_fit,
        ScoreHeuristic::BestShortSideFit => dl.min(dw),
        ScoreHeuristic::BestLongSideFit => dl.max(dw),
        ScoreHeuristic::WorstAreaFit => -area_fit,
        ScoreHeuristic::WorstShortSideFit => -dl.min(dw),
        ScoreHeuristic::WorstLongSideFit => -dl.max(dw),
    }
}

/// Finds the best free bin and orientation for `b`.
///
/// Candidates are ranked by match quality first and heuristic score second;
/// on a full tie the earlier candidate (and the unrotated orientation) wins.
/// Returns `None` if no candidate encloses the box in an allowed orientation.
pub fn find_best_bin(
    b: &Box2D,
    candidates: &[Bin],
    rotatable: bool,
    heuristic: ScoreHeuristic,
) -> Option<BinChoice> {
    let mut best: Option<BinChoice> = None;

    for (bin_index, bin) in candidates.iter().enumerate() {
        let mut consider = |rotated: bool, length: f64, width: f64| {
            let choice = BinChoice {
                bin_index,
                rotated,
                quality: MatchQuality::classify(bin.length, bin.width, length, width, rotated),
                score: score_dims(length, width, bin, heuristic),
            };
            if best.as_ref().map_or(true, |current| choice.beats(current)) {
                best = Some(choice);
            }
        };

        if bin.encloses(b) {
            consider(false, b.length, b.width);
        }
        if rotatable && bin.encloses_rotated(b) {
            consider(true, b.width, b.length);
        }
    }

    best
}
