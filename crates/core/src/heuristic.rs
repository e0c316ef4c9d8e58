//! Heuristic selectors for a single packing run.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fit-quality measure used to choose a free bin for a box.
///
/// Every variant scores so that lower is better; the `Worst*` variants are
/// the negation of their `Best*` counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScoreHeuristic {
    /// Smallest remaining area.
    #[default]
    BestAreaFit,
    /// Smallest short-side difference.
    BestShortSideFit,
    /// Smallest long-side difference.
    BestLongSideFit,
    /// Largest remaining area.
    WorstAreaFit,
    /// Largest short-side difference.
    WorstShortSideFit,
    /// Largest long-side difference.
    WorstLongSideFit,
}

impl ScoreHeuristic {
    /// All score heuristics, in search order.
    pub const ALL: [ScoreHeuristic; 6] = [
        Self::BestAreaFit,
        Self::BestShortSideFit,
        Self::BestLongSideFit,
        Self::WorstAreaFit,
        Self::WorstShortSideFit,
        Self::WorstLongSideFit,
    ];

    /// Short name for reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BestAreaFit => "BAF",
            Self::BestShortSideFit => "BSSF",
            Self::BestLongSideFit => "BLSF",
            Self::WorstAreaFit => "WAF",
            Self::WorstShortSideFit => "WSSF",
            Self::WorstLongSideFit => "WLSF",
        }
    }
}

/// Rule deciding which guillotine cut is made first when a box is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SplitHeuristic {
    /// The larger leftover keeps the full span of the shorter leftover axis.
    #[default]
    ShorterLeftoverAxis,
    /// The larger leftover keeps the full span of the longer leftover axis.
    LongerLeftoverAxis,
    /// Make the smaller of the two leftovers as small as possible.
    MinimizeArea,
    /// Make the larger of the two leftovers as large as possible.
    MaximizeArea,
    /// Cut across the shorter bin side first.
    ShorterAxis,
    /// Cut across the longer bin side first.
    LongerAxis,
}

impl SplitHeuristic {
    /// All split heuristics, in search order.
    pub const ALL: [SplitHeuristic; 6] = [
        Self::ShorterLeftoverAxis,
        Self::LongerLeftoverAxis,
        Self::MinimizeArea,
        Self::MaximizeArea,
        Self::ShorterAxis,
        Self::LongerAxis,
    ];

    /// Short name for reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ShorterLeftoverAxis => "SLAS",
            Self::LongerLeftoverAxis => "LLAS",
            Self::MinimizeArea => "MINAS",
            Self::MaximizeArea => "MAXAS",
            Self::ShorterAxis => "SAS",
            Self::LongerAxis => "LAS",
        }
    }
}

/// Every (score, split) pair the engine evaluates, in search order.
pub fn heuristic_pairs() -> impl Iterator<Item = (ScoreHeuristic, SplitHeuristic)> {
    ScoreHeuristic::ALL
        .into_iter()
        .flat_map(|score| SplitHeuristic::ALL.into_iter().map(move |split| (score, split)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_pairs_are_unique_and_complete() {
        let pairs: Vec<_> = heuristic_pairs().collect();
        assert_eq!(pairs.len(), 36);
        let unique: HashSet<_> = pairs.iter().copied().collect();
        assert_eq!(unique.len(), 36);
        assert_eq!(
            pairs[0],
            (ScoreHeuristic::BestAreaFit, SplitHeuristic::ShorterLeftoverAxis)
        );
    }

    #[test]
    fn test_names() {
        assert_eq!(ScoreHeuristic::WorstLongSideFit.name(), "WLSF");
        assert_eq!(SplitHeuristic::MinimizeArea.name(), "MINAS");
    }
}
