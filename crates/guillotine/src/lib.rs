//! # U-Guillotine
//!
//! Guillotine cutting-stock optimization for the U-Guillotine engine.
//!
//! This crate places rectangular boxes on rectangular sheets so that every
//! box can be freed by straight edge-to-edge saw cuts, accounting for saw
//! kerf and edge trimming.
//!
//! ## Features
//!
//! - Fragment-based packing with six score and six split heuristics
//! - Search over all 36 heuristic pairs in parallel (rayon)
//! - Optional stacking of equal-width boxes into strips
//! - Bounding-box cropping to keep leftovers large
//! - Auto-generated sheets of a base size

pub mod engine;
pub mod packer;
pub mod score;
pub mod supergroup;

// Re-exports
pub use engine::{CancelToken, PackEngine, RunRank};
pub use packer::Packer;
pub use score::{find_best_bin, score_by_heuristic, BinChoice, MatchQuality};
pub use u_guillotine_core::{
    heuristic_pairs, BboxOptimization, Bin, BinOrigin, Box2D, Config, Cut, CutOrientation, Error,
    ErrorCode, PackSummary, Packing, Performance, PresortStrategy, ProgressCallback, ProgressInfo,
    Result, ScoreHeuristic, Solver, SplitHeuristic, StackingMode,
};
