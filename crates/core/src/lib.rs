//! # U-Guillotine Core
//!
//! Core types for the U-Guillotine cutting-stock optimizer.
//!
//! This crate provides the geometric model shared by the packer and the
//! heuristic search engine in `u-guillotine`.
//!
//! ## Core Components
//!
//! - **Geometry**: [`Box2D`] (pieces), [`Bin`] (sheets and offcuts), [`Cut`]
//! - **Heuristics**: [`ScoreHeuristic`], [`SplitHeuristic`]
//! - **Results**: [`Packing`], [`Performance`], [`PackSummary`]
//! - **Solver trait**: [`Solver`] with [`ProgressInfo`] reporting
//!
//! ## Configuration
//!
//! ```rust
//! use u_guillotine_core::{BboxOptimization, Config, StackingMode};
//!
//! let config = Config::new()
//!     .with_kerf(3.0)
//!     .with_trimming(10.0)
//!     .with_base_bin(2800.0, 2070.0)
//!     .with_stacking(StackingMode::AlongLength)
//!     .with_bbox_optimization(BboxOptimization::Always);
//! assert!(config.validate().is_ok());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod bin;
pub mod box2d;
pub mod config;
pub mod cut;
pub mod error;
pub mod heuristic;
pub mod result;
pub mod solver;

// Re-exports
pub use bin::{Bin, BinOrigin, Split};
pub use box2d::{Box2D, BoxId};
pub use config::{BboxOptimization, Config, PresortStrategy, StackingMode};
pub use cut::{Cut, CutOrientation};
pub use error::{Error, ErrorCode, Result};
pub use heuristic::{heuristic_pairs, ScoreHeuristic, SplitHeuristic};
pub use result::{PackSummary, Packing, Performance};
pub use solver::{ProgressCallback, ProgressInfo, Solver};

/// Tolerance for dimension comparisons.
pub const EPSILON: f64 = 1e-6;
