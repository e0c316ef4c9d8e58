//! Packing configuration.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Order in which boxes are fed to the placement loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PresortStrategy {
    /// Keep the input order.
    None,
    /// Widest first.
    WidthDesc,
    /// Longest first.
    LengthDesc,
    /// Largest area first.
    #[default]
    AreaDesc,
    /// Largest perimeter first.
    PerimeterDesc,
}

/// Axis along which same-sized boxes are merged into superboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StackingMode {
    /// No stacking.
    #[default]
    None,
    /// Boxes of equal width are stacked end to end along their length.
    AlongLength,
    /// Boxes of equal length are stacked side by side along their width.
    AlongWidth,
}

impl StackingMode {
    /// Returns true if stacking is enabled.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Bounding-box post-processing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BboxOptimization {
    /// Leave trailing cuts untouched.
    #[default]
    None,
    /// Crop every used bin to its content bounding box.
    Always,
}

impl BboxOptimization {
    /// Returns true if bounding-box cropping is enabled.
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Always)
    }
}

/// Configuration shared by the packer and the search engine.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Material lost to the saw blade between adjacent pieces.
    pub saw_kerf: f64,

    /// Margin removed from every side of a bin before packing.
    pub trimming: f64,

    /// Whether boxes may be rotated by 90 degrees.
    pub rotatable: bool,

    /// Length of auto-generated bins (0 = none).
    pub base_bin_length: f64,

    /// Width of auto-generated bins (0 = none).
    pub base_bin_width: f64,

    /// Box order before placement.
    pub presort: PresortStrategy,

    /// Superbox stacking axis.
    pub stacking: StackingMode,

    /// Explode a superbox back into its boxes when it cannot be placed.
    pub break_stacking_if_needed: bool,

    /// Bounding-box post-processing.
    pub bbox_optimization: BboxOptimization,

    /// Maximum computation time in milliseconds (0 = unlimited).
    pub time_limit_ms: u64,

    /// Number of threads for the heuristic search (0 = auto, 1 = sequential).
    pub threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            saw_kerf: 0.0,
            trimming: 0.0,
            rotatable: true,
            base_bin_length: 0.0,
            base_bin_width: 0.0,
            presort: PresortStrategy::default(),
            stacking: StackingMode::default(),
            break_stacking_if_needed: true,
            bbox_optimization: BboxOptimization::default(),
            time_limit_ms: 0,
            threads: 0,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the saw kerf.
    pub fn with_kerf(mut self, kerf: f64) -> Self {
        self.saw_kerf = kerf;
        self
    }

    /// Sets the trimming margin.
    pub fn with_trimming(mut self, trimming: f64) -> Self {
        self.trimming = trimming;
        self
    }

    /// Allows or forbids rotation.
    pub fn with_rotation(mut self, rotatable: bool) -> Self {
        self.rotatable = rotatable;
        self
    }

    /// Sets the size of auto-generated bins.
    pub fn with_base_bin(mut self, length: f64, width: f64) -> Self {
        self.base_bin_length = length;
        self.base_bin_width = width;
        self
    }

    /// Sets the presort strategy.
    pub fn with_presort(mut self, presort: PresortStrategy) -> Self {
        self.presort = presort;
        self
    }

    /// Sets the stacking mode.
    pub fn with_stacking(mut self, stacking: StackingMode) -> Self {
        self.stacking = stacking;
        self
    }

    /// Sets whether superboxes may be broken up when they do not fit.
    pub fn with_break_stacking(mut self, enabled: bool) -> Self {
        self.break_stacking_if_needed = enabled;
        self
    }

    /// Sets the bounding-box optimization mode.
    pub fn with_bbox_optimization(mut self, mode: BboxOptimization) -> Self {
        self.bbox_optimization = mode;
        self
    }

    /// Sets the time limit in milliseconds.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Sets the number of worker threads.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Returns true if a non-degenerate base bin size is configured.
    pub fn has_base_bin(&self) -> bool {
        self.base_bin_length > 0.0 && self.base_bin_width > 0.0
    }

    /// Validates numeric parameters.
    pub fn validate(&self) -> Result<()> {
        let finite_non_negative = |v: f64| v.is_finite() && v >= 0.0;

        if !finite_non_negative(self.saw_kerf) {
            return Err(Error::ConfigError(format!(
                "saw kerf must be a non-negative number, got {}",
                self.saw_kerf
            )));
        }
        if !finite_non_negative(self.trimming) {
            return Err(Error::ConfigError(format!(
                "trimming must be a non-negative number, got {}",
                self.trimming
            )));
        }
        if !finite_non_negative(self.base_bin_length) || !finite_non_negative(self.base_bin_width)
        {
            return Err(Error::ConfigError(format!(
                "base bin size must be non-negative, got {} x {}",
                self.base_bin_length, self.base_bin_width
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.saw_kerf, 0.0);
        assert!(config.rotatable);
        assert!(!config.has_base_bin());
        assert_eq!(config.presort, PresortStrategy::AreaDesc);
        assert!(!config.stacking.is_enabled());
        assert!(!config.bbox_optimization.is_enabled());
    }

    #[test]
    fn test_builder() {
        let config = Config::new()
            .with_kerf(3.0)
            .with_trimming(10.0)
            .with_rotation(false)
            .with_base_bin(2440.0, 1220.0)
            .with_stacking(StackingMode::AlongWidth)
            .with_bbox_optimization(BboxOptimization::Always);

        assert_eq!(config.saw_kerf, 3.0);
        assert_eq!(config.trimming, 10.0);
        assert!(!config.rotatable);
        assert!(config.has_base_bin());
        assert!(config.stacking.is_enabled());
        assert!(config.bbox_optimization.is_enabled());
    }

    #[test]
    fn test_validate_rejects_negative_kerf() {
        assert!(Config::new().with_kerf(-1.0).validate().is_err());
        assert!(Config::new().with_trimming(f64::NAN).validate().is_err());
        assert!(Config::new().with_base_bin(-5.0, 10.0).validate().is_err());
        assert!(Config::new().with_kerf(4.0).validate().is_ok());
    }
}
