//! Synthetic cutting-list generator.
//!
//! Generates reproducible jobs that stress different parts of the packer:
//! furniture-like mixes, strips for stacking, guillotine-perfect dissections,
//! extreme aspect ratios and oversized pieces.

use crate::dataset::Job;
use rand::prelude::*;
use u_guillotine_core::{BboxOptimization, Config, StackingMode};

/// Standard sheet used by the generated jobs.
pub const SHEET_LENGTH: f64 = 2800.0;
/// Standard sheet width used by the generated jobs.
pub const SHEET_WIDTH: f64 = 2070.0;

/// Generator for synthetic cutting lists.
#[derive(Debug, Clone)]
pub struct SyntheticGenerator {
    rng: StdRng,
}

impl SyntheticGenerator {
    /// Creates a new generator with a random seed.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new generator with a specific seed for reproducibility.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn base_config() -> Config {
        Config::new()
            .with_kerf(4.0)
            .with_trimming(10.0)
            .with_base_bin(SHEET_LENGTH, SHEET_WIDTH)
    }

    /// Cabinet parts: a few sizes with large demands, rounded to millimetres.
    pub fn furniture(&mut self, kinds: usize) -> Job {
        let mut job = Job::new("synthetic_furniture", Self::base_config());
        for kind in 0..kinds {
            let length = self.rng.gen_range(200.0_f64..1200.0).round();
            let width = self.rng.gen_range(100.0_f64..600.0).round();
            let quantity = self.rng.gen_range(1..=8);
            job = job.with_pieces(format!("part{}", kind), length, width, quantity);
        }
        job
    }

    /// Pieces sharing a handful of widths, packed with length stacking.
    pub fn strips(&mut self, count: usize) -> Job {
        let widths = [80.0, 120.0, 150.0];
        let config = Self::base_config().with_stacking(StackingMode::AlongLength);
        let mut job = Job::new("synthetic_strips", config);
        for i in 0..count {
            let width = widths[self.rng.gen_range(0..widths.len())];
            let length = self.rng.gen_range(100.0_f64..700.0).round();
            job = job.with_pieces(format!("strip{}", i), length, width, 1);
        }
        job
    }

    /// One sheet recursively cut into pieces with zero kerf.
    ///
    /// Every piece comes from a guillotine dissection, so all of them fit on
    /// a single sheet.
    pub fn dissection(&mut self, splits: usize) -> Job {
        let mut pieces = vec![(SHEET_LENGTH, SHEET_WIDTH)];
        for _ in 0..splits {
            let i = self.rng.gen_range(0..pieces.len());
            let (length, width) = pieces[i];
            let vertical = self.rng.gen_bool(0.5);
            let extent = if vertical { length } else { width };
            if extent < 100.0 {
                continue;
            }
            let at = (extent * self.rng.gen_range(0.2..0.8)).round();
            if vertical {
                pieces[i] = (at, width);
                pieces.push((length - at, width));
            } else {
                pieces[i] = (length, at);
                pieces.push((length, width - at));
            }
        }

        let config = Config::new().with_bbox_optimization(BboxOptimization::Always);
        let mut job = Job::new("synthetic_dissection", config).with_sheets(
            SHEET_LENGTH,
            SHEET_WIDTH,
            1,
        );
        for (i, (length, width)) in pieces.into_iter().enumerate() {
            job = job.with_pieces(format!("cut{}", i), length, width, 1);
        }
        job
    }

    /// Very long thin and very short wide pieces.
    pub fn extreme_aspect(&mut self, count: usize) -> Job {
        let mut job = Job::new("synthetic_extreme_aspect", Self::base_config());
        for i in 0..count {
            let (length, width) = if self.rng.gen_bool(0.5) {
                (
                    self.rng.gen_range(1500.0_f64..2700.0).round(),
                    self.rng.gen_range(20.0_f64..60.0).round(),
                )
            } else {
                (
                    self.rng.gen_range(20.0_f64..60.0).round(),
                    self.rng.gen_range(1000.0_f64..2000.0).round(),
                )
            };
            job = job.with_pieces(format!("thin{}", i), length, width, 1);
        }
        job
    }

    /// Mostly regular pieces plus some that fit no sheet.
    pub fn with_oversized(&mut self, count: usize) -> Job {
        let mut job = self.furniture(count);
        job.name = "synthetic_oversized".to_string();
        let oversized = (count / 4).max(1);
        for i in 0..oversized {
            let length = self.rng.gen_range(SHEET_LENGTH + 1.0..SHEET_LENGTH * 1.5).round();
            job = job.with_pieces(format!("huge{}", i), length, SHEET_WIDTH + 10.0, 1);
        }
        job
    }
}

impl Default for SyntheticGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Predefined synthetic jobs.
pub struct SyntheticJobs;

impl SyntheticJobs {
    /// Generates all standard synthetic jobs.
    pub fn all(seed: u64) -> Vec<Job> {
        let mut gen = SyntheticGenerator::with_seed(seed);
        vec![
            gen.furniture(12),
            gen.strips(40),
            gen.dissection(25),
            gen.extreme_aspect(20),
            gen.with_oversized(8),
        ]
    }

    /// Returns the names of all synthetic jobs.
    pub fn names() -> &'static [&'static str] {
        &[
            "synthetic_furniture",
            "synthetic_strips",
            "synthetic_dissection",
            "synthetic_extreme_aspect",
            "synthetic_oversized",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproducibility() {
        let a = SyntheticGenerator::with_seed(123).furniture(6);
        let b = SyntheticGenerator::with_seed(123).furniture(6);
        assert_eq!(a.boxes, b.boxes);
    }

    #[test]
    fn test_default_generator() {
        let job = SyntheticGenerator::default().strips(8);
        assert!(job.check().is_ok());
        assert!(!job.boxes.is_empty());
    }

    #[test]
    fn test_dissection_area() {
        let job = SyntheticGenerator::with_seed(7).dissection(30);
        let area: f64 = job.boxes.iter().map(|p| p.length * p.width).sum();
        assert!((area - SHEET_LENGTH * SHEET_WIDTH).abs() < 1e-6);
        assert_eq!(job.bins.len(), 1);
    }

    #[test]
    fn test_names_match_jobs() {
        let jobs = SyntheticJobs::all(42);
        let names: Vec<&str> = jobs.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names, SyntheticJobs::names());
        assert!(jobs.iter().all(|j| j.check().is_ok()));
    }

    #[test]
    fn test_oversized_pieces_exceed_sheet() {
        let job = SyntheticGenerator::with_seed(1).with_oversized(8);
        let huge: Vec<_> = job.boxes.iter().filter(|p| p.id.starts_with("huge")).collect();
        assert_eq!(huge.len(), 2);
        assert!(huge.iter().all(|p| p.length > SHEET_LENGTH));
    }
}
