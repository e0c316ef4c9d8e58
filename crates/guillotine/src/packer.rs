//! Single-run guillotine packer.
//!
//! A [`Packer`] places boxes for one (score, split) heuristic pair. Every
//! placement takes a whole free fragment, carves the box out of its top-left
//! corner with two edge-to-edge cuts and returns the remainders to the pool.
//!
//! Boxes that do not fit any fragment trigger, in order: reclaiming trailing
//! space by cropping used sheets to their content, breaking a superbox back
//! into its boxes, and opening a fresh sheet of the base size.

use crate::score::{find_best_bin, BinChoice};
use crate::supergroup::{build_superboxes, expand_superbox};
use u_guillotine_core::{
    Bin, Box2D, Config, CutOrientation, Error, Packing, Performance, PresortStrategy, Result,
    ScoreHeuristic, SplitHeuristic, EPSILON,
};

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Packs boxes with one heuristic pair.
///
/// A packer is single-use: [`pack`](Packer::pack) consumes it.
pub struct Packer {
    config: Config,
    score_heuristic: ScoreHeuristic,
    split_heuristic: SplitHeuristic,
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,

    /// Trimmed sheets, indexed by `Bin::index`. Placed boxes and cuts are
    /// recorded here.
    sheets: Vec<Bin>,
    /// Untrimmed copies of `sheets`, used for the reported geometry.
    originals: Vec<Bin>,
    /// Free fragments of every sheet.
    free: Vec<Bin>,
    queue: VecDeque<Box2D>,
    unplaced: Vec<Box2D>,
}

impl Packer {
    /// Creates a packer for the given heuristic pair.
    pub fn new(
        config: Config,
        score_heuristic: ScoreHeuristic,
        split_heuristic: SplitHeuristic,
    ) -> Self {
        Self {
            config,
            score_heuristic,
            split_heuristic,
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: None,
            sheets: Vec::new(),
            originals: Vec::new(),
            free: Vec::new(),
            queue: VecDeque::new(),
            unplaced: Vec::new(),
        }
    }

    /// Shares a cancellation flag with the caller.
    pub fn with_cancel_flag(mut self, cancelled: Arc<AtomicBool>) -> Self {
        self.cancelled = cancelled;
        self
    }

    /// Aborts the run with [`Error::Timeout`] once `deadline` passes.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Packs `boxes` into `bins` and, if configured, auto-generated sheets.
    ///
    /// Only sheets holding at least one box are reported, with their
    /// original untrimmed geometry.
    pub fn pack(mut self, bins: Vec<Bin>, boxes: Vec<Box2D>) -> Result<Packing> {
        let start = Instant::now();
        let requested: usize = boxes.iter().map(Box2D::leaf_count).sum();
        self.check_interrupted()?;

        self.prepare_bins(bins);
        let feasible = self.filter_infeasible(boxes);
        let mut pending = if self.config.stacking.is_enabled() {
            self.stack(feasible)
        } else {
            feasible
        };
        presort(&mut pending, self.config.presort);
        self.queue = pending.into();

        self.place_all()?;

        if self.config.stacking.is_enabled() {
            self.expand_superboxes();
        }
        if self.config.bbox_optimization.is_enabled() {
            self.crop_used_sheets();
        }

        let mut packing = self.finish(requested)?;
        packing.computation_time_ms = start.elapsed().as_millis() as u64;
        Ok(packing)
    }

    fn check_interrupted(&self) -> Result<()> {
        if self.cancelled.load(Ordering::Relaxed) {
            return Err(Error::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(Error::Timeout(self.config.time_limit_ms));
            }
        }
        Ok(())
    }

    /// Indexes and trims the supplied sheets, adding one base sheet if none
    /// were given.
    fn prepare_bins(&mut self, mut bins: Vec<Bin>) {
        if bins.is_empty() && self.config.has_base_bin() {
            bins.push(Bin::auto_generated(
                self.config.base_bin_length,
                self.config.base_bin_width,
            ));
        }
        for bin in bins {
            self.add_sheet(bin);
        }
    }

    fn add_sheet(&mut self, bin: Bin) -> usize {
        let index = self.sheets.len();
        let original = Bin {
            index,
            boxes: Vec::new(),
            cuts: Vec::new(),
            leftovers: Vec::new(),
            trim_margin: 0.0,
            is_trimmed: false,
            ..bin
        };

        let mut sheet = original.clone();
        sheet.trim(self.config.trimming);
        if sheet.is_degenerate() {
            log::warn!(
                "Sheet {} ({} x {}) has no usable area after trimming {}",
                index,
                original.length,
                original.width,
                self.config.trimming
            );
        } else {
            self.free
                .push(sheet.fragment(sheet.x, sheet.y, sheet.length, sheet.width));
        }

        self.originals.push(original);
        self.sheets.push(sheet);
        index
    }

    fn fits_base_bin(&self, b: &Box2D) -> bool {
        self.config.has_base_bin()
            && b.fits_into(
                self.config.base_bin_length,
                self.config.base_bin_width,
                self.config.trimming,
                self.config.rotatable,
            )
    }

    /// Moves boxes that fit no sheet at all straight to `unplaced`.
    fn filter_infeasible(&mut self, boxes: Vec<Box2D>) -> Vec<Box2D> {
        let (trim, rotatable) = (self.config.trimming, self.config.rotatable);
        let mut feasible = Vec::with_capacity(boxes.len());
        for b in boxes {
            let fits_sheet = self
                .originals
                .iter()
                .any(|o| b.fits_into(o.length, o.width, trim, rotatable));
            if fits_sheet || self.fits_base_bin(&b) {
                feasible.push(b);
            } else {
                log::debug!("Box '{}' ({} x {}) fits no sheet", b.id, b.length, b.width);
                self.unplaced.extend(b.into_leaves());
            }
        }
        feasible
    }

    fn stack(&self, boxes: Vec<Box2D>) -> Vec<Box2D> {
        let mut sizes: Vec<(f64, f64)> = self.sheets.iter().map(|s| (s.length, s.width)).collect();
        if self.config.has_base_bin() {
            let mut base =
                Bin::auto_generated(self.config.base_bin_length, self.config.base_bin_width);
            base.trim(self.config.trimming);
            sizes.push((base.length, base.width));
        }
        build_superboxes(
            boxes,
            self.config.stacking,
            self.config.saw_kerf,
            &sizes,
            self.config.rotatable,
        )
    }

    fn best_fragment(&self, b: &Box2D) -> Option<BinChoice> {
        find_best_bin(b, &self.free, self.config.rotatable, self.score_heuristic)
    }

    fn place_all(&mut self) -> Result<()> {
        while let Some(b) = self.queue.pop_front() {
            self.check_interrupted()?;

            if let Some(choice) = self.best_fragment(&b) {
                self.place(b, choice)?;
                continue;
            }

            if self.config.bbox_optimization.is_enabled() && self.reclaim(&b) {
                if let Some(choice) = self.best_fragment(&b) {
                    self.place(b, choice)?;
                    continue;
                }
            }

            if b.is_superbox && self.config.break_stacking_if_needed {
                log::debug!(
                    "Breaking superbox of {} boxes ({} x {})",
                    b.sub_boxes.len(),
                    b.length,
                    b.width
                );
                for sub in b.sub_boxes.into_iter().rev() {
                    self.queue.push_front(sub);
                }
                continue;
            }

            if self.fits_base_bin(&b) {
                let index = self.add_sheet(Bin::auto_generated(
                    self.config.base_bin_length,
                    self.config.base_bin_width,
                ));
                log::debug!("Opened base sheet {}", index);
                let choice = self.best_fragment(&b).ok_or_else(|| {
                    Error::Internal(format!("box '{}' does not fit a fresh base sheet", b.id))
                })?;
                self.place(b, choice)?;
                continue;
            }

            self.unplaced.extend(b.into_leaves());
        }
        Ok(())
    }

    /// Places `b` in the chosen fragment and splits off the remainders.
    fn place(&mut self, mut b: Box2D, choice: BinChoice) -> Result<()> {
        if choice.bin_index >= self.free.len() {
            return Err(Error::Internal(format!(
                "fragment {} out of range",
                choice.bin_index
            )));
        }
        let fragment = self.free.remove(choice.bin_index);
        if choice.rotated {
            b.rotate();
        }
        b.x = fragment.x;
        b.y = fragment.y;

        let kerf = self.config.saw_kerf;
        let (first, second) = match fragment.split_first_axis(&b, self.split_heuristic) {
            CutOrientation::Vertical => {
                let first = fragment.split_vertically(b.length, kerf);
                let second = first.kept.split_horizontally(b.width, kerf);
                (first, second)
            }
            CutOrientation::Horizontal => {
                let first = fragment.split_horizontally(b.width, kerf);
                let second = first.kept.split_vertically(b.length, kerf);
                (first, second)
            }
        };

        let sheet = self
            .sheets
            .get_mut(fragment.index)
            .ok_or_else(|| Error::Internal(format!("no sheet {}", fragment.index)))?;
        for split in [first, second] {
            sheet.cuts.extend(split.cut);
            self.free.extend(split.remainder);
        }
        sheet.boxes.push(b);
        Ok(())
    }

    /// Crops every used sheet to its content, using `hint` to orient the
    /// trailing fragments. Returns true if any sheet changed.
    fn reclaim(&mut self, hint: &Box2D) -> bool {
        let kerf = self.config.saw_kerf;
        let mut changed = false;
        for sheet in &mut self.sheets {
            changed |= sheet.crop_to_bounding_box(&mut self.free, kerf, Some(hint));
        }
        changed
    }

    fn crop_used_sheets(&mut self) {
        let kerf = self.config.saw_kerf;
        for sheet in &mut self.sheets {
            sheet.crop_to_bounding_box(&mut self.free, kerf, None);
        }
    }

    fn expand_superboxes(&mut self) {
        let (mode, kerf) = (self.config.stacking, self.config.saw_kerf);
        for sheet in &mut self.sheets {
            for b in std::mem::take(&mut sheet.boxes) {
                let (boxes, cuts) = expand_superbox(b, mode, kerf, sheet.index);
                sheet.boxes.extend(boxes);
                sheet.cuts.extend(cuts);
            }
        }
    }

    /// Assigns leftovers and assembles the result.
    fn finish(self, requested: usize) -> Result<Packing> {
        let Packer {
            config,
            score_heuristic,
            split_heuristic,
            mut sheets,
            originals,
            free,
            unplaced,
            ..
        } = self;

        let kerf = config.saw_kerf;
        for fragment in free {
            let usable = fragment.length + EPSILON >= kerf
                && fragment.width + EPSILON >= kerf
                && !fragment.is_degenerate();
            if !usable {
                continue;
            }
            let sheet = sheets
                .get_mut(fragment.index)
                .ok_or_else(|| Error::Internal(format!("leftover of missing sheet {}", fragment.index)))?;
            sheet.leftovers.push(fragment);
        }

        let bins: Vec<Bin> = sheets
            .into_iter()
            .zip(originals)
            .filter(|(sheet, _)| !sheet.boxes.is_empty())
            .map(|(sheet, original)| Bin {
                boxes: sheet.boxes,
                cuts: sheet.cuts,
                leftovers: sheet.leftovers,
                trim_margin: sheet.trim_margin,
                is_trimmed: false,
                ..original
            })
            .collect();

        let performance = Performance::from_bins(&bins);
        let accounted = performance.boxes_packed + unplaced.len();
        if accounted != requested {
            return Err(Error::Internal(format!(
                "{} boxes requested but {} accounted for",
                requested, accounted
            )));
        }

        let mut packing = Packing::new(score_heuristic, split_heuristic);
        packing.bins = bins;
        packing.unplaced = unplaced;
        packing.performance = performance;
        Ok(packing)
    }
}

/// Stable descending sort by the configured key.
fn presort(boxes: &mut [Box2D], strategy: PresortStrategy) {
    match strategy {
        PresortStrategy::None => {}
        PresortStrategy::WidthDesc => boxes.sort_by(|a, b| b.width.total_cmp(&a.width)),
        PresortStrategy::LengthDesc => boxes.sort_by(|a, b| b.length.total_cmp(&a.length)),
        PresortStrategy::AreaDesc => boxes.sort_by(|a, b| b.area().total_cmp(&a.area())),
        PresortStrategy::PerimeterDesc => {
            boxes.sort_by(|a, b| b.perimeter().total_cmp(&a.perimeter()))
        }
    }
}
