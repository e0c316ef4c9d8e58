//! Stock sheets, offcuts and guillotine splitting.

use crate::box2d::Box2D;
use crate::cut::{Cut, CutOrientation};
use crate::heuristic::SplitHeuristic;
use crate::{Error, Result, EPSILON};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a bin came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinOrigin {
    /// Supplied by the caller.
    #[default]
    UserDefined,
    /// Synthesized from the configured base bin size.
    AutoGenerated,
}

/// A rectangle of material: a full stock sheet or a fragment of one.
///
/// During packing the free fragments of a sheet are themselves `Bin`s that
/// share the sheet's `index`. Placed boxes, cuts and leftovers are recorded
/// on the sheet.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bin {
    /// Extent along x.
    pub length: f64,
    /// Extent along y.
    pub width: f64,
    /// Origin x.
    pub x: f64,
    /// Origin y.
    pub y: f64,
    /// Index of the stock sheet this bin descends from.
    pub index: usize,
    /// How the sheet was obtained.
    pub origin: BinOrigin,
    /// Boxes placed on this sheet.
    pub boxes: Vec<Box2D>,
    /// Cuts made on this sheet.
    pub cuts: Vec<Cut>,
    /// Reusable remainders after packing.
    pub leftovers: Vec<Bin>,
    /// Margin removed from every side.
    pub trim_margin: f64,
    /// Whether position and size currently exclude the margin.
    pub is_trimmed: bool,
}

/// Outcome of a single guillotine split.
#[derive(Debug, Clone)]
pub struct Split {
    /// Piece that keeps the origin corner (the placement target).
    pub kept: Bin,
    /// Remainder on the far side of the cut, if it has any area.
    pub remainder: Option<Bin>,
    /// The cut, unless the split coincides with the bin edge.
    pub cut: Option<Cut>,
}

impl Bin {
    /// Creates a user-defined bin at the origin.
    pub fn new(length: f64, width: f64) -> Self {
        Self {
            length,
            width,
            x: 0.0,
            y: 0.0,
            index: 0,
            origin: BinOrigin::UserDefined,
            boxes: Vec::new(),
            cuts: Vec::new(),
            leftovers: Vec::new(),
            trim_margin: 0.0,
            is_trimmed: false,
        }
    }

    /// Creates an auto-generated bin of the base size.
    pub fn auto_generated(length: f64, width: f64) -> Self {
        Self {
            origin: BinOrigin::AutoGenerated,
            ..Self::new(length, width)
        }
    }

    /// Sets the sheet index.
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Returns the area.
    pub fn area(&self) -> f64 {
        self.length * self.width
    }

    /// The usable rectangle of this sheet.
    ///
    /// A trimmed bin is its own envelope; an untrimmed one (such as a
    /// reported sheet, which carries its original geometry) loses
    /// `trim_margin` on every side.
    pub fn trimmed_envelope(&self) -> Bin {
        if self.is_trimmed {
            return self.fragment(self.x, self.y, self.length, self.width);
        }
        let m = self.trim_margin;
        self.fragment(
            self.x + m,
            self.y + m,
            (self.length - 2.0 * m).max(0.0),
            (self.width - 2.0 * m).max(0.0),
        )
    }

    /// Area available for boxes once the trim margin is removed.
    pub fn trimmed_area(&self) -> f64 {
        self.trimmed_envelope().area()
    }

    /// Fraction of the trimmed area covered by placed boxes.
    pub fn utilization(&self) -> f64 {
        let area = self.trimmed_area();
        if area > 0.0 {
            self.boxes.iter().map(Box2D::area).sum::<f64>() / area
        } else {
            0.0
        }
    }

    /// Removes `margin` from every side.
    ///
    /// Trimming an already trimmed bin does nothing.
    pub fn trim(&mut self, margin: f64) {
        if self.is_trimmed {
            return;
        }
        self.x += margin;
        self.y += margin;
        self.length = (self.length - 2.0 * margin).max(0.0);
        self.width = (self.width - 2.0 * margin).max(0.0);
        self.trim_margin = margin;
        self.is_trimmed = true;
    }

    /// Returns true if the box fits without rotation.
    pub fn encloses(&self, b: &Box2D) -> bool {
        b.length <= self.length + EPSILON && b.width <= self.width + EPSILON
    }

    /// Returns true if the box fits when rotated.
    pub fn encloses_rotated(&self, b: &Box2D) -> bool {
        b.width <= self.length + EPSILON && b.length <= self.width + EPSILON
    }

    /// Returns true if the placed box lies inside this bin.
    pub fn contains(&self, b: &Box2D) -> bool {
        b.x + EPSILON >= self.x
            && b.y + EPSILON >= self.y
            && b.x + b.length <= self.x + self.length + EPSILON
            && b.y + b.width <= self.y + self.width + EPSILON
    }

    /// Returns true if the bin has no usable area.
    pub fn is_degenerate(&self) -> bool {
        self.length <= EPSILON || self.width <= EPSILON
    }

    /// Creates an empty fragment of this sheet.
    pub fn fragment(&self, x: f64, y: f64, length: f64, width: f64) -> Bin {
        Bin {
            length,
            width,
            x,
            y,
            index: self.index,
            origin: self.origin,
            boxes: Vec::new(),
            cuts: Vec::new(),
            leftovers: Vec::new(),
            trim_margin: self.trim_margin,
            is_trimmed: self.is_trimmed,
        }
    }

    /// Splits with a vertical cut at `v` from the left edge.
    ///
    /// The left piece is `v` long; the right remainder starts one kerf
    /// further and is `length - v - kerf` long (never negative).
    pub fn split_vertically(&self, v: f64, kerf: f64) -> Split {
        let kept = self.fragment(self.x, self.y, v, self.width);
        if v >= self.length - EPSILON {
            return Split {
                kept,
                remainder: None,
                cut: None,
            };
        }

        let rest = (self.length - v - kerf).max(0.0);
        let remainder = self.fragment(self.x + v + kerf, self.y, rest, self.width);
        Split {
            kept,
            remainder: (!remainder.is_degenerate()).then_some(remainder),
            cut: Some(Cut::primary(
                self.x + v,
                self.y,
                self.width,
                CutOrientation::Vertical,
                self.index,
            )),
        }
    }

    /// Splits with a horizontal cut at `h` from the top edge.
    ///
    /// Mirror image of [`split_vertically`](Self::split_vertically).
    pub fn split_horizontally(&self, h: f64, kerf: f64) -> Split {
        let kept = self.fragment(self.x, self.y, self.length, h);
        if h >= self.width - EPSILON {
            return Split {
                kept,
                remainder: None,
                cut: None,
            };
        }

        let rest = (self.width - h - kerf).max(0.0);
        let remainder = self.fragment(self.x, self.y + h + kerf, self.length, rest);
        Split {
            kept,
            remainder: (!remainder.is_degenerate()).then_some(remainder),
            cut: Some(Cut::primary(
                self.x,
                self.y + h,
                self.length,
                CutOrientation::Horizontal,
                self.index,
            )),
        }
    }

    /// Decides which cut to make first when `b` is placed in this bin.
    ///
    /// A horizontal first cut leaves the bottom remainder spanning the full
    /// length; a vertical one leaves the right remainder spanning the full
    /// width.
    pub fn split_first_axis(&self, b: &Box2D, heuristic: SplitHeuristic) -> CutOrientation {
        let rest_length = self.length - b.length;
        let rest_width = self.width - b.width;

        let horizontal = match heuristic {
            SplitHeuristic::ShorterLeftoverAxis => rest_length <= rest_width,
            SplitHeuristic::LongerLeftoverAxis => rest_length > rest_width,
            SplitHeuristic::MinimizeArea => b.length * rest_width > rest_length * b.width,
            SplitHeuristic::MaximizeArea => b.length * rest_width <= rest_length * b.width,
            SplitHeuristic::ShorterAxis => self.length <= self.width,
            SplitHeuristic::LongerAxis => self.length > self.width,
        };

        if horizontal {
            CutOrientation::Horizontal
        } else {
            CutOrientation::Vertical
        }
    }

    /// Shrinks this sheet's trailing cuts to the bounding box of its content.
    ///
    /// `fragments` is the free-fragment pool; fragments of this sheet outside
    /// the bounding box are dropped, straddling ones clipped, and the trailing
    /// area is re-cut into at most two fragments. The bottom fragment keeps
    /// the full length unless `next_box` only fits the full-width right
    /// fragment (or, without a hint, the right fragment is larger).
    ///
    /// Returns false if there is nothing to crop.
    pub fn crop_to_bounding_box(
        &mut self,
        fragments: &mut Vec<Bin>,
        kerf: f64,
        next_box: Option<&Box2D>,
    ) -> bool {
        if self.boxes.is_empty() {
            return false;
        }

        let (x0, y0) = (self.x, self.y);
        let right = self
            .boxes
            .iter()
            .map(|b| b.x + b.length)
            .fold(x0, f64::max);
        let bottom = self
            .boxes
            .iter()
            .map(|b| b.y + b.width)
            .fold(y0, f64::max);
        let bb_length = right - x0;
        let bb_width = bottom - y0;

        let full_length = bb_length >= self.length - EPSILON;
        let full_width = bb_width >= self.width - EPSILON;
        if full_length && full_width {
            return false;
        }

        let (mine, mut pool): (Vec<Bin>, Vec<Bin>) =
            fragments.drain(..).partition(|f| f.index == self.index);
        for f in mine {
            let length = (f.x + f.length).min(right) - f.x;
            let width = (f.y + f.width).min(bottom) - f.y;
            if length > EPSILON && width > EPSILON {
                pool.push(self.fragment(f.x, f.y, length, width));
            }
        }

        self.cuts.retain_mut(|cut| match cut.orientation {
            CutOrientation::Vertical => {
                if cut.x >= right - EPSILON || cut.y >= bottom - EPSILON {
                    return false;
                }
                cut.length = cut.length.min(bottom - cut.y);
                true
            }
            CutOrientation::Horizontal => {
                if cut.y >= bottom - EPSILON || cut.x >= right - EPSILON {
                    return false;
                }
                cut.length = cut.length.min(right - cut.x);
                true
            }
        });

        let rest_length = (self.length - bb_length - kerf).max(0.0);
        let rest_width = (self.width - bb_width - kerf).max(0.0);

        let bottom_first = if full_length || full_width {
            true
        } else {
            let fits = |l: f64, w: f64, b: &Box2D| {
                (b.length <= l + EPSILON && b.width <= w + EPSILON)
                    || (b.width <= l + EPSILON && b.length <= w + EPSILON)
            };
            match next_box {
                Some(b) if fits(self.length, rest_width, b) => true,
                Some(b) if fits(rest_length, self.width, b) => false,
                _ => self.length * rest_width >= rest_length * self.width,
            }
        };

        let (bottom_length, right_width) = if bottom_first {
            (self.length, bb_width)
        } else {
            (bb_length, self.width)
        };

        let mut trailing = Vec::with_capacity(2);
        let mut horizontal = None;
        if !full_width {
            horizontal = Some(Cut::primary(
                x0,
                bottom,
                bottom_length,
                CutOrientation::Horizontal,
                self.index,
            ));
            trailing.push(self.fragment(x0, bottom + kerf, bottom_length, rest_width));
        }
        let mut vertical = None;
        if !full_length {
            vertical = Some(Cut::primary(
                right,
                y0,
                right_width,
                CutOrientation::Vertical,
                self.index,
            ));
            trailing.push(self.fragment(right + kerf, y0, rest_length, right_width));
        }

        if bottom_first {
            self.cuts.extend(horizontal.into_iter().chain(vertical));
        } else {
            self.cuts.extend(vertical.into_iter().chain(horizontal));
        }
        pool.extend(trailing.into_iter().filter(|f| !f.is_degenerate()));
        *fragments = pool;
        true
    }

    /// Validates the dimensions.
    pub fn validate(&self) -> Result<()> {
        if !(self.length.is_finite() && self.width.is_finite())
            || self.length <= 0.0
            || self.width <= 0.0
        {
            return Err(Error::InvalidBoundary(format!(
                "bin {} has non-positive size {} x {}",
                self.index, self.length, self.width
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(id: &str, x: f64, y: f64, length: f64, width: f64) -> Box2D {
        let mut b = Box2D::new(id, length, width);
        b.x = x;
        b.y = y;
        b
    }

    #[test]
    fn test_trim() {
        let mut bin = Bin::new(2000.0, 1000.0);
        bin.trim(10.0);
        assert_eq!((bin.x, bin.y), (10.0, 10.0));
        assert_eq!((bin.length, bin.width), (1980.0, 980.0));
        assert!(bin.is_trimmed);

        bin.trim(10.0);
        assert_eq!(bin.length, 1980.0);
        assert_eq!(bin.trimmed_area(), 1980.0 * 980.0);
    }

    #[test]
    fn test_envelope_of_untrimmed_sheet() {
        let mut sheet = Bin::new(100.0, 50.0);
        sheet.trim_margin = 5.0;
        let env = sheet.trimmed_envelope();
        assert_eq!((env.x, env.y, env.length, env.width), (5.0, 5.0, 90.0, 40.0));
        assert_eq!(sheet.trimmed_area(), 3600.0);
    }

    #[test]
    fn test_encloses() {
        let bin = Bin::new(100.0, 50.0);
        let b = Box2D::new("a", 40.0, 60.0);
        assert!(!bin.encloses(&b));
        assert!(bin.encloses_rotated(&b));
        assert!(bin.encloses(&Box2D::new("b", 100.0, 50.0)));
    }

    #[test]
    fn test_split_vertically() {
        let bin = Bin::new(100.0, 50.0).with_index(3);
        let split = bin.split_vertically(30.0, 2.0);
        assert_eq!((split.kept.length, split.kept.width), (30.0, 50.0));

        let rest = split.remainder.unwrap();
        assert_eq!((rest.x, rest.length, rest.width), (32.0, 68.0, 50.0));
        assert_eq!(rest.index, 3);

        let cut = split.cut.unwrap();
        assert_eq!(cut.orientation, CutOrientation::Vertical);
        assert_eq!((cut.x, cut.y, cut.length), (30.0, 0.0, 50.0));
        assert!(cut.is_primary);
    }

    #[test]
    fn test_split_horizontally_is_symmetric() {
        let bin = Bin::new(50.0, 100.0);
        let split = bin.split_horizontally(30.0, 2.0);
        assert_eq!((split.kept.length, split.kept.width), (50.0, 30.0));
        let rest = split.remainder.unwrap();
        assert_eq!((rest.y, rest.length, rest.width), (32.0, 50.0, 68.0));
        let cut = split.cut.unwrap();
        assert_eq!(cut.orientation, CutOrientation::Horizontal);
        assert_eq!((cut.x, cut.y, cut.length), (0.0, 30.0, 50.0));
    }

    #[test]
    fn test_split_at_edge_has_no_cut() {
        let bin = Bin::new(100.0, 50.0);
        let split = bin.split_vertically(100.0, 3.0);
        assert!(split.remainder.is_none());
        assert!(split.cut.is_none());
    }

    #[test]
    fn test_split_narrower_than_kerf() {
        let bin = Bin::new(100.0, 50.0);
        let split = bin.split_vertically(99.0, 3.0);
        assert!(split.remainder.is_none());
        assert!(split.cut.is_some());
    }

    #[test]
    fn test_split_first_axis() {
        let bin = Bin::new(1000.0, 500.0);
        // rest length 600, rest width 400
        let b = Box2D::new("a", 400.0, 100.0);

        assert_eq!(
            bin.split_first_axis(&b, SplitHeuristic::ShorterLeftoverAxis),
            CutOrientation::Vertical
        );
        assert_eq!(
            bin.split_first_axis(&b, SplitHeuristic::LongerLeftoverAxis),
            CutOrientation::Horizontal
        );
        // 400 * 400 = 160000 > 600 * 100 = 60000
        assert_eq!(
            bin.split_first_axis(&b, SplitHeuristic::MinimizeArea),
            CutOrientation::Horizontal
        );
        assert_eq!(
            bin.split_first_axis(&b, SplitHeuristic::MaximizeArea),
            CutOrientation::Vertical
        );
        assert_eq!(
            bin.split_first_axis(&b, SplitHeuristic::ShorterAxis),
            CutOrientation::Vertical
        );
        assert_eq!(
            bin.split_first_axis(&b, SplitHeuristic::LongerAxis),
            CutOrientation::Horizontal
        );
    }

    #[test]
    fn test_crop_to_bounding_box() {
        // One box placed with a vertical first cut: full-width cut at x=300.
        let mut sheet = Bin::new(1000.0, 800.0);
        sheet.boxes.push(placed("a", 0.0, 0.0, 300.0, 200.0));
        sheet
            .cuts
            .push(Cut::primary(300.0, 0.0, 800.0, CutOrientation::Vertical, 0));
        sheet
            .cuts
            .push(Cut::primary(0.0, 200.0, 300.0, CutOrientation::Horizontal, 0));
        let mut fragments = vec![
            sheet.fragment(300.0, 0.0, 700.0, 800.0),
            sheet.fragment(0.0, 200.0, 300.0, 600.0),
        ];

        assert!(sheet.crop_to_bounding_box(&mut fragments, 0.0, None));

        // Bottom strip 1000 x 600 is larger than right strip 700 x 800.
        assert_eq!(fragments.len(), 2);
        let bottom = fragments.iter().find(|f| f.y == 200.0).unwrap();
        assert_eq!((bottom.x, bottom.length, bottom.width), (0.0, 1000.0, 600.0));
        let right = fragments.iter().find(|f| f.x == 300.0).unwrap();
        assert_eq!((right.length, right.width), (700.0, 200.0));

        assert_eq!(sheet.cuts.len(), 2);
        let h = sheet.cuts.iter().find(|c| c.is_horizontal()).unwrap();
        assert_eq!(h.length, 1000.0);
        let v = sheet.cuts.iter().find(|c| !c.is_horizontal()).unwrap();
        assert_eq!(v.length, 200.0);
    }

    #[test]
    fn test_crop_prefers_layout_fitting_next_box() {
        let mut sheet = Bin::new(1000.0, 500.0);
        sheet.boxes.push(placed("a", 0.0, 0.0, 300.0, 200.0));
        let mut fragments = vec![
            sheet.fragment(300.0, 0.0, 700.0, 500.0),
            sheet.fragment(0.0, 200.0, 300.0, 300.0),
        ];

        // 650 x 450 fits only the full-width right fragment (700 x 500).
        let next = Box2D::new("n", 650.0, 450.0);
        assert!(sheet.crop_to_bounding_box(&mut fragments, 0.0, Some(&next)));
        assert!(fragments
            .iter()
            .any(|f| f.x == 300.0 && f.length == 700.0 && f.width == 500.0));
    }

    #[test]
    fn test_crop_full_sheet_is_noop() {
        let mut sheet = Bin::new(100.0, 100.0);
        sheet.boxes.push(placed("a", 0.0, 0.0, 100.0, 100.0));
        let mut fragments = Vec::new();
        assert!(!sheet.crop_to_bounding_box(&mut fragments, 0.0, None));
        assert!(!Bin::new(10.0, 10.0).crop_to_bounding_box(&mut fragments, 0.0, None));
    }

    #[test]
    fn test_crop_keeps_other_sheets() {
        let mut sheet = Bin::new(100.0, 100.0);
        sheet.boxes.push(placed("a", 0.0, 0.0, 50.0, 50.0));
        let other = Bin::new(80.0, 80.0).with_index(1);
        let mut fragments = vec![other.clone()];
        assert!(sheet.crop_to_bounding_box(&mut fragments, 0.0, None));
        assert!(fragments.contains(&other));
    }

    #[test]
    fn test_validate() {
        assert!(Bin::new(10.0, 10.0).validate().is_ok());
        assert!(Bin::new(-1.0, 10.0).validate().is_err());
    }
}
