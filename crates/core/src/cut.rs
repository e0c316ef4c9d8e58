//! Guillotine cut records.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Direction of a cut line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CutOrientation {
    /// Constant y, runs along x.
    Horizontal,
    /// Constant x, runs along y.
    Vertical,
}

/// One guillotine cut segment.
///
/// The saw kerf occupies `[x, x + kerf)` for vertical cuts and
/// `[y, y + kerf)` for horizontal ones.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cut {
    /// Start x.
    pub x: f64,
    /// Start y.
    pub y: f64,
    /// Extent along the cut direction.
    pub length: f64,
    /// Cut direction.
    pub orientation: CutOrientation,
    /// Full separating cut (`true`) or a cut between stacked boxes.
    pub is_primary: bool,
    /// Index of the stock sheet this cut belongs to.
    pub bin_index: usize,
}

impl Cut {
    /// Creates a primary cut.
    pub fn primary(
        x: f64,
        y: f64,
        length: f64,
        orientation: CutOrientation,
        bin_index: usize,
    ) -> Self {
        Self {
            x,
            y,
            length,
            orientation,
            is_primary: true,
            bin_index,
        }
    }

    /// Creates a secondary cut separating two stacked boxes.
    pub fn secondary(
        x: f64,
        y: f64,
        length: f64,
        orientation: CutOrientation,
        bin_index: usize,
    ) -> Self {
        Self {
            is_primary: false,
            ..Self::primary(x, y, length, orientation, bin_index)
        }
    }

    /// Returns true for a horizontal cut.
    pub fn is_horizontal(&self) -> bool {
        self.orientation == CutOrientation::Horizontal
    }

    /// End point of the cut line.
    pub fn end(&self) -> (f64, f64) {
        match self.orientation {
            CutOrientation::Horizontal => (self.x + self.length, self.y),
            CutOrientation::Vertical => (self.x, self.y + self.length),
        }
    }
}
