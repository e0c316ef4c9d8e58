//! Rectangular pieces to be cut from stock.

use crate::{Error, Result, EPSILON};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Caller-supplied identity carried through packing untouched.
pub type BoxId = String;

/// A rectangular piece to be placed.
///
/// `length` extends along x and `width` along y once the box is placed.
/// A superbox is a strip of boxes stacked along its length (or, after a
/// [`flip`](Self::flip), along its width) that is placed as one unit and
/// expanded back into its sub-boxes after packing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Box2D {
    /// Caller identity.
    pub id: BoxId,
    /// Extent along x.
    pub length: f64,
    /// Extent along y.
    pub width: f64,
    /// Placed x position.
    pub x: f64,
    /// Placed y position.
    pub y: f64,
    /// Whether the box was rotated by 90 degrees relative to its input.
    pub rotated: bool,
    /// Whether this box is a stack of sub-boxes.
    pub is_superbox: bool,
    /// Stacked boxes, in placement order.
    pub sub_boxes: Vec<Box2D>,
}

impl Box2D {
    /// Creates an unplaced leaf box.
    pub fn new(id: impl Into<BoxId>, length: f64, width: f64) -> Self {
        Self {
            id: id.into(),
            length,
            width,
            x: 0.0,
            y: 0.0,
            rotated: false,
            is_superbox: false,
            sub_boxes: Vec::new(),
        }
    }

    /// Returns the area.
    pub fn area(&self) -> f64 {
        self.length * self.width
    }

    /// Returns the perimeter.
    pub fn perimeter(&self) -> f64 {
        2.0 * (self.length + self.width)
    }

    /// Rotates the box by 90 degrees.
    pub fn rotate(&mut self) {
        std::mem::swap(&mut self.length, &mut self.width);
        self.rotated = !self.rotated;
    }

    /// Swaps length and width without recording a rotation.
    ///
    /// Sub-boxes are flipped along with the superbox so the stack keeps its
    /// geometry consistent.
    pub fn flip(&mut self) {
        std::mem::swap(&mut self.length, &mut self.width);
        for sub in &mut self.sub_boxes {
            sub.flip();
        }
    }

    /// Returns true if the box fits a bin of the given size after `trim` is
    /// removed from every side, rotating it if allowed.
    pub fn fits_into(&self, bin_length: f64, bin_width: f64, trim: f64, rotatable: bool) -> bool {
        let length = bin_length - 2.0 * trim;
        let width = bin_width - 2.0 * trim;
        if length <= 0.0 || width <= 0.0 {
            return false;
        }
        let straight = self.length <= length + EPSILON && self.width <= width + EPSILON;
        let turned = self.width <= length + EPSILON && self.length <= width + EPSILON;
        straight || (rotatable && turned)
    }

    /// Appends `other` to the end of this stack along the length axis.
    ///
    /// Succeeds only if the grown stack stays within `max_length`. A leaf box
    /// becomes a superbox whose first sub-box is a copy of itself. On failure
    /// the box is left unchanged.
    pub fn add_to_stack(&mut self, other: Box2D, kerf: f64, max_length: f64) -> bool {
        debug_assert!((self.width - other.width).abs() <= EPSILON);

        let grown = self.length + kerf + other.length;
        if grown > max_length + EPSILON {
            return false;
        }

        if !self.is_superbox {
            let first = self.clone();
            self.id = BoxId::new();
            self.sub_boxes = vec![first];
            self.is_superbox = true;
        }
        self.length = grown;
        self.sub_boxes.push(other);
        true
    }

    /// Number of leaf boxes represented by this box.
    pub fn leaf_count(&self) -> usize {
        if self.is_superbox {
            self.sub_boxes.iter().map(Box2D::leaf_count).sum()
        } else {
            1
        }
    }

    /// Returns the leaf boxes represented by this box, consuming it.
    pub fn into_leaves(self) -> Vec<Box2D> {
        if self.is_superbox {
            self.sub_boxes
                .into_iter()
                .flat_map(Box2D::into_leaves)
                .collect()
        } else {
            vec![self]
        }
    }

    /// Total owned copy, including every sub-box.
    ///
    /// Runs never share boxes; each one starts from a deep copy of the input.
    pub fn deep_clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            length: self.length,
            width: self.width,
            x: self.x,
            y: self.y,
            rotated: self.rotated,
            is_superbox: self.is_superbox,
            sub_boxes: self.sub_boxes.iter().map(Box2D::deep_clone).collect(),
        }
    }

    /// Returns true if this box overlaps `other` (touching edges do not count).
    pub fn overlaps(&self, other: &Box2D) -> bool {
        self.x + EPSILON < other.x + other.length
            && other.x + EPSILON < self.x + self.length
            && self.y + EPSILON < other.y + other.width
            && other.y + EPSILON < self.y + self.width
    }

    /// Validates the dimensions.
    pub fn validate(&self) -> Result<()> {
        if !(self.length.is_finite() && self.width.is_finite())
            || self.length <= 0.0
            || self.width <= 0.0
        {
            return Err(Error::InvalidGeometry(format!(
                "box '{}' has non-positive size {} x {}",
                self.id, self.length, self.width
            )));
        }
        Ok(())
    }
}
