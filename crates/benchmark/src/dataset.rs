//! JSON job format.
//!
//! A job bundles the sheets, the boxes and the packing configuration of one
//! cutting list:
//!
//! ```json
//! {
//!   "name": "kitchen",
//!   "config": { "saw_kerf": 3.0, "trimming": 10.0 },
//!   "bins": [ { "length": 2800.0, "width": 2070.0, "quantity": 2 } ],
//!   "boxes": [ { "id": "door", "length": 716.0, "width": 396.0, "quantity": 4 } ]
//! }
//! ```

use crate::error::BenchError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use u_guillotine_core::{Bin, Box2D, Config};

fn one() -> usize {
    1
}

/// A sheet type with a stock quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetSpec {
    pub length: f64,
    pub width: f64,
    #[serde(default = "one")]
    pub quantity: usize,
}

/// A box type with a demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceSpec {
    pub id: String,
    pub length: f64,
    pub width: f64,
    #[serde(default = "one")]
    pub quantity: usize,
}

/// One cutting list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    #[serde(default)]
    pub config: Config,
    #[serde(default)]
    pub bins: Vec<SheetSpec>,
    pub boxes: Vec<PieceSpec>,
}

impl Job {
    /// Creates an empty job.
    pub fn new(name: impl Into<String>, config: Config) -> Self {
        Self {
            name: name.into(),
            config,
            bins: Vec::new(),
            boxes: Vec::new(),
        }
    }

    /// Adds `quantity` sheets of the given size.
    pub fn with_sheets(mut self, length: f64, width: f64, quantity: usize) -> Self {
        self.bins.push(SheetSpec {
            length,
            width,
            quantity,
        });
        self
    }

    /// Adds `quantity` boxes of the given size.
    pub fn with_pieces(
        mut self,
        id: impl Into<String>,
        length: f64,
        width: f64,
        quantity: usize,
    ) -> Self {
        self.boxes.push(PieceSpec {
            id: id.into(),
            length,
            width,
            quantity,
        });
        self
    }

    /// Loads a job from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BenchError> {
        let content = fs::read_to_string(path)?;
        let job: Job = serde_json::from_str(&content)?;
        job.check()?;
        log::debug!(
            "Loaded job '{}': {} sheet types, {} boxes",
            job.name,
            job.bins.len(),
            job.box_count()
        );
        Ok(job)
    }

    /// Saves the job as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BenchError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Rejects structurally unusable jobs.
    ///
    /// Geometry is left to the engine, which reports it with its own codes.
    pub fn check(&self) -> Result<(), BenchError> {
        let invalid = |reason: String| BenchError::InvalidJob {
            name: self.name.clone(),
            reason,
        };
        let mut seen = std::collections::HashSet::new();
        for piece in &self.boxes {
            if !seen.insert(piece.id.as_str()) {
                return Err(invalid(format!("duplicate box id '{}'", piece.id)));
            }
        }
        if self.boxes.iter().all(|p| p.quantity == 0) {
            return Err(invalid("no boxes requested".to_string()));
        }
        Ok(())
    }

    /// Sheets with quantities expanded.
    pub fn expand_bins(&self) -> Vec<Bin> {
        self.bins
            .iter()
            .flat_map(|s| (0..s.quantity).map(move |_| Bin::new(s.length, s.width)))
            .collect()
    }

    /// Boxes with quantities expanded; copies get `#n` suffixes.
    pub fn expand_boxes(&self) -> Vec<Box2D> {
        let mut boxes = Vec::new();
        for piece in &self.boxes {
            if piece.quantity == 1 {
                boxes.push(Box2D::new(piece.id.clone(), piece.length, piece.width));
                continue;
            }
            for n in 0..piece.quantity {
                boxes.push(Box2D::new(
                    format!("{}#{}", piece.id, n + 1),
                    piece.length,
                    piece.width,
                ));
            }
        }
        boxes
    }

    /// Total number of requested boxes.
    pub fn box_count(&self) -> usize {
        self.boxes.iter().map(|p| p.quantity).sum()
    }
}
