//! Run reports and recording.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use u_guillotine_core::{Bin, CutOrientation, ErrorCode, Packing, Result as PackResult};

/// Placed box for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementInfo {
    pub box_id: String,
    pub position: [f64; 2],
    pub size: [f64; 2],
    pub rotated: bool,
}

/// Cut for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutInfo {
    pub start: [f64; 2],
    pub length: f64,
    pub horizontal: bool,
    pub primary: bool,
}

/// One used sheet with its layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetLayout {
    pub index: usize,
    pub size: [f64; 2],
    pub placements: Vec<PlacementInfo>,
    pub cuts: Vec<CutInfo>,
    /// Leftovers as `[x, y, length, width]`.
    pub leftovers: Vec<[f64; 4]>,
}

impl From<&Bin> for SheetLayout {
    fn from(bin: &Bin) -> Self {
        Self {
            index: bin.index,
            size: [bin.length, bin.width],
            placements: bin
                .boxes
                .iter()
                .map(|b| PlacementInfo {
                    box_id: b.id.clone(),
                    position: [b.x, b.y],
                    size: [b.length, b.width],
                    rotated: b.rotated,
                })
                .collect(),
            cuts: bin
                .cuts
                .iter()
                .map(|c| CutInfo {
                    start: [c.x, c.y],
                    length: c.length,
                    horizontal: c.orientation == CutOrientation::Horizontal,
                    primary: c.is_primary,
                })
                .collect(),
            leftovers: bin
                .leftovers
                .iter()
                .map(|l| [l.x, l.y, l.length, l.width])
                .collect(),
        }
    }
}

/// Result of running one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Job name
    pub job: String,
    /// Winning heuristic pair, empty on failure
    pub strategy: String,
    /// Outcome code
    pub code: ErrorCode,
    /// Error message, if the run failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub boxes_requested: usize,
    pub boxes_placed: usize,
    pub bins_used: usize,
    /// Placed area over the trimmed area of the used sheets (0.0 - 1.0)
    pub utilization: f64,
    pub leftover_count: usize,
    /// Largest leftover as `[length, width]`
    pub largest_leftover: [f64; 2],
    pub cut_count: usize,
    pub cut_length: f64,
    pub time_ms: u64,
    /// Sheet layouts (optional, for visualization)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Vec<SheetLayout>>,
}

impl RunResult {
    /// Builds the report of one engine outcome.
    pub fn from_outcome(
        job: &str,
        boxes_requested: usize,
        outcome: &PackResult<Packing>,
        time_ms: u64,
    ) -> Self {
        let mut result = Self {
            job: job.to_string(),
            strategy: String::new(),
            code: ErrorCode::from(outcome),
            error: None,
            boxes_requested,
            boxes_placed: 0,
            bins_used: 0,
            utilization: 0.0,
            leftover_count: 0,
            largest_leftover: [0.0, 0.0],
            cut_count: 0,
            cut_length: 0.0,
            time_ms,
            layout: None,
        };

        match outcome {
            Ok(packing) => {
                let perf = &packing.performance;
                result.strategy = packing.strategy_label();
                result.boxes_placed = perf.boxes_packed;
                result.bins_used = perf.bins_used;
                result.utilization = packing.utilization();
                result.leftover_count = perf.leftover_count;
                result.largest_leftover =
                    [perf.largest_leftover_length, perf.largest_leftover_width];
                result.cut_count = packing.cuts().count();
                result.cut_length = packing.total_cut_length();
            }
            Err(e) => result.error = Some(e.to_string()),
        }
        result
    }

    /// Attaches the sheet layouts of `packing`.
    pub fn with_layout(mut self, packing: &Packing) -> Self {
        self.layout = Some(packing.bins.iter().map(SheetLayout::from).collect());
        self
    }
}

/// Collection of run results.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Individual run results
    pub runs: Vec<RunResult>,
    /// Seconds since the Unix epoch when the report was created
    pub timestamp: u64,
    /// Crate version that produced the report
    pub version: String,
}

impl BenchmarkResult {
    /// Creates an empty report stamped with the current time.
    pub fn new() -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self {
            runs: Vec::new(),
            timestamp,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Adds a run result.
    pub fn add_run(&mut self, result: RunResult) {
        self.runs.push(result);
    }

    /// Saves results to a JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Saves results to a CSV file.
    pub fn save_csv(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let mut file = File::create(path)?;

        writeln!(
            file,
            "job,strategy,code,boxes_requested,boxes_placed,bins_used,utilization,leftover_count,largest_leftover_length,largest_leftover_width,cut_count,cut_length,time_ms"
        )?;

        for run in &self.runs {
            writeln!(
                file,
                "{},{},{:?},{},{},{},{:.4},{},{:.2},{:.2},{},{:.2},{}",
                run.job,
                run.strategy,
                run.code,
                run.boxes_requested,
                run.boxes_placed,
                run.bins_used,
                run.utilization,
                run.leftover_count,
                run.largest_leftover[0],
                run.largest_leftover[1],
                run.cut_count,
                run.cut_length,
                run.time_ms,
            )?;
        }

        Ok(())
    }

    /// Prints a summary table to stdout.
    pub fn print_summary(&self) {
        println!("\n{:=<100}", "");
        println!("CUTTING RESULTS");
        println!("{:=<100}", "");
        println!(
            "{:<24} {:<12} {:>8} {:>8} {:>6} {:>8} {:>10} {:>10}",
            "Job", "Strategy", "Placed", "Total", "Bins", "Util%", "Cuts", "Time(ms)"
        );
        println!("{:-<100}", "");

        for run in &self.runs {
            let strategy = if run.error.is_some() {
                format!("{:?}", run.code)
            } else {
                run.strategy.clone()
            };
            println!(
                "{:<24} {:<12} {:>8} {:>8} {:>6} {:>8.1} {:>10} {:>10}",
                run.job,
                strategy,
                run.boxes_placed,
                run.boxes_requested,
                run.bins_used,
                run.utilization * 100.0,
                run.cut_count,
                run.time_ms
            );
        }

        println!("{:=<100}\n", "");
    }
}
