//! Built-in acceptance scenarios.
//!
//! Each scenario pairs a small job with the outcome the engine must produce.

use crate::dataset::Job;
use serde::{Deserialize, Serialize};
use u_guillotine_core::{Config, ErrorCode, Packing, Result as PackResult, StackingMode};

/// An acceptance scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique scenario ID (e.g., "A")
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// What this scenario checks
    pub purpose: String,
    /// Job to run
    pub job: Job,
    /// Success criteria
    pub criteria: SuccessCriteria,
}

/// Success criteria for a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessCriteria {
    /// Expected outcome code
    pub code: ErrorCode,
    /// Exact number of placed boxes
    #[serde(default)]
    pub placed: Option<usize>,
    /// Exact number of unplaced boxes
    #[serde(default)]
    pub unplaced: Option<usize>,
    /// Maximum number of sheets used
    #[serde(default)]
    pub max_bins: Option<usize>,
    /// Minimum number of leftovers
    #[serde(default)]
    pub min_leftovers: Option<usize>,
    /// Exact number of secondary (stack-separating) cuts
    #[serde(default)]
    pub secondary_cuts: Option<usize>,
}

impl SuccessCriteria {
    /// Criteria expecting the given code and nothing else.
    pub fn code(code: ErrorCode) -> Self {
        Self {
            code,
            placed: None,
            unplaced: None,
            max_bins: None,
            min_leftovers: None,
            secondary_cuts: None,
        }
    }
}

/// Result of evaluating a single criterion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriterionResult {
    pub criterion: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
}

impl CriterionResult {
    fn check<T: PartialEq + std::fmt::Debug>(criterion: &str, expected: T, actual: T) -> Self {
        Self {
            criterion: criterion.to_string(),
            passed: expected == actual,
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }

    fn at_most(criterion: &str, limit: usize, actual: usize) -> Self {
        Self {
            criterion: criterion.to_string(),
            passed: actual <= limit,
            expected: format!("<= {}", limit),
            actual: actual.to_string(),
        }
    }

    fn at_least(criterion: &str, limit: usize, actual: usize) -> Self {
        Self {
            criterion: criterion.to_string(),
            passed: actual >= limit,
            expected: format!(">= {}", limit),
            actual: actual.to_string(),
        }
    }
}

/// Result of running a single scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Scenario ID
    pub scenario_id: String,
    /// Whether all criteria were met
    pub passed: bool,
    /// Criteria evaluation
    pub criteria_results: Vec<CriterionResult>,
    /// Execution time in milliseconds
    pub time_ms: u64,
}

impl Scenario {
    /// Evaluates an engine outcome against the criteria.
    pub fn evaluate(&self, outcome: &PackResult<Packing>) -> Vec<CriterionResult> {
        let c = &self.criteria;
        let mut results = vec![CriterionResult::check(
            "code",
            c.code,
            ErrorCode::from(outcome),
        )];

        let Ok(packing) = outcome else {
            return results;
        };
        if let Some(placed) = c.placed {
            results.push(CriterionResult::check(
                "placed",
                placed,
                packing.placed_count(),
            ));
        }
        if let Some(unplaced) = c.unplaced {
            results.push(CriterionResult::check(
                "unplaced",
                unplaced,
                packing.unplaced_count(),
            ));
        }
        if let Some(max_bins) = c.max_bins {
            results.push(CriterionResult::at_most(
                "bins_used",
                max_bins,
                packing.performance.bins_used,
            ));
        }
        if let Some(min_leftovers) = c.min_leftovers {
            results.push(CriterionResult::at_least(
                "leftovers",
                min_leftovers,
                packing.performance.leftover_count,
            ));
        }
        if let Some(secondary) = c.secondary_cuts {
            let actual = packing.cuts().filter(|cut| !cut.is_primary).count();
            results.push(CriterionResult::check("secondary_cuts", secondary, actual));
        }
        results
    }
}

/// The built-in scenarios A to D.
pub fn builtin_scenarios() -> Vec<Scenario> {
    let stack_job = [300.0, 250.0, 200.0, 150.0, 100.0].iter().enumerate().fold(
        Job::new(
            "scenario_c",
            Config::new()
                .with_kerf(4.0)
                .with_base_bin(2000.0, 1000.0)
                .with_stacking(StackingMode::AlongLength),
        ),
        |job, (i, &length)| job.with_pieces(format!("s{}", i), length, 100.0, 1),
    );

    vec![
        Scenario {
            id: "A".to_string(),
            name: "Single sheet".to_string(),
            purpose: "Five equal panels fit one sheet with leftovers".to_string(),
            job: Job::new("scenario_a", Config::new().with_kerf(3.0))
                .with_sheets(2000.0, 1000.0, 1)
                .with_pieces("panel", 400.0, 300.0, 5),
            criteria: SuccessCriteria {
                placed: Some(5),
                unplaced: Some(0),
                max_bins: Some(1),
                min_leftovers: Some(1),
                ..SuccessCriteria::code(ErrorCode::None)
            },
        },
        Scenario {
            id: "B".to_string(),
            name: "Oversized pieces".to_string(),
            purpose: "Pieces larger than the base sheet are reported unplaced".to_string(),
            job: Job::new(
                "scenario_b",
                Config::new().with_kerf(4.0).with_base_bin(1000.0, 1000.0),
            )
            .with_pieces("beam", 1200.0, 200.0, 3)
            .with_pieces("block", 100.0, 100.0, 1),
            criteria: SuccessCriteria {
                placed: Some(1),
                unplaced: Some(3),
                ..SuccessCriteria::code(ErrorCode::None)
            },
        },
        Scenario {
            id: "B2".to_string(),
            name: "Only oversized pieces".to_string(),
            purpose: "No run places anything".to_string(),
            job: Job::new(
                "scenario_b2",
                Config::new().with_kerf(4.0).with_base_bin(1000.0, 1000.0),
            )
            .with_pieces("beam", 1200.0, 200.0, 3),
            criteria: SuccessCriteria::code(ErrorCode::NoPlacementPossible),
        },
        Scenario {
            id: "C".to_string(),
            name: "Length stacking".to_string(),
            purpose: "Equal-width pieces are cut as one strip".to_string(),
            job: stack_job,
            criteria: SuccessCriteria {
                placed: Some(5),
                max_bins: Some(1),
                secondary_cuts: Some(4),
                ..SuccessCriteria::code(ErrorCode::None)
            },
        },
        Scenario {
            id: "D".to_string(),
            name: "No sheet".to_string(),
            purpose: "Neither sheets nor a base size are given".to_string(),
            job: Job::new("scenario_d", Config::new()).with_pieces("any", 100.0, 100.0, 2),
            criteria: SuccessCriteria::code(ErrorCode::NoBin),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use u_guillotine_core::{Error, ScoreHeuristic, SplitHeuristic};

    #[test]
    fn test_builtin_ids_unique() {
        let scenarios = builtin_scenarios();
        let mut ids: Vec<&str> = scenarios.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), scenarios.len());
        assert!(scenarios.iter().all(|s| s.job.check().is_ok()));
    }

    #[test]
    fn test_evaluate_error_outcome() {
        let scenario = builtin_scenarios()
            .into_iter()
            .find(|s| s.id == "D")
            .unwrap();
        let results = scenario.evaluate(&Err(Error::NoBin));
        assert_eq!(results.len(), 1);
        assert!(results[0].passed);

        let results = scenario.evaluate(&Err(Error::NoPlacementPossible));
        assert!(!results[0].passed);
    }

    #[test]
    fn test_evaluate_counts() {
        let scenario = builtin_scenarios()
            .into_iter()
            .find(|s| s.id == "A")
            .unwrap();
        let packing = Packing::new(ScoreHeuristic::BestAreaFit, SplitHeuristic::ShorterAxis);
        let results = scenario.evaluate(&Ok(packing));
        let failed: Vec<&str> = results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| r.criterion.as_str())
            .collect();
        assert_eq!(failed, vec!["placed", "leftovers"]);
    }
}
