//! Grading configuration.
//!
//! [`GraderConfig`] is the on-disk (JSON) configuration consumed by the analysis and grading
//! pipeline. Every field carries a serde default, so an empty `{}` document is a valid
//! configuration equal to [`GraderConfig::default_config`].
//!
//! ```json
//! {
//!   "analysis": { "rounds": [{ "round": 1, "name": "Round 1", "expected_tasks": 6 }] },
//!   "grading":  { "total_tasks": 18, "min_seconds_per_task": 3.0, "max_seconds_per_task": 600.0,
//!                 "target_exponent": -0.3, "min_r_squared": 0.15 },
//!   "weights":  { "completion": 0.2, "learning_curve": 0.25, "efficiency": 0.2,
//!                 "improvement": 0.15, "time_performance": 0.2 }
//! }
//! ```
//!
//! Misconfiguration (weights that do not sum to one, inverted time thresholds, a zero task
//! count) is a programming mistake rather than a data condition, so [`GraderConfig::validate`]
//! rejects it outright instead of trying to recover.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use validator::{Validate, ValidationError};

use crate::validation::format_validation_errors;

/// Upper bound of the R² interpolation band used by the learning-curve criterion.
pub const R_SQUARED_CEILING: f64 = 0.7;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// A logical grouping of tasks and how many tasks it is expected to contain.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Validate)]
pub struct RoundDefinition {
    #[validate(range(min = 1, message = "round numbers start at 1"))]
    pub round: u32,

    #[serde(default)]
    pub name: String,

    #[validate(range(min = 1, message = "a round must expect at least one task"))]
    pub expected_tasks: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisOptions {
    #[serde(default = "default_rounds")]
    pub rounds: Vec<RoundDefinition>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
        }
    }
}

/// Thresholds used by the grading criteria.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[validate(schema(function = "validate_grading_thresholds"))]
pub struct GradingOptions {
    /// Number of tasks in a complete session.
    #[serde(default = "default_total_tasks")]
    #[validate(range(min = 1, message = "total_tasks must be at least 1"))]
    pub total_tasks: u32,

    /// Tasks solved faster than this are treated as suspicious.
    #[serde(default = "default_min_seconds_per_task")]
    pub min_seconds_per_task: f64,

    /// Tasks slower than this are reported as very slow.
    #[serde(default = "default_max_seconds_per_task")]
    pub max_seconds_per_task: f64,

    /// Learning-curve exponent that earns the full exponent sub-score. Must be negative.
    #[serde(default = "default_target_exponent")]
    pub target_exponent: f64,

    /// R² below which the fit sub-score is zero.
    #[serde(default = "default_min_r_squared")]
    pub min_r_squared: f64,
}

impl Default for GradingOptions {
    fn default() -> Self {
        Self {
            total_tasks: default_total_tasks(),
            min_seconds_per_task: default_min_seconds_per_task(),
            max_seconds_per_task: default_max_seconds_per_task(),
            target_exponent: default_target_exponent(),
            min_r_squared: default_min_r_squared(),
        }
    }
}

/// Relative weight of each grading criterion. Must sum to 1.0.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[validate(schema(function = "validate_weight_sum"))]
pub struct CriterionWeights {
    #[serde(default = "default_completion_weight")]
    #[validate(range(min = 0.0, max = 1.0, message = "completion weight must be within [0, 1]"))]
    pub completion: f64,

    #[serde(default = "default_learning_curve_weight")]
    #[validate(range(min = 0.0, max = 1.0, message = "learning_curve weight must be within [0, 1]"))]
    pub learning_curve: f64,

    #[serde(default = "default_efficiency_weight")]
    #[validate(range(min = 0.0, max = 1.0, message = "efficiency weight must be within [0, 1]"))]
    pub efficiency: f64,

    #[serde(default = "default_improvement_weight")]
    #[validate(range(min = 0.0, max = 1.0, message = "improvement weight must be within [0, 1]"))]
    pub improvement: f64,

    #[serde(default = "default_time_performance_weight")]
    #[validate(range(min = 0.0, max = 1.0, message = "time_performance weight must be within [0, 1]"))]
    pub time_performance: f64,
}

impl CriterionWeights {
    pub fn sum(&self) -> f64 {
        self.completion
            + self.learning_curve
            + self.efficiency
            + self.improvement
            + self.time_performance
    }
}

impl Default for CriterionWeights {
    fn default() -> Self {
        Self {
            completion: default_completion_weight(),
            learning_curve: default_learning_curve_weight(),
            efficiency: default_efficiency_weight(),
            improvement: default_improvement_weight(),
            time_performance: default_time_performance_weight(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GraderConfig {
    #[serde(default)]
    pub analysis: AnalysisOptions,

    #[serde(default)]
    pub grading: GradingOptions,

    #[serde(default)]
    pub weights: CriterionWeights,
}

impl GraderConfig {
    pub fn default_config() -> Self {
        GraderConfig {
            analysis: AnalysisOptions::default(),
            grading: GradingOptions::default(),
            weights: CriterionWeights::default(),
        }
    }

    /// Checks every section and returns all violated rules joined by `"; "`.
    pub fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();

        if let Err(e) = self.grading.validate() {
            problems.push(format_validation_errors(&e));
        }
        if let Err(e) = self.weights.validate() {
            problems.push(format_validation_errors(&e));
        }
        for round in &self.analysis.rounds {
            if let Err(e) = round.validate() {
                problems.push(format!("round {}: {}", round.round, format_validation_errors(&e)));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for round in &self.analysis.rounds {
            if !seen.insert(round.round) {
                problems.push(format!("round {} is defined more than once", round.round));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join("; "))
        }
    }

    /// Reads and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self, String> {
        let file_contents = fs::read_to_string(path)
            .map_err(|_| format!("Failed to read grader config file at {path:?}"))?;

        let cfg: GraderConfig = serde_json::from_str(&file_contents)
            .map_err(|e| format!("Invalid grader config JSON format: {e}"))?;

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create config directory: {e:?}"))?;
            }
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config to JSON: {e}"))?;

        fs::write(path, json).map_err(|e| format!("Failed to write config file to disk: {e:?}"))?;

        Ok(())
    }
}

fn validate_grading_thresholds(options: &GradingOptions) -> Result<(), ValidationError> {
    if !(options.min_seconds_per_task >= 0.0) {
        return Err(rule_violation(
            "negative_min_seconds",
            "min_seconds_per_task must not be negative",
        ));
    }
    if !(options.min_seconds_per_task < options.max_seconds_per_task) {
        return Err(rule_violation(
            "threshold_order",
            "min_seconds_per_task must be below max_seconds_per_task",
        ));
    }
    if !(options.target_exponent < 0.0) {
        return Err(rule_violation(
            "target_exponent",
            "target_exponent must be negative",
        ));
    }
    if !(options.min_r_squared >= 0.0 && options.min_r_squared < R_SQUARED_CEILING) {
        return Err(rule_violation(
            "min_r_squared",
            "min_r_squared must be within [0, 0.7)",
        ));
    }
    Ok(())
}

fn validate_weight_sum(weights: &CriterionWeights) -> Result<(), ValidationError> {
    if (weights.sum() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(rule_violation(
            "weight_sum",
            "criterion weights must sum to 1.0",
        ));
    }
    Ok(())
}

fn rule_violation(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

//Default Functions

fn default_rounds() -> Vec<RoundDefinition> {
    (1..=3)
        .map(|round| RoundDefinition {
            round,
            name: format!("Round {round}"),
            expected_tasks: 6,
        })
        .collect()
}

fn default_total_tasks() -> u32 {
    18
}

fn default_min_seconds_per_task() -> f64 {
    3.0
}

fn default_max_seconds_per_task() -> f64 {
    600.0
}

fn default_target_exponent() -> f64 {
    -0.3
}

fn default_min_r_squared() -> f64 {
    0.15
}

fn default_completion_weight() -> f64 {
    0.20
}

fn default_learning_curve_weight() -> f64 {
    0.25
}

fn default_efficiency_weight() -> f64 {
    0.20
}

fn default_improvement_weight() -> f64 {
    0.15
}

fn default_time_performance_weight() -> f64 {
    0.20
}
