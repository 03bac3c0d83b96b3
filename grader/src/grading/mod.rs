//! # Grading Module
//!
//! Scores an [`AnalysisResult`] with five weighted criteria and produces a [`GradingResult`]:
//! an integer total in `[0, 100]`, a letter grade, the per-criterion breakdown, the anomaly flags
//! raised along the way and a one-paragraph summary.
//!
//! ## Criteria
//!
//! | Criterion | Default weight | Module |
//! |-----------|----------------|--------|
//! | Completion | 0.20 | [`criteria::completion`] |
//! | Learning Curve | 0.25 | [`criteria::learning_curve`] |
//! | Efficiency | 0.20 | [`criteria::efficiency`] |
//! | Improvement Trend | 0.15 | [`criteria::improvement`] |
//! | Time Performance | 0.20 | [`criteria::time_performance`] |
//!
//! Weights come from [`GraderConfig::weights`]. [`GradingEngine::new`] refuses a configuration
//! whose weights do not sum to one, so every produced result satisfies `Σ weight == 1`.

pub mod criteria;
pub mod letter;
pub mod summary;

use serde::Serialize;
use tracing::{info, warn};
use util::grading_config::{GraderConfig, GradingOptions};
use util::rounding::{clamp_score, round4};

use crate::analysis::AnalysisResult;
use crate::error::GraderError;
use crate::traits::criterion::Criterion;
pub use letter::LetterGrade;

/// How urgently a flag needs a human.
///
/// Ordered, so dashboards can filter with `>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlagCode {
    Incomplete,
    InsufficientDataForLc,
    PositiveExponent,
    WeakFit,
    HighRetryRate,
    SuspiciouslyFast,
    VerySlowTasks,
    AvgTimeTooLow,
}

/// An anomaly noticed while grading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flag {
    pub code: FlagCode,
    pub severity: Severity,
    pub message: String,
}

impl Flag {
    pub fn new(code: FlagCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
        }
    }
}

/// One criterion's contribution to the total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionScore {
    pub name: String,
    pub weight: f64,
    pub raw_score: u32,
    /// `raw_score × weight`.
    pub weighted_score: f64,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradingResult {
    pub total_score: u32,
    pub letter_grade: LetterGrade,
    pub criteria: Vec<CriterionScore>,
    pub flags: Vec<Flag>,
    pub summary: String,
}

impl GradingResult {
    /// Flags at or above `severity`, in the order they were raised.
    pub fn flags_at_least(&self, severity: Severity) -> Vec<&Flag> {
        self.flags.iter().filter(|f| f.severity >= severity).collect()
    }
}

/// Applies the weighted criteria to analysis results.
pub struct GradingEngine {
    options: GradingOptions,
    criteria: Vec<(Box<dyn Criterion>, f64)>,
}

impl GradingEngine {
    /// Builds an engine from a configuration, rejecting it if any rule is violated.
    pub fn new(config: &GraderConfig) -> Result<Self, GraderError> {
        if let Err(e) = config.validate() {
            warn!(error = %e, "rejected grading configuration");
            return Err(GraderError::InvalidConfig(e));
        }

        let w = &config.weights;
        let criteria: Vec<(Box<dyn Criterion>, f64)> = vec![
            (Box::new(criteria::completion::Completion), w.completion),
            (Box::new(criteria::learning_curve::LearningCurve), w.learning_curve),
            (Box::new(criteria::efficiency::Efficiency), w.efficiency),
            (Box::new(criteria::improvement::ImprovementTrend), w.improvement),
            (Box::new(criteria::time_performance::TimePerformance), w.time_performance),
        ];

        Ok(Self {
            options: config.grading.clone(),
            criteria,
        })
    }

    pub fn grade(&self, analysis: &AnalysisResult) -> GradingResult {
        let mut scores = Vec::with_capacity(self.criteria.len());
        let mut flags = Vec::new();
        let mut weighted_total = 0.0;

        for (criterion, weight) in &self.criteria {
            let outcome = criterion.evaluate(analysis, &self.options);
            let weighted = f64::from(outcome.raw_score) * weight;
            weighted_total += weighted;

            scores.push(CriterionScore {
                name: criterion.name().to_string(),
                weight: *weight,
                raw_score: outcome.raw_score,
                weighted_score: round4(weighted),
                rationale: outcome.rationale,
            });
            flags.extend(outcome.flags);
        }

        let total_score = clamp_score(weighted_total);
        let letter_grade = LetterGrade::from_score(total_score);
        let summary = summary::summarize(total_score, letter_grade, &scores, &flags);

        info!(
            student_id = %analysis.student_id,
            total_score,
            letter_grade = %letter_grade,
            flags = flags.len(),
            "session graded"
        );

        GradingResult {
            total_score,
            letter_grade,
            criteria: scores,
            flags,
            summary,
        }
    }
}
