//! Criterion Trait
//!
//! A [`Criterion`] scores one aspect of a session from the analysis output. Criteria are
//! independent of each other; the grading engine applies the configured weight and sums.

use crate::analysis::AnalysisResult;
use crate::grading::Flag;
use util::grading_config::GradingOptions;

/// Raw outcome of evaluating one criterion, before weighting.
#[derive(Debug, Clone, PartialEq)]
pub struct CriterionOutcome {
    /// Score in `[0, 100]`.
    pub raw_score: u32,
    /// Human-readable explanation of how the score was reached.
    pub rationale: String,
    /// Anomalies noticed while scoring.
    pub flags: Vec<Flag>,
}

pub trait Criterion: Send + Sync {
    /// Display name used in the report and the summary text.
    fn name(&self) -> &'static str;

    fn evaluate(&self, analysis: &AnalysisResult, options: &GradingOptions) -> CriterionOutcome;
}
