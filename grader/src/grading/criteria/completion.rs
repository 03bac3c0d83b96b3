use crate::analysis::AnalysisResult;
use crate::grading::{Flag, FlagCode, Severity};
use crate::traits::criterion::{Criterion, CriterionOutcome};
use util::grading_config::GradingOptions;
use util::rounding::clamp_score;

/// Share of the curriculum completed.
///
/// Any shortfall raises `INCOMPLETE`; below half the tasks it is critical.
pub struct Completion;

impl Criterion for Completion {
    fn name(&self) -> &'static str {
        "Completion"
    }

    fn evaluate(&self, analysis: &AnalysisResult, options: &GradingOptions) -> CriterionOutcome {
        let completed = analysis.overall.completed_tasks;
        let total = options.total_tasks.max(1) as usize;
        let ratio = completed as f64 / total as f64;

        let mut flags = Vec::new();
        if completed < total {
            let severity = if ratio < 0.5 {
                Severity::Critical
            } else {
                Severity::Warning
            };
            flags.push(Flag::new(
                FlagCode::Incomplete,
                severity,
                format!("Only {completed} of {total} tasks completed"),
            ));
        }

        CriterionOutcome {
            raw_score: clamp_score(100.0 * ratio),
            rationale: format!("Completed {completed} of {total} tasks"),
            flags,
        }
    }
}
