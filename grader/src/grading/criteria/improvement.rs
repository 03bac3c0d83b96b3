use crate::analysis::AnalysisResult;
use crate::traits::criterion::{Criterion, CriterionOutcome};
use util::grading_config::GradingOptions;
use util::rounding::clamp_score;

/// Late-session speed relative to early-session speed.
pub struct ImprovementTrend;

/// Maps the improvement ratio onto a score: halving the time earns 100, no change earns 50,
/// taking half again as long earns 0.
pub fn ratio_score(ratio: f64) -> u32 {
    if ratio <= 0.5 {
        100
    } else if ratio >= 1.5 {
        0
    } else if ratio <= 1.0 {
        clamp_score(100.0 - (ratio - 0.5) * 100.0)
    } else {
        clamp_score(50.0 - (ratio - 1.0) * 100.0)
    }
}

impl Criterion for ImprovementTrend {
    fn name(&self) -> &'static str {
        "Improvement Trend"
    }

    fn evaluate(&self, analysis: &AnalysisResult, _options: &GradingOptions) -> CriterionOutcome {
        let ratio = analysis.overall.improvement_ratio;
        let raw_score = ratio_score(ratio);

        let trend = if ratio < 1.0 {
            "faster"
        } else if ratio > 1.0 {
            "slower"
        } else {
            "no change"
        };

        CriterionOutcome {
            raw_score,
            rationale: format!("Late tasks took {ratio:.2}x the time of early tasks ({trend})"),
            flags: vec![],
        }
    }
}
