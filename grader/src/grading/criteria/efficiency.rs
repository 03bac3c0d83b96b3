use crate::analysis::AnalysisResult;
use crate::grading::{Flag, FlagCode, Severity};
use crate::traits::criterion::{Criterion, CriterionOutcome};
use util::grading_config::GradingOptions;
use util::rounding::clamp_score;

const BEST_AVG_ATTEMPTS: f64 = 1.0;
const WORST_AVG_ATTEMPTS: f64 = 3.0;
const HIGH_RETRY_AVG_ATTEMPTS: f64 = 2.5;

/// First-try accuracy blended equally with the average number of attempts per completed task.
pub struct Efficiency;

/// 100 at one attempt per task or fewer, 0 at three or more, linear in between.
pub fn attempt_score(avg_attempts: f64) -> u32 {
    if avg_attempts <= BEST_AVG_ATTEMPTS {
        100
    } else if avg_attempts >= WORST_AVG_ATTEMPTS {
        0
    } else {
        clamp_score((WORST_AVG_ATTEMPTS - avg_attempts) / 2.0 * 100.0)
    }
}

impl Criterion for Efficiency {
    fn name(&self) -> &'static str {
        "Efficiency"
    }

    fn evaluate(&self, analysis: &AnalysisResult, _options: &GradingOptions) -> CriterionOutcome {
        let overall = &analysis.overall;
        let first_try = clamp_score(100.0 * overall.first_try_success_rate);
        let attempts = attempt_score(overall.avg_attempts_per_task);
        let raw_score = clamp_score((f64::from(first_try) + f64::from(attempts)) / 2.0);

        let mut flags = Vec::new();
        if overall.avg_attempts_per_task > HIGH_RETRY_AVG_ATTEMPTS {
            flags.push(Flag::new(
                FlagCode::HighRetryRate,
                Severity::Info,
                format!(
                    "High retry rate: {:.2} attempts per completed task",
                    overall.avg_attempts_per_task
                ),
            ));
        }

        CriterionOutcome {
            raw_score,
            rationale: format!(
                "First-try success {first_try}/100, attempt efficiency {attempts}/100 ({:.2} attempts per task)",
                overall.avg_attempts_per_task
            ),
            flags,
        }
    }
}
