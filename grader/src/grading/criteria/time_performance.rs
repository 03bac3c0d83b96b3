use crate::analysis::AnalysisResult;
use crate::grading::{Flag, FlagCode, Severity};
use crate::traits::criterion::{Criterion, CriterionOutcome};
use util::grading_config::GradingOptions;
use util::rounding::clamp_score;

const FAST_PENALTY: f64 = 10.0;
const FAST_PENALTY_CAP: f64 = 50.0;
const SLOW_PENALTY: f64 = 5.0;
const SLOW_PENALTY_CAP: f64 = 20.0;
/// More fast tasks than this is reported as suspicious.
const FAST_TASK_ALLOWANCE: usize = 3;
/// Sessions averaging below this many seconds per task are capped at [`LOW_AVG_SCORE_CAP`].
const MIN_AVG_SECONDS: f64 = 5.0;
const LOW_AVG_SCORE_CAP: f64 = 20.0;

/// Penalizes implausibly fast and very slow tasks.
///
/// Per-task deductions are applied first; the low-average cap is applied afterwards, so the
/// stricter of the two wins. Sessions without successful attempts keep the full score.
pub struct TimePerformance;

impl Criterion for TimePerformance {
    fn name(&self) -> &'static str {
        "Time Performance"
    }

    fn evaluate(&self, analysis: &AnalysisResult, options: &GradingOptions) -> CriterionOutcome {
        let times = analysis.successful_times();
        let fast = times
            .iter()
            .filter(|&&t| t < options.min_seconds_per_task)
            .count();
        let slow = times
            .iter()
            .filter(|&&t| t > options.max_seconds_per_task)
            .count();

        let mut score = 100.0;
        score -= (FAST_PENALTY * fast as f64).min(FAST_PENALTY_CAP);
        score -= (SLOW_PENALTY * slow as f64).min(SLOW_PENALTY_CAP);

        let mut flags = Vec::new();
        if fast > FAST_TASK_ALLOWANCE {
            flags.push(Flag::new(
                FlagCode::SuspiciouslyFast,
                Severity::Critical,
                format!(
                    "{fast} tasks solved in under {}s",
                    options.min_seconds_per_task
                ),
            ));
        }
        if slow > 0 {
            flags.push(Flag::new(
                FlagCode::VerySlowTasks,
                Severity::Info,
                format!(
                    "{slow} tasks took longer than {}s",
                    options.max_seconds_per_task
                ),
            ));
        }

        let avg = analysis.mean_successful_time();
        if !times.is_empty() && avg < MIN_AVG_SECONDS {
            score = score.min(LOW_AVG_SCORE_CAP);
            flags.push(Flag::new(
                FlagCode::AvgTimeTooLow,
                Severity::Critical,
                format!("Average time per task is only {avg:.2}s"),
            ));
        }

        CriterionOutcome {
            raw_score: clamp_score(score),
            rationale: format!(
                "{fast} suspiciously fast and {slow} very slow tasks; average {avg:.2}s per task"
            ),
            flags,
        }
    }
}
