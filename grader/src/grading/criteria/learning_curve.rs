use crate::analysis::AnalysisResult;
use crate::grading::{Flag, FlagCode, Severity};
use crate::traits::criterion::{Criterion, CriterionOutcome};
use util::grading_config::{GradingOptions, R_SQUARED_CEILING};
use util::rounding::clamp_score;

/// Fewer successful attempts than this cannot support a meaningful fit.
pub const MIN_CURVE_POINTS: usize = 3;

const EXPONENT_SHARE: f64 = 0.6;
const FIT_SHARE: f64 = 0.4;

/// How steep and how consistent the learning curve is.
///
/// The exponent sub-score rewards getting faster (reaching the target exponent earns full marks);
/// the fit sub-score rewards a curve that actually explains the times.
pub struct LearningCurve;

/// 0 for a flat or rising curve, 100 at or beyond the target, linear in between.
pub fn exponent_score(exponent: f64, target_exponent: f64) -> u32 {
    if exponent >= 0.0 {
        0
    } else if exponent <= target_exponent {
        100
    } else {
        clamp_score(100.0 * exponent / target_exponent)
    }
}

/// 0 below `min_r_squared`, 100 from [`R_SQUARED_CEILING`] up, linear in between.
pub fn fit_score(r_squared: f64, min_r_squared: f64) -> u32 {
    if r_squared < min_r_squared {
        0
    } else if r_squared >= R_SQUARED_CEILING {
        100
    } else {
        clamp_score(100.0 * (r_squared - min_r_squared) / (R_SQUARED_CEILING - min_r_squared))
    }
}

impl Criterion for LearningCurve {
    fn name(&self) -> &'static str {
        "Learning Curve"
    }

    fn evaluate(&self, analysis: &AnalysisResult, options: &GradingOptions) -> CriterionOutcome {
        let curve = &analysis.learning_curve;

        if curve.sample_size < MIN_CURVE_POINTS {
            return CriterionOutcome {
                raw_score: 0,
                rationale: format!(
                    "Only {} successful attempts; at least {MIN_CURVE_POINTS} are needed to fit a learning curve",
                    curve.sample_size
                ),
                flags: vec![Flag::new(
                    FlagCode::InsufficientDataForLc,
                    Severity::Warning,
                    "Not enough successful attempts to fit a learning curve",
                )],
            };
        }

        let mut flags = Vec::new();
        let exp_score = exponent_score(curve.exponent, options.target_exponent);
        if curve.exponent >= 0.0 {
            flags.push(Flag::new(
                FlagCode::PositiveExponent,
                Severity::Warning,
                format!(
                    "Solve times did not decrease over the session (exponent {:.4})",
                    curve.exponent
                ),
            ));
        }

        let r2_score = fit_score(curve.r_squared, options.min_r_squared);
        if curve.r_squared < options.min_r_squared && curve.exponent < 0.0 {
            flags.push(Flag::new(
                FlagCode::WeakFit,
                Severity::Info,
                format!(
                    "Learning curve explains little of the variation (R² {:.4})",
                    curve.r_squared
                ),
            ));
        }

        CriterionOutcome {
            raw_score: clamp_score(
                EXPONENT_SHARE * f64::from(exp_score) + FIT_SHARE * f64::from(r2_score),
            ),
            rationale: format!(
                "Exponent {:.4} (learning rate {:.4}) scored {exp_score}/100; R² {:.4} scored {r2_score}/100",
                curve.exponent, curve.learning_rate, curve.r_squared
            ),
            flags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::criteria::fixtures::analysis_with_times;

    fn evaluate(sample_size: usize, exponent: f64, r_squared: f64) -> CriterionOutcome {
        let mut analysis = analysis_with_times(&vec![30.0; sample_size]);
        analysis.learning_curve.exponent = exponent;
        analysis.learning_curve.r_squared = r_squared;
        LearningCurve.evaluate(&analysis, &GradingOptions::default())
    }

    #[test]
    fn test_exponent_band() {
        assert_eq!(exponent_score(0.1, -0.3), 0);
        assert_eq!(exponent_score(0.0, -0.3), 0);
        assert_eq!(exponent_score(-0.15, -0.3), 50);
        assert_eq!(exponent_score(-0.3, -0.3), 100);
        assert_eq!(exponent_score(-0.9, -0.3), 100);
    }

    #[test]
    fn test_fit_band() {
        assert_eq!(fit_score(0.1, 0.15), 0);
        assert_eq!(fit_score(0.15, 0.15), 0);
        assert_eq!(fit_score(0.425, 0.15), 50);
        assert_eq!(fit_score(0.7, 0.15), 100);
        assert_eq!(fit_score(0.95, 0.15), 100);
    }

    #[test]
    fn test_insufficient_data() {
        let outcome = evaluate(2, -0.5, 0.9);
        assert_eq!(outcome.raw_score, 0);
        assert_eq!(outcome.flags.len(), 1);
        assert_eq!(outcome.flags[0].code, FlagCode::InsufficientDataForLc);
        assert_eq!(outcome.flags[0].severity, Severity::Warning);
    }

    #[test]
    fn test_strong_curve_scores_full_marks() {
        let outcome = evaluate(10, -0.4, 0.85);
        assert_eq!(outcome.raw_score, 100);
        assert!(outcome.flags.is_empty());
    }

    #[test]
    fn test_blend_of_sub_scores() {
        // exponent 50, fit 50
        let outcome = evaluate(10, -0.15, 0.425);
        assert_eq!(outcome.raw_score, 50);
    }

    #[test]
    fn test_positive_exponent_flagged_without_weak_fit() {
        let outcome = evaluate(6, 0.2, 0.05);
        assert_eq!(outcome.raw_score, 0);
        let codes: Vec<FlagCode> = outcome.flags.iter().map(|f| f.code).collect();
        assert_eq!(codes, vec![FlagCode::PositiveExponent]);
    }

    #[test]
    fn test_weak_fit_is_informational() {
        let outcome = evaluate(6, -0.3, 0.05);
        // exponent 100 * 0.6
        assert_eq!(outcome.raw_score, 60);
        assert_eq!(outcome.flags.len(), 1);
        assert_eq!(outcome.flags[0].code, FlagCode::WeakFit);
        assert_eq!(outcome.flags[0].severity, Severity::Info);
    }
}
