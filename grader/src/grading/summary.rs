//! Human-readable synthesis of a grading run.

use super::{CriterionScore, Flag, LetterGrade, Severity};

/// Names the strongest and weakest criteria and lists critical flags for review.
///
/// Ties go to the criterion that comes first in evaluation order.
pub fn summarize(
    total_score: u32,
    letter_grade: LetterGrade,
    criteria: &[CriterionScore],
    flags: &[Flag],
) -> String {
    let mut summary = format!("Overall score {total_score}/100 ({letter_grade}).");

    let mut strongest: Option<&CriterionScore> = None;
    let mut weakest: Option<&CriterionScore> = None;
    for c in criteria {
        if strongest.is_none_or(|s| c.raw_score > s.raw_score) {
            strongest = Some(c);
        }
        if weakest.is_none_or(|w| c.raw_score < w.raw_score) {
            weakest = Some(c);
        }
    }

    if let (Some(best), Some(worst)) = (strongest, weakest) {
        summary.push_str(&format!(
            " Strongest area: {} ({}/100). Weakest area: {} ({}/100).",
            best.name, best.raw_score, worst.name, worst.raw_score
        ));
    }

    let critical: Vec<&str> = flags
        .iter()
        .filter(|f| f.severity == Severity::Critical)
        .map(|f| f.message.as_str())
        .collect();
    if !critical.is_empty() {
        summary.push_str(&format!(" REVIEW NEEDED: {}", critical.join("; ")));
    }

    summary
}
