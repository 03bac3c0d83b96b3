//! Session statistics.
//!
//! Pure, single-pass transforms over an attempt log. Nothing here mutates the log, and the output
//! depends only on the log and the round definitions, so running the aggregation twice yields
//! identical results.

use std::collections::HashMap;

use serde::Serialize;
use util::grading_config::RoundDefinition;
use util::rounding::{clamp_score, round2, round4};

use crate::analysis::complexity::{ArtifactComplexity, classify};
use crate::types::Attempt;

/// Number of attempts at each end of the session compared by the improvement ratio.
pub const IMPROVEMENT_WINDOW: usize = 3;

const TIME_WEIGHT: f64 = 0.40;
const ATTEMPT_WEIGHT: f64 = 0.35;
const COMPLEXITY_WEIGHT: f64 = 0.25;

/// Aggregate figures for one configured round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundSummary {
    pub round: u32,
    pub name: String,
    pub tasks_completed: usize,
    pub tasks_total: u32,
    pub total_time: f64,
    pub avg_time: f64,
    pub median_time: f64,
    pub min_time: f64,
    pub max_time: f64,
    /// Every attempt in the round, correct or not.
    pub total_attempts: usize,
    /// `total_attempts / tasks_completed`, 0 when nothing was completed.
    pub avg_attempts: f64,
    /// Share of attempted tasks whose first attempt was correct.
    pub first_try_success_rate: f64,
}

/// Difficulty profile of one successfully completed task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDifficulty {
    pub task_id: String,
    pub round: u32,
    pub task_index: u32,
    pub sequence_index: u32,
    pub elapsed_seconds: f64,
    /// All attempts at the task, correct or not.
    pub attempts: usize,
    pub first_try_success: bool,
    /// Blend of normalized time, attempts and complexity, in `[0, 100]`.
    pub difficulty_score: u32,
    pub complexity: ArtifactComplexity,
}

/// Session-wide figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallStats {
    pub completed_tasks: usize,
    pub total_time: f64,
    pub avg_time: f64,
    pub median_time: f64,
    /// Sample standard deviation of successful elapsed times.
    pub std_dev_time: f64,
    pub total_attempts: usize,
    pub avg_attempts_per_task: f64,
    pub first_try_success_rate: f64,
    /// Mean time of the last three successful attempts over the mean of the first three.
    /// 1.0 when fewer than six successful attempts exist.
    pub improvement_ratio: f64,
}

/// The most recent correct attempt per task, in ascending sequence order.
///
/// Later correct submissions replace earlier ones; tasks never solved are absent.
pub fn successful_attempts(attempts: &[Attempt]) -> Vec<&Attempt> {
    let mut latest: HashMap<&str, &Attempt> = HashMap::new();
    for attempt in attempts.iter().filter(|a| a.is_correct) {
        latest.insert(attempt.task_id.as_str(), attempt);
    }

    let mut successful: Vec<&Attempt> = latest.into_values().collect();
    successful.sort_by(|a, b| {
        a.sequence_index
            .cmp(&b.sequence_index)
            .then_with(|| a.task_id.cmp(&b.task_id))
    });
    successful
}

/// Number of attempts per task id.
pub fn attempt_counts(attempts: &[Attempt]) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for attempt in attempts {
        *counts.entry(attempt.task_id.as_str()).or_default() += 1;
    }
    counts
}

/// Whether each task's chronologically first attempt was correct.
///
/// "First" is the lowest `attempt_number`; ties go to the earlier log entry.
pub fn first_attempt_outcomes(attempts: &[Attempt]) -> HashMap<&str, bool> {
    let mut first: HashMap<&str, &Attempt> = HashMap::new();
    for attempt in attempts {
        first
            .entry(attempt.task_id.as_str())
            .and_modify(|current| {
                if attempt.attempt_number < current.attempt_number {
                    *current = attempt;
                }
            })
            .or_insert(attempt);
    }
    first
        .into_iter()
        .map(|(task, attempt)| (task, attempt.is_correct))
        .collect()
}

fn first_try_rate<'a>(outcomes: impl Iterator<Item = &'a bool>) -> f64 {
    let (mut hits, mut total) = (0usize, 0usize);
    for &correct in outcomes {
        total += 1;
        if correct {
            hits += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

pub fn median(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Bessel-corrected standard deviation; 0 for fewer than two values.
pub fn sample_std_dev(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let m = mean(xs);
    let var = xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (xs.len() as f64 - 1.0);
    var.sqrt()
}

/// Ratio of the mean of the last [`IMPROVEMENT_WINDOW`] times to the mean of the first ones.
pub fn improvement_ratio(times: &[f64]) -> f64 {
    if times.len() < IMPROVEMENT_WINDOW * 2 {
        return 1.0;
    }
    let first = mean(&times[..IMPROVEMENT_WINDOW]);
    let last = mean(&times[times.len() - IMPROVEMENT_WINDOW..]);
    if first <= 0.0 {
        return 1.0;
    }
    last / first
}

/// Builds one summary per configured round, in configuration order.
pub fn summarize_rounds(
    attempts: &[Attempt],
    successful: &[&Attempt],
    rounds: &[RoundDefinition],
) -> Vec<RoundSummary> {
    let first_outcomes = first_attempt_outcomes(attempts);

    rounds
        .iter()
        .map(|def| {
            let times: Vec<f64> = successful
                .iter()
                .filter(|a| a.round == def.round)
                .map(|a| a.elapsed_seconds)
                .collect();
            let total_attempts = attempts.iter().filter(|a| a.round == def.round).count();
            let tasks_completed = times.len();

            let round_outcomes: Vec<bool> = first_outcomes
                .iter()
                .filter(|(task, _)| task_round(attempts, task) == Some(def.round))
                .map(|(_, &correct)| correct)
                .collect();

            let (min_time, max_time) = if times.is_empty() {
                (0.0, 0.0)
            } else {
                (
                    times.iter().copied().fold(f64::INFINITY, f64::min),
                    times.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                )
            };

            RoundSummary {
                round: def.round,
                name: def.name.clone(),
                tasks_completed,
                tasks_total: def.expected_tasks,
                total_time: round2(times.iter().sum()),
                avg_time: round2(mean(&times)),
                median_time: round2(median(&times)),
                min_time: round2(min_time),
                max_time: round2(max_time),
                total_attempts,
                avg_attempts: if tasks_completed == 0 {
                    0.0
                } else {
                    round4(total_attempts as f64 / tasks_completed as f64)
                },
                first_try_success_rate: round4(first_try_rate(round_outcomes.iter())),
            }
        })
        .collect()
}

fn task_round(attempts: &[Attempt], task_id: &str) -> Option<u32> {
    attempts
        .iter()
        .find(|a| a.task_id == task_id)
        .map(|a| a.round)
}

/// Scores every successful attempt against the session's own maxima.
///
/// Difficulty scores are therefore relative to the session: the slowest task always gets the
/// full time component, whatever its absolute duration.
pub fn task_difficulties(attempts: &[Attempt], successful: &[&Attempt]) -> Vec<TaskDifficulty> {
    let counts = attempt_counts(attempts);
    let first_outcomes = first_attempt_outcomes(attempts);

    let max_time = successful
        .iter()
        .map(|a| a.elapsed_seconds)
        .fold(0.0, f64::max)
        .max(1.0);
    let max_attempts = successful
        .iter()
        .map(|a| counts.get(a.task_id.as_str()).copied().unwrap_or(1))
        .max()
        .unwrap_or(1);
    let attempt_span = max_attempts.saturating_sub(1).max(1) as f64;

    successful
        .iter()
        .map(|a| {
            let attempts_for_task = counts.get(a.task_id.as_str()).copied().unwrap_or(1);
            let complexity = classify(&a.submitted_artifact);

            let time_norm = a.elapsed_seconds / max_time;
            let attempt_norm = attempts_for_task.saturating_sub(1) as f64 / attempt_span;
            let blended = TIME_WEIGHT * time_norm
                + ATTEMPT_WEIGHT * attempt_norm
                + COMPLEXITY_WEIGHT * complexity.normalized_tier();

            TaskDifficulty {
                task_id: a.task_id.clone(),
                round: a.round,
                task_index: a.task_index,
                sequence_index: a.sequence_index,
                elapsed_seconds: round2(a.elapsed_seconds),
                attempts: attempts_for_task,
                first_try_success: first_outcomes
                    .get(a.task_id.as_str())
                    .copied()
                    .unwrap_or(false),
                difficulty_score: clamp_score(100.0 * blended),
                complexity,
            }
        })
        .collect()
}

/// Session-wide statistics over the successful attempts and the full log.
pub fn overall_stats(attempts: &[Attempt], successful: &[&Attempt]) -> OverallStats {
    let times: Vec<f64> = successful.iter().map(|a| a.elapsed_seconds).collect();
    let completed_tasks = times.len();
    let total_attempts = attempts.len();
    let first_outcomes = first_attempt_outcomes(attempts);

    OverallStats {
        completed_tasks,
        total_time: round2(times.iter().sum()),
        avg_time: round2(mean(&times)),
        median_time: round2(median(&times)),
        std_dev_time: round2(sample_std_dev(&times)),
        total_attempts,
        avg_attempts_per_task: if completed_tasks == 0 {
            0.0
        } else {
            round4(total_attempts as f64 / completed_tasks as f64)
        },
        first_try_success_rate: round4(first_try_rate(first_outcomes.values())),
        improvement_ratio: round4(improvement_ratio(&times)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn attempt(seq: u32, number: u32, secs: f64, correct: bool) -> Attempt {
        let round = (seq - 1) / 6 + 1;
        let task_index = (seq - 1) % 6 + 1;
        Attempt {
            student_id: "s1".into(),
            task_id: format!("{round}.{task_index}"),
            round,
            task_index,
            sequence_index: seq,
            attempt_number: number,
            elapsed_seconds: secs,
            submitted_artifact: "SELECT * FROM t".into(),
            completed_at: Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()
                + chrono::Duration::seconds(i64::from(seq * 100 + number)),
            is_correct: correct,
        }
    }

    fn rounds() -> Vec<RoundDefinition> {
        (1..=3)
            .map(|round| RoundDefinition {
                round,
                name: format!("Round {round}"),
                expected_tasks: 6,
            })
            .collect()
    }

    #[test]
    fn test_last_correct_attempt_wins() {
        let log = vec![
            attempt(1, 1, 40.0, true),
            attempt(1, 2, 25.0, true),
            attempt(2, 1, 30.0, false),
        ];
        let successful = successful_attempts(&log);
        assert_eq!(successful.len(), 1);
        assert_eq!(successful[0].elapsed_seconds, 25.0);
    }

    #[test]
    fn test_successful_attempts_sorted_by_sequence() {
        let log = vec![
            attempt(3, 1, 10.0, true),
            attempt(1, 1, 30.0, true),
            attempt(2, 1, 20.0, true),
        ];
        let seqs: Vec<u32> = successful_attempts(&log)
            .iter()
            .map(|a| a.sequence_index)
            .collect();
        assert_eq!(seqs, vec![1, 2, 3]);
    }

    #[test]
    fn test_median_and_std_dev() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&[]), 0.0);
        assert_eq!(sample_std_dev(&[5.0]), 0.0);
        assert!((sample_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.13809).abs() < 1e-4);
    }

    #[test]
    fn test_improvement_ratio_needs_six_points() {
        assert_eq!(improvement_ratio(&[10.0, 9.0, 8.0, 7.0, 6.0]), 1.0);
        let ratio = improvement_ratio(&[60.0, 60.0, 60.0, 40.0, 30.0, 30.0, 30.0]);
        assert!((ratio - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_retries_count_fully() {
        let log = vec![
            attempt(1, 1, 50.0, false),
            attempt(1, 2, 45.0, false),
            attempt(1, 3, 40.0, true),
            attempt(2, 1, 20.0, true),
        ];
        let successful = successful_attempts(&log);
        let difficulties = task_difficulties(&log, &successful);
        assert_eq!(difficulties[0].attempts, 3);
        assert!(!difficulties[0].first_try_success);
        assert_eq!(difficulties[1].attempts, 1);
        assert!(difficulties[1].first_try_success);

        let stats = overall_stats(&log, &successful);
        assert_eq!(stats.total_attempts, 4);
        assert_eq!(stats.completed_tasks, 2);
        assert_eq!(stats.avg_attempts_per_task, 2.0);
        assert_eq!(stats.first_try_success_rate, 0.5);
    }

    #[test]
    fn test_difficulty_blend() {
        // task 1: slowest (time 1.0), 3 attempts (attempt 1.0), tier 1 => 75
        // task 2: half the time, first try, tier 1 => 20
        let log = vec![
            attempt(1, 1, 80.0, false),
            attempt(1, 2, 80.0, false),
            attempt(1, 3, 80.0, true),
            attempt(2, 1, 40.0, true),
        ];
        let successful = successful_attempts(&log);
        let d = task_difficulties(&log, &successful);
        assert_eq!(d[0].difficulty_score, 75);
        assert_eq!(d[1].difficulty_score, 20);
    }

    #[test]
    fn test_difficulty_uses_complexity_tier() {
        let mut a = attempt(1, 1, 10.0, true);
        a.submitted_artifact =
            "SELECT d, AVG(s) FROM (SELECT d, s FROM e) x GROUP BY d".to_string();
        let log = vec![a];
        let successful = successful_attempts(&log);
        let d = task_difficulties(&log, &successful);
        // time 10/10 => 40, attempts 0, tier 5 => 25
        assert_eq!(d[0].complexity.tier, 5);
        assert_eq!(d[0].difficulty_score, 65);
    }

    #[test]
    fn test_short_tasks_normalize_against_one_second_floor() {
        let log = vec![attempt(1, 1, 0.5, true)];
        let successful = successful_attempts(&log);
        let d = task_difficulties(&log, &successful);
        assert_eq!(d[0].difficulty_score, 20);
    }

    #[test]
    fn test_round_summaries() {
        let log = vec![
            attempt(1, 1, 10.0, true),
            attempt(2, 1, 30.0, false),
            attempt(2, 2, 20.0, true),
            attempt(3, 1, 5.0, false),
            attempt(7, 1, 60.0, true),
        ];
        let successful = successful_attempts(&log);
        let summaries = summarize_rounds(&log, &successful, &rounds());
        assert_eq!(summaries.len(), 3);

        let r1 = &summaries[0];
        assert_eq!(r1.tasks_completed, 2);
        assert_eq!(r1.tasks_total, 6);
        assert_eq!(r1.total_time, 30.0);
        assert_eq!(r1.avg_time, 15.0);
        assert_eq!(r1.median_time, 15.0);
        assert_eq!(r1.min_time, 10.0);
        assert_eq!(r1.max_time, 20.0);
        assert_eq!(r1.total_attempts, 4);
        assert_eq!(r1.avg_attempts, 2.0);
        // three tasks attempted, only task 1.1 right first time
        assert_eq!(r1.first_try_success_rate, 0.3333);

        let r2 = &summaries[1];
        assert_eq!(r2.tasks_completed, 1);
        assert_eq!(r2.first_try_success_rate, 1.0);

        let r3 = &summaries[2];
        assert_eq!(r3.tasks_completed, 0);
        assert_eq!(r3.total_time, 0.0);
        assert_eq!(r3.min_time, 0.0);
        assert_eq!(r3.avg_attempts, 0.0);
        assert_eq!(r3.first_try_success_rate, 0.0);
    }

    #[test]
    fn test_first_attempt_uses_lowest_attempt_number() {
        let log = vec![attempt(1, 2, 10.0, true), attempt(1, 1, 12.0, false)];
        let outcomes = first_attempt_outcomes(&log);
        assert_eq!(outcomes.get("1.1"), Some(&false));
    }

    #[test]
    fn test_empty_log() {
        let log: Vec<Attempt> = vec![];
        let successful = successful_attempts(&log);
        let stats = overall_stats(&log, &successful);
        assert_eq!(stats.completed_tasks, 0);
        assert_eq!(stats.total_time, 0.0);
        assert_eq!(stats.std_dev_time, 0.0);
        assert_eq!(stats.avg_attempts_per_task, 0.0);
        assert_eq!(stats.first_try_success_rate, 0.0);
        assert_eq!(stats.improvement_ratio, 1.0);
        assert!(task_difficulties(&log, &successful).is_empty());
    }
}
