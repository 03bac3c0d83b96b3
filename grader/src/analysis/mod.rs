//! # Analysis Module
//!
//! Turns a raw attempt log into an [`AnalysisResult`]: the learning-curve fit, per-round
//! summaries, per-task difficulty profiles and session-wide statistics.
//!
//! ## Pipeline
//!
//! 1. [`statistics::successful_attempts`] keeps the last correct attempt of every task, ordered
//!    by sequence index.
//! 2. [`regression::fit_learning_curve`] fits the power law over those attempts.
//! 3. [`statistics`] aggregates rounds, task difficulty (which calls
//!    [`complexity::classify`]) and overall figures.
//!
//! Every step is a pure function of the log and the round definitions. Empty logs, single
//! attempts and all-wrong sessions produce neutral values rather than errors.

pub mod complexity;
pub mod regression;
pub mod statistics;

use serde::Serialize;
use tracing::debug;
use util::grading_config::AnalysisOptions;

use crate::types::Attempt;
use regression::RegressionFit;
use statistics::{OverallStats, RoundSummary, TaskDifficulty};

/// Everything the grading engine needs to know about a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub student_id: String,
    pub learning_curve: RegressionFit,
    pub rounds: Vec<RoundSummary>,
    pub task_difficulties: Vec<TaskDifficulty>,
    pub overall: OverallStats,
    /// Unrounded elapsed seconds of every successful attempt, in sequence order. Thresholds are
    /// checked against these, never against the rounded report fields.
    #[serde(skip)]
    pub successful_times: Vec<f64>,
}

impl AnalysisResult {
    /// Elapsed seconds of every successful attempt, in sequence order, at full precision.
    pub fn successful_times(&self) -> &[f64] {
        &self.successful_times
    }

    /// Unrounded mean of [`successful_times`](Self::successful_times), 0 when empty.
    pub fn mean_successful_time(&self) -> f64 {
        statistics::mean(&self.successful_times)
    }
}

/// Analyzes one student's attempt log.
///
/// `student_id` is carried into the result as-is; the log is expected to contain only that
/// student's attempts.
pub fn analyze(student_id: &str, attempts: &[Attempt], options: &AnalysisOptions) -> AnalysisResult {
    let successful = statistics::successful_attempts(attempts);

    let successful_times: Vec<f64> = successful.iter().map(|a| a.elapsed_seconds).collect();
    let observations: Vec<(u32, f64)> = successful
        .iter()
        .map(|a| (a.sequence_index, a.elapsed_seconds))
        .collect();
    let learning_curve = regression::fit_learning_curve(&observations);

    let rounds = statistics::summarize_rounds(attempts, &successful, &options.rounds);
    let task_difficulties = statistics::task_difficulties(attempts, &successful);
    let overall = statistics::overall_stats(attempts, &successful);

    debug!(
        student_id,
        attempts = attempts.len(),
        completed = overall.completed_tasks,
        "session analyzed"
    );

    AnalysisResult {
        student_id: student_id.to_string(),
        learning_curve,
        rounds,
        task_difficulties,
        overall,
        successful_times,
    }
}
