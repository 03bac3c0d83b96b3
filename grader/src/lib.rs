//! # Grader Library
//!
//! Analyzes a learner's attempt log and grades the session.
//!
//! ## Key Concepts
//! - **GradingJob**: runs the whole pipeline for one session and returns a report envelope.
//! - **Verifier**: checks whether a submitted query yields the same table as the reference query.
//! - **Analysis**: learning-curve regression, complexity tiers, round and session statistics.
//! - **Grading**: five weighted criteria, anomaly flags, a letter grade and a summary.
//! - **Stores**: pluggable sources of the attempt log (JSON file, in memory).

pub mod analysis;
pub mod error;
pub mod grading;
pub mod report;
pub mod traits;
pub mod types;
pub mod utilities;
pub mod verifier;

use chrono::Utc;
use tracing::info;
use util::grading_config::GraderConfig;

use crate::analysis::analyze;
use crate::error::GraderError;
use crate::grading::GradingEngine;
use crate::report::{SessionReport, SessionReportResponse};
use crate::traits::store::AttemptStore;

/// Grades a single student session.
///
/// # Fields
/// - `store`: where the attempt log comes from.
/// - `session_id`: the session (student) to grade.
/// - `config`: rounds, thresholds and weights; defaults unless overridden.
pub struct GradingJob<'a> {
    store: &'a dyn AttemptStore,
    session_id: String,
    config: GraderConfig,
}

impl<'a> GradingJob<'a> {
    /// Create a new grading job with the default configuration.
    pub fn new(store: &'a dyn AttemptStore, session_id: impl Into<String>) -> Self {
        Self {
            store,
            session_id: session_id.into(),
            config: GraderConfig::default_config(),
        }
    }

    /// Replace the configuration, rejecting it if any rule is violated.
    pub fn with_config(mut self, config: GraderConfig) -> Result<Self, GraderError> {
        config.validate().map_err(GraderError::InvalidConfig)?;
        self.config = config;
        Ok(self)
    }

    /// Run the pipeline and build the report.
    ///
    /// # Steps
    /// 1. Fetches the session's attempt log and checks every record.
    /// 2. Analyzes the log (learning curve, rounds, task difficulty, overall statistics).
    /// 3. Grades the analysis with the configured weights.
    ///
    /// # Errors
    /// Store failures, malformed attempts and invalid configuration. Empty or degenerate
    /// sessions are graded normally.
    pub fn run(self) -> Result<SessionReportResponse, GraderError> {
        let attempts = self.store.attempts(&self.session_id)?;
        for attempt in &attempts {
            attempt.validate()?;
        }
        info!(
            session_id = %self.session_id,
            attempts = attempts.len(),
            "grading session"
        );

        let engine = GradingEngine::new(&self.config)?;
        let analysis = analyze(&self.session_id, &attempts, &self.config.analysis);
        let grading = engine.grade(&analysis);

        Ok(SessionReport {
            student_id: self.session_id,
            generated_at: Utc::now(),
            analysis,
            grading,
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::{FlagCode, LetterGrade, Severity};
    use crate::types::Attempt;
    use crate::utilities::file_loader::JsonFileAttemptStore;
    use crate::utilities::memory_store::InMemoryAttemptStore;
    use chrono::{DateTime, TimeZone};
    use util::grading_config::CriterionWeights;

    fn is_valid_iso8601(s: &str) -> bool {
        DateTime::parse_from_rfc3339(s).is_ok()
    }

    fn attempt(seq: u32, number: u32, secs: f64, correct: bool) -> Attempt {
        let round = (seq - 1) / 6 + 1;
        let task_index = (seq - 1) % 6 + 1;
        Attempt {
            student_id: "learner".into(),
            task_id: format!("{round}.{task_index}"),
            round,
            task_index,
            sequence_index: seq,
            attempt_number: number,
            elapsed_seconds: secs,
            submitted_artifact: "SELECT name, total FROM orders WHERE total > 10".into(),
            completed_at: Utc.with_ymd_and_hms(2025, 4, 7, 13, 0, 0).unwrap()
                + chrono::Duration::seconds(i64::from(seq) * 300 + i64::from(number)),
            is_correct: correct,
        }
    }

    /// One correct first attempt per task, times following `120·n^-0.322` with small noise.
    fn clean_session(tasks: u32) -> Vec<Attempt> {
        (1..=tasks)
            .map(|n| {
                let noise = 1.0 + 0.03 * f64::from(n).sin();
                attempt(n, 1, 120.0 * f64::from(n).powf(-0.322) * noise, true)
            })
            .collect()
    }

    fn grade(attempts: Vec<Attempt>) -> SessionReport {
        let store = InMemoryAttemptStore::new().with_session("learner", attempts);
        GradingJob::new(&store, "learner").run().unwrap().data
    }

    fn raw_score(report: &SessionReport, name: &str) -> u32 {
        report
            .grading
            .criteria
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.raw_score)
            .unwrap()
    }

    fn count_flags(report: &SessionReport, code: FlagCode) -> usize {
        report.grading.flags.iter().filter(|f| f.code == code).count()
    }

    #[test]
    fn test_clean_session() {
        let report = grade(clean_session(18));

        let curve = &report.analysis.learning_curve;
        assert_eq!(curve.sample_size, 18);
        assert!(curve.exponent > -0.5 && curve.exponent < -0.15, "exponent {}", curve.exponent);
        assert_eq!(report.analysis.overall.first_try_success_rate, 1.0);
        assert_eq!(raw_score(&report, "Completion"), 100);
        assert_eq!(raw_score(&report, "Efficiency"), 100);
        assert!(report.grading.total_score >= 70, "total {}", report.grading.total_score);
        assert!(report.grading.flags_at_least(Severity::Warning).is_empty());
        assert!(!report.grading.summary.contains("REVIEW NEEDED"));
    }

    #[test]
    fn test_empty_session() {
        let report = grade(vec![]);

        assert_eq!(raw_score(&report, "Completion"), 0);
        assert_eq!(raw_score(&report, "Learning Curve"), 0);
        assert_eq!(count_flags(&report, FlagCode::InsufficientDataForLc), 1);
        assert_eq!(report.grading.letter_grade, LetterGrade::F);
        assert_eq!(report.analysis.overall.completed_tasks, 0);
        assert_eq!(count_flags(&report, FlagCode::AvgTimeTooLow), 0);
        assert_eq!(count_flags(&report, FlagCode::SuspiciouslyFast), 0);
        assert_eq!(raw_score(&report, "Time Performance"), 100);
    }

    #[test]
    fn test_partial_session() {
        let report = grade(clean_session(9));

        assert_eq!(raw_score(&report, "Completion"), 50);
        assert_eq!(count_flags(&report, FlagCode::Incomplete), 1);
        assert_eq!(report.analysis.learning_curve.sample_size, 9);
        assert!(raw_score(&report, "Learning Curve") > 0);
        assert_eq!(count_flags(&report, FlagCode::InsufficientDataForLc), 0);
    }

    #[test]
    fn test_retries() {
        let mut attempts = vec![
            attempt(1, 1, 95.0, false),
            attempt(1, 2, 80.0, false),
            attempt(1, 3, 70.0, true),
        ];
        attempts.extend((2..=4).map(|n| attempt(n, 1, 60.0, true)));
        let report = grade(attempts);

        let task = report
            .analysis
            .task_difficulties
            .iter()
            .find(|t| t.task_id == "1.1")
            .unwrap();
        assert_eq!(task.attempts, 3);
        assert!(!task.first_try_success);
        assert_eq!(report.analysis.overall.total_attempts, 6);
        assert_eq!(report.analysis.overall.completed_tasks, 4);
        assert_eq!(report.analysis.rounds[0].total_attempts, 6);
        assert_eq!(report.analysis.rounds[0].tasks_completed, 4);
    }

    #[test]
    fn test_weights_always_sum_to_one() {
        let custom = CriterionWeights {
            completion: 0.1,
            learning_curve: 0.4,
            efficiency: 0.1,
            improvement: 0.3,
            time_performance: 0.1,
        };
        let mut config = GraderConfig::default_config();
        config.weights = custom;

        let store = InMemoryAttemptStore::new().with_session("learner", clean_session(12));
        for config in [GraderConfig::default_config(), config] {
            let report = GradingJob::new(&store, "learner")
                .with_config(config)
                .unwrap()
                .run()
                .unwrap()
                .data;
            let sum: f64 = report.grading.criteria.iter().map(|c| c.weight).sum();
            assert!((sum - 1.0).abs() < 1e-9);
            assert_eq!(report.grading.criteria.len(), 5);
        }
    }

    #[test]
    fn test_completion_is_monotonic() {
        let mut previous = 0;
        for tasks in 0..=18 {
            let score = raw_score(&grade(clean_session(tasks)), "Completion");
            assert!(score >= previous, "{tasks} tasks scored {score} < {previous}");
            previous = score;
        }
    }

    #[test]
    fn test_boundary_times_are_judged_before_rounding() {
        let fast: Vec<Attempt> = (1..=6).map(|n| attempt(n, 1, 2.996, true)).collect();
        let report = grade(fast);
        assert_eq!(report.analysis.overall.avg_time, 3.0);
        assert_eq!(count_flags(&report, FlagCode::SuspiciouslyFast), 1);
        assert_eq!(raw_score(&report, "Time Performance"), 20);

        let slow: Vec<Attempt> = (1..=6).map(|n| attempt(n, 1, 600.004, true)).collect();
        let report = grade(slow);
        assert_eq!(report.analysis.task_difficulties[0].elapsed_seconds, 600.0);
        assert_eq!(count_flags(&report, FlagCode::VerySlowTasks), 1);
        assert_eq!(raw_score(&report, "Time Performance"), 80);
    }

    #[test]
    fn test_gaming_session_needs_review() {
        let attempts: Vec<Attempt> = (1..=18).map(|n| attempt(n, 1, 1.5, true)).collect();
        let report = grade(attempts);

        assert_eq!(count_flags(&report, FlagCode::SuspiciouslyFast), 1);
        assert_eq!(count_flags(&report, FlagCode::AvgTimeTooLow), 1);
        assert_eq!(raw_score(&report, "Time Performance"), 20);
        assert!(report.grading.summary.contains("REVIEW NEEDED"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let store = InMemoryAttemptStore::new();
        let mut config = GraderConfig::default_config();
        config.grading.target_exponent = 0.2;
        let result = GradingJob::new(&store, "learner").with_config(config);
        assert!(matches!(result, Err(GraderError::InvalidConfig(_))));
    }

    #[test]
    fn test_unknown_session_is_an_error() {
        let store = InMemoryAttemptStore::new();
        let result = GradingJob::new(&store, "ghost").run();
        assert!(matches!(result, Err(GraderError::MissingSession(_))));
    }

    #[test]
    fn test_malformed_attempt_is_an_error() {
        let mut bad = attempt(1, 1, 10.0, true);
        bad.sequence_index = 0;
        let store = InMemoryAttemptStore::new().with_session("learner", vec![bad]);
        let result = GradingJob::new(&store, "learner").run();
        assert!(matches!(result, Err(GraderError::MalformedAttempt(_))));
    }

    #[test]
    fn test_grading_from_file_store() {
        let store = JsonFileAttemptStore::new("src/test_files/attempts/two_students.json");
        let response = GradingJob::new(&store, "alice").run().unwrap();
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["student_id"], "alice");
        assert!(is_valid_iso8601(value["data"]["generated_at"].as_str().unwrap()));
        assert_eq!(value["data"]["analysis"]["overall"]["completed_tasks"], 3);
        assert_eq!(value["data"]["analysis"]["overall"]["total_attempts"], 4);
        assert_eq!(value["data"]["analysis"]["learning_curve"]["sample_size"], 3);
        assert_eq!(value["data"]["grading"]["criteria"].as_array().unwrap().len(), 5);
    }
}
