use std::collections::HashMap;

use crate::error::GraderError;
use crate::traits::store::AttemptStore;
use crate::types::Attempt;

/// Attempt logs held in memory, keyed by session id.
///
/// Unlike the file-backed store, this store knows which sessions exist: asking for an unknown
/// one is a [`GraderError::MissingSession`], while a registered session may be empty.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAttemptStore {
    sessions: HashMap<String, Vec<Attempt>>,
}

impl InMemoryAttemptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a session's log.
    pub fn with_session(mut self, session_id: impl Into<String>, attempts: Vec<Attempt>) -> Self {
        self.sessions.insert(session_id.into(), attempts);
        self
    }

    /// Appends one attempt, creating the session if needed.
    pub fn record(&mut self, session_id: &str, attempt: Attempt) -> Result<(), GraderError> {
        attempt.validate()?;
        self.sessions
            .entry(session_id.to_string())
            .or_default()
            .push(attempt);
        Ok(())
    }
}

impl AttemptStore for InMemoryAttemptStore {
    fn attempts(&self, session_id: &str) -> Result<Vec<Attempt>, GraderError> {
        self.sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| GraderError::MissingSession(session_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn attempt(task_index: u32, correct: bool) -> Attempt {
        Attempt {
            student_id: "s".into(),
            task_id: format!("1.{task_index}"),
            round: 1,
            task_index,
            sequence_index: task_index,
            attempt_number: 1,
            elapsed_seconds: 20.0,
            submitted_artifact: String::new(),
            completed_at: Utc::now(),
            is_correct: correct,
        }
    }

    #[test]
    fn test_unknown_session() {
        let store = InMemoryAttemptStore::new();
        assert!(matches!(
            store.attempts("ghost"),
            Err(GraderError::MissingSession(id)) if id == "ghost"
        ));
    }

    #[test]
    fn test_registered_empty_session() {
        let store = InMemoryAttemptStore::new().with_session("s", vec![]);
        assert!(store.attempts("s").unwrap().is_empty());
    }

    #[test]
    fn test_record_keeps_submission_order() {
        let mut store = InMemoryAttemptStore::new();
        store.record("s", attempt(2, false)).unwrap();
        store.record("s", attempt(1, true)).unwrap();
        let ids: Vec<String> = store
            .attempts("s")
            .unwrap()
            .into_iter()
            .map(|a| a.task_id)
            .collect();
        assert_eq!(ids, vec!["1.2", "1.1"]);
    }

    #[test]
    fn test_record_rejects_malformed_attempt() {
        let mut store = InMemoryAttemptStore::new();
        let mut bad = attempt(1, true);
        bad.elapsed_seconds = -1.0;
        assert!(matches!(
            store.record("s", bad),
            Err(GraderError::MalformedAttempt(_))
        ));
        assert!(store.attempts("s").is_err());
    }
}
