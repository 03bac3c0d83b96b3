//! # Types Module
//!
//! Core records shared by the verifier, the analysis stage and the grading engine:
//! the raw [`Attempt`] log entry and the tabular [`QueryResult`] returned by an execution engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GraderError;

/// One submission event, as appended by the attempt store.
///
/// Attempts are never mutated after they are recorded. `task_id` has the form
/// `"<round>.<task_index>"`, `sequence_index` is the 1-based position of the task in the whole
/// curriculum and `attempt_number` is 1-based within a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub student_id: String,
    pub task_id: String,
    pub round: u32,
    pub task_index: u32,
    pub sequence_index: u32,
    pub attempt_number: u32,
    pub elapsed_seconds: f64,
    #[serde(default)]
    pub submitted_artifact: String,
    pub completed_at: DateTime<Utc>,
    pub is_correct: bool,
}

impl Attempt {
    /// Checks the record-level invariants of the attempt log.
    pub fn validate(&self) -> Result<(), GraderError> {
        if self.sequence_index == 0 {
            return Err(GraderError::MalformedAttempt(format!(
                "task {}: sequence_index must be at least 1",
                self.task_id
            )));
        }
        if self.attempt_number == 0 {
            return Err(GraderError::MalformedAttempt(format!(
                "task {}: attempt_number must be at least 1",
                self.task_id
            )));
        }
        if !self.elapsed_seconds.is_finite() || self.elapsed_seconds < 0.0 {
            return Err(GraderError::MalformedAttempt(format!(
                "task {}: elapsed_seconds must be a non-negative number, got {}",
                self.task_id, self.elapsed_seconds
            )));
        }
        let expected_id = format!("{}.{}", self.round, self.task_index);
        if self.task_id != expected_id {
            return Err(GraderError::MalformedAttempt(format!(
                "task id '{}' does not match round {} / task {}",
                self.task_id, self.round, self.task_index
            )));
        }
        Ok(())
    }
}

/// A single scalar in a result row.
///
/// Deserializes straight from JSON scalars: `null`, booleans, numbers and strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Null)
    }
}

/// Tabular output of executing an artifact: column names plus rows of scalars.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }
}
