//! Result verifier: decides whether a submitted query result matches the reference result.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. submitted execution error
//! 2. column count
//! 3. row count
//! 4. column names (case-folded, trimmed, order-insensitive)
//! 5. row contents, after reordering submitted columns into the reference order and
//!    normalizing every cell (see [`normalization`](super::normalization)). Rows are compared
//!    position by position when order matters, otherwise as sorted multisets.

use crate::traits::engine::ExecutionEngine;
use crate::types::QueryResult;
use crate::verifier::normalization::{align_row, compare_rows, normalize_cell, normalize_column};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

pub const MATCH_MESSAGE: &str = "Correct! Your result matches the expected output.";

/// Why a verification failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    /// The submitted artifact could not be executed.
    ExecutionError,
    /// The reference artifact could not be executed.
    ReferenceError,
    ColumnCount,
    RowCount,
    ColumnNames,
    RowOrder,
    RowContent,
}

/// Structured verification result. A mismatch is an expected outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationOutcome {
    pub is_match: bool,
    pub message: String,
    pub mismatch: Option<MismatchKind>,
}

impl VerificationOutcome {
    fn matched() -> Self {
        Self {
            is_match: true,
            message: MATCH_MESSAGE.to_string(),
            mismatch: None,
        }
    }

    fn mismatch(kind: MismatchKind, message: String) -> Self {
        Self {
            is_match: false,
            message,
            mismatch: Some(kind),
        }
    }
}

/// Verifies submissions by executing them next to a reference artifact.
pub struct ResultVerifier<'a> {
    engine: &'a dyn ExecutionEngine,
}

impl<'a> ResultVerifier<'a> {
    pub fn new(engine: &'a dyn ExecutionEngine) -> Self {
        Self { engine }
    }

    /// Executes both artifacts against `dataset` and compares their results.
    ///
    /// The two executions are independent and are awaited concurrently.
    pub async fn verify(
        &self,
        submitted: &str,
        reference: &str,
        dataset: &str,
        order_matters: bool,
    ) -> VerificationOutcome {
        let (submitted_result, reference_result) = tokio::join!(
            self.engine.execute(submitted, dataset),
            self.engine.execute(reference, dataset)
        );

        let submitted_result = match submitted_result {
            Ok(r) => r,
            Err(e) => {
                debug!(dataset, "submitted artifact failed to execute: {e}");
                return VerificationOutcome::mismatch(
                    MismatchKind::ExecutionError,
                    format!("Query error: {e}"),
                );
            }
        };

        let reference_result = match reference_result {
            Ok(r) => r,
            Err(e) => {
                warn!(dataset, "reference artifact failed to execute: {e}");
                return VerificationOutcome::mismatch(
                    MismatchKind::ReferenceError,
                    format!("The reference solution could not be executed: {e}"),
                );
            }
        };

        compare_results(&submitted_result, &reference_result, order_matters)
    }
}

/// Compares two already-executed results.
pub fn compare_results(
    submitted: &QueryResult,
    reference: &QueryResult,
    order_matters: bool,
) -> VerificationOutcome {
    if submitted.columns.len() != reference.columns.len() {
        return VerificationOutcome::mismatch(
            MismatchKind::ColumnCount,
            format!(
                "Column count mismatch: expected {} columns, got {}.",
                reference.columns.len(),
                submitted.columns.len()
            ),
        );
    }

    if submitted.rows.len() != reference.rows.len() {
        return VerificationOutcome::mismatch(
            MismatchKind::RowCount,
            format!(
                "Row count mismatch: expected {} rows, got {}.",
                reference.rows.len(),
                submitted.rows.len()
            ),
        );
    }

    let submitted_columns: Vec<String> =
        submitted.columns.iter().map(|c| normalize_column(c)).collect();
    let reference_columns: Vec<String> =
        reference.columns.iter().map(|c| normalize_column(c)).collect();

    let mut submitted_sorted = submitted_columns.clone();
    let mut reference_sorted = reference_columns.clone();
    submitted_sorted.sort();
    reference_sorted.sort();
    if submitted_sorted != reference_sorted {
        return VerificationOutcome::mismatch(
            MismatchKind::ColumnNames,
            format!(
                "Column names do not match the expected output. Your columns: {}",
                submitted.columns.join(", ")
            ),
        );
    }

    let mut submitted_index: HashMap<String, usize> = HashMap::new();
    for (i, col) in submitted_columns.iter().enumerate() {
        submitted_index.entry(col.clone()).or_insert(i);
    }

    let mut submitted_rows: Vec<Vec<String>> = submitted
        .rows
        .iter()
        .map(|row| align_row(row, &reference_columns, &submitted_index))
        .collect();
    let mut reference_rows: Vec<Vec<String>> = reference
        .rows
        .iter()
        .map(|row| row.iter().map(normalize_cell).collect())
        .collect();

    if order_matters {
        for (i, (s, r)) in submitted_rows.iter().zip(reference_rows.iter()).enumerate() {
            if s != r {
                return VerificationOutcome::mismatch(
                    MismatchKind::RowOrder,
                    format!(
                        "Row {} does not match the expected output. Check your ORDER BY clause.",
                        i + 1
                    ),
                );
            }
        }
    } else {
        submitted_rows.sort_by(|a, b| compare_rows(a, b));
        reference_rows.sort_by(|a, b| compare_rows(a, b));
        if submitted_rows != reference_rows {
            return VerificationOutcome::mismatch(
                MismatchKind::RowContent,
                "Your result contains the right shape but different values. Check your query logic."
                    .to_string(),
            );
        }
    }

    VerificationOutcome::matched()
}
