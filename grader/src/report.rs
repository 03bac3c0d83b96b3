//! # Session Report Module
//!
//! Serializable output of a grading run: the full [`AnalysisResult`] and the [`GradingResult`]
//! for one student, plus the response envelope handed to exporters.
//!
//! ## JSON Output Example
//!
//! ```json
//! {
//!   "success": true,
//!   "message": "Grading complete.",
//!   "data": {
//!     "student_id": "alice",
//!     "generated_at": "2025-03-01T12:00:00Z",
//!     "analysis": { "learning_curve": { ... }, "rounds": [ ... ], "task_difficulties": [ ... ], "overall": { ... } },
//!     "grading": { "total_score": 84, "letter_grade": "B", "criteria": [ ... ], "flags": [ ... ], "summary": "..." }
//!   }
//! }
//! ```
//!
//! [`SessionReport`] only carries data; it plays no part in the scoring itself.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::AnalysisResult;
use crate::grading::GradingResult;

/// Everything produced for one student's session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub student_id: String,
    pub generated_at: DateTime<Utc>,
    pub analysis: AnalysisResult,
    pub grading: GradingResult,
}

/// Response envelope around a [`SessionReport`].
#[derive(Debug, Clone, Serialize)]
pub struct SessionReportResponse {
    pub success: bool,
    pub message: String,
    pub data: SessionReport,
}

impl From<SessionReport> for SessionReportResponse {
    fn from(report: SessionReport) -> Self {
        SessionReportResponse {
            success: true,
            message: "Grading complete.".to_string(),
            data: report,
        }
    }
}
