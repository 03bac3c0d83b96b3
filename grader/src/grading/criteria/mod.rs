//! The five grading criteria.
//!
//! Each criterion reads the [`AnalysisResult`](crate::analysis::AnalysisResult) and the grading
//! thresholds, and nothing else. Weighting happens in the engine.

pub mod completion;
pub mod efficiency;
pub mod improvement;
pub mod learning_curve;
pub mod time_performance;
