//! Shared helpers for the grading workspace: the grading configuration file, numeric
//! presentation rounding, and validation-error formatting.

pub mod grading_config;
pub mod rounding;
pub mod validation;
