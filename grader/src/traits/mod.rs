//!
//! Traits Module
//!
//! Seams between the grading core and its collaborators.
//!
//! - [`engine`]: executes an artifact against a dataset (consumed by the result verifier).
//! - [`store`]: supplies the attempt log for a session.
//! - [`criterion`]: one independently scored grading criterion.

pub mod criterion;
pub mod engine;
pub mod store;
