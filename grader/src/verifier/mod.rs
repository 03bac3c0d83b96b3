//! # Result Verification
//!
//! Decides whether a submitted artifact produces the same table as a reference artifact.
//!
//! - [`result_verifier`]: the comparison algorithm and the engine-driven [`ResultVerifier`].
//! - [`normalization`]: cell/column canonicalization shared by both sides of a comparison.

pub mod normalization;
pub mod result_verifier;

pub use result_verifier::{
    MismatchKind, ResultVerifier, VerificationOutcome, compare_results,
};
