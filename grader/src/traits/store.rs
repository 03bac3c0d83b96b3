use crate::error::GraderError;
use crate::types::Attempt;

/// Source of the read-only attempt log for a session.
///
/// Returned attempts are in submission order. A session that exists but has no attempts
/// yields an empty list.
pub trait AttemptStore {
    fn attempts(&self, session_id: &str) -> Result<Vec<Attempt>, GraderError>;
}
