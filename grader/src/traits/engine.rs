use crate::error::ExecutionFailure;
use crate::types::QueryResult;
use async_trait::async_trait;

/// Executes a submitted artifact (e.g. a query string) against a target dataset.
///
/// Implementations are external to this crate. The verifier calls `execute` twice per
/// verification (submitted and reference artifact) and may run both calls concurrently, so
/// implementations must not rely on call order.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    async fn execute(&self, artifact: &str, dataset: &str) -> Result<QueryResult, ExecutionFailure>;
}
