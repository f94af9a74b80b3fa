//! Workflow-level error types.
//!
//! Remote anonymization-audit failures are deliberately absent: the
//! controller demotes them to warnings and the queue still advances.

/// Failure reported by a remote collaborator call.
///
/// Transport-level concerns (timeouts, retries) belong to the
/// collaborator; by the time a failure reaches the engine it is just a
/// message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct RemoteFailure(pub String);

impl RemoteFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors surfaced by the workflow controller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    /// Fetching the next record failed; the controller stays on the
    /// current record instead of silently advancing.
    #[error("failed to fetch next record: {0}")]
    Fetch(RemoteFailure),

    /// Persisting the annotation failed; the record stays current.
    #[error("failed to persist annotation: {0}")]
    Persist(RemoteFailure),

    /// The requested action needs a loaded record.
    #[error("no record is currently loaded")]
    NoCurrentRecord,
}
