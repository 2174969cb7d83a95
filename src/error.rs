/// Failure taxonomy for orchestrated voice and analytics operations.
///
/// Every orchestrator collapses remote failures into one of these variants
/// instead of panicking or surfacing provider-specific error types. The
/// message is kept so callers can diagnose what the remote side reported.
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    /// The caller supplied empty text or audio; no remote call was made.
    #[error("empty input")]
    EmptyInput,

    /// The remote call itself failed (connection, HTTP status, malformed body).
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote call completed but reported something other than the
    /// expected success outcome (wrong reason code, wrong result kind,
    /// job-level or document-level error).
    #[error("unexpected result: {0}")]
    Unexpected(String),
}

/// Custom result type for orchestrated operations
pub type OperationResult<T> = Result<T, OperationError>;
