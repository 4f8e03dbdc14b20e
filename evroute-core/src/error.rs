use thiserror::Error;

/// Error taxonomy for the route planning pipeline.
///
/// Components return these as-is; only the server layer translates them
/// into response codes. Empty candidate sets and unreachable destinations
/// are reported as `NoRoute`, never as panics or ad hoc strings.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed input, rejected before any network call.
    #[error("invalid request: {0}")]
    Validation(String),
    /// Structurally valid input with provably no feasible path.
    #[error("no feasible route: {hint}")]
    NoRoute { hint: String },
    /// The routing/matrix provider failed or returned malformed data.
    #[error("routing provider failure: {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },
    /// The per-request wall-clock budget elapsed.
    #[error("request exceeded the {budget_ms} ms budget")]
    Timeout { budget_ms: u64 },
    /// The request was cancelled externally (e.g. superseded by a newer one).
    #[error("request cancelled")]
    Cancelled,
    /// Malformed local data, such as an unreadable charger dataset.
    #[error("invalid data: {0}")]
    InvalidData(String),
    /// Unexpected invariant violation.
    #[error("internal error: {0}")]
    Internal(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
