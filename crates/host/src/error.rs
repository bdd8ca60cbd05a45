//! Error types for host platform operations.

/// Errors surfaced by the host platform boundary.
///
/// The variant messages carry the host's own error text; user-facing
/// notifications include nothing beyond it.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The host platform cannot be reached at all.
    ///
    /// Fatal at startup: the widget cannot function without the host.
    #[error("host platform is unavailable: {0}")]
    Unavailable(String),

    /// The host rejected a request (fetch, schema load, or user actions).
    #[error("the host rejected the request: {0}")]
    Rejected(String),

    /// A fetch named a table the host does not know.
    #[error("unknown table: {0}")]
    UnknownTable(String),
}

/// A specialized Result type for host operations.
pub type Result<T> = std::result::Result<T, HostError>;
