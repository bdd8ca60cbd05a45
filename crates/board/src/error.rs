//! Error types for board operations.

/// Errors surfaced by the board engine.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// The widget configuration is unusable.
    #[error(transparent)]
    Config(#[from] kanri_config::ConfigError),

    /// A host platform call failed.
    #[error(transparent)]
    Host(#[from] kanri_host::HostError),
}

/// A specialized Result type for board operations.
pub type Result<T> = std::result::Result<T, BoardError>;
