/// Result alias that carries the custom [`SortVizError`] type.
pub type Result<T> = std::result::Result<T, SortVizError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum SortVizError {
    /// A sort was requested while another session is still active.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// An algorithm name could not be parsed.
    #[error("unknown sorting algorithm `{0}`")]
    UnknownAlgorithm(String),
    /// A shared lock was poisoned by a panicking holder.
    #[error("{0} has been poisoned")]
    Poisoned(&'static str),
    /// The background sort worker panicked before it could be joined.
    #[error("sort worker panicked")]
    WorkerPanicked,
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Wrapper around configuration (de)serialisation errors.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}
