use thiserror::Error;

/// Everything a writer operation can fail with.
///
/// `UnknownMode`, `TimestampFormat` and `Render` are configuration errors
/// raised synchronously with no state changed; `Io` carries filesystem and
/// sink failures from the write call that triggered them.
#[derive(Debug, Error)]
pub enum WriterError {
    /// A raw mode value outside {1=Both, 2=Console, 3=File}.
    #[error("unknown mode: {0}")]
    UnknownMode(String),

    /// A timestamp pattern chrono cannot parse, caught at construction.
    #[error("invalid timestamp format {0:?}")]
    TimestampFormat(String),

    /// A value serde_json cannot model (e.g. a map with non-string keys).
    #[error("value cannot be rendered as a line: {0}")]
    Render(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
