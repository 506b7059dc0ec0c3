use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for open-time operations.
pub type OpenResult<T> = Result<T, OpenError>;

/// Error type for failures opening a source.
///
/// Opening is the only fallible step surfaced to callers: once a load has been
/// accepted, the background routine never reports errors back (a load either
/// completes or is cancelled, and a mid-stream read failure ends the stream
/// early).
#[derive(Debug, Error)]
pub enum OpenError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Tokenizer-level failure opening the source.
    #[error("source error: {0}")]
    Source(#[from] csv::Error),

    /// The source format could not be inferred from the file extension.
    #[error("cannot infer source format from path ({})", path.display())]
    UnknownFormat { path: PathBuf },
}
