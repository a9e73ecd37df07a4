//! The crate's error type. Running out of lines is not an error: readers
//! report end of stream as `Ok(None)`.
use std::io;

/// Everything that can go wrong while reading or writing lines.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The underlying character stream failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Separator detection needs to rewind its source, and this source can't.
    #[error("separator detection requires a character source that supports mark/reset")]
    MarkUnsupported,

    /// A line window whose end comes before its start.
    #[error("invalid line range: from_index {from_index} is greater than to_index {to_index}")]
    InvalidRange {
        /// First line index of the window
        from_index: u64,
        /// Last line index of the window
        to_index: u64,
    },

    /// A separator name we don't recognize.
    #[error("unknown line separator `{0}` (expected lf, crlf, cr, or native)")]
    UnknownSeparator(String),

    /// An encoding label `encoding_rs` doesn't recognize.
    #[error("unknown character encoding `{0}`")]
    UnknownEncoding(String),

    /// The line reader or writer was already closed.
    #[error("line stream is closed")]
    Closed,
}

/// `Result` with the crate's [`Error`] as the default error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
