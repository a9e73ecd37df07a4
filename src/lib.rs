//! Line-oriented text I/O that knows exactly which line separator it's using.
//!
//! * [`LineSeparator`] is one of `\n`, `\r\n`, `\r`, or the platform default.
//!   It knows how to find the end of a line, how to spell itself on output,
//!   and how to [`detect`](LineSeparator::detect) which separator a stream
//!   uses.
//! * [`LineSource`] reads lines from a [`CharSource`](chars::CharSource),
//!   deciding whether a separator at end of stream implies one more (empty)
//!   line.
//! * [`LineSink`] writes lines to a [`CharSink`](chars::CharSink), putting
//!   separators *between* lines, and optionally one more at close.
//! * [`CountingLineReader`], [`CountingLineWriter`], [`RangeLineReader`], and
//!   [`RangeLineWriter`] wrap anything implementing [`LineRead`] or
//!   [`LineWrite`] to count lines or to restrict them to a [`LineRange`].
//! * The `io` module opens files as decoded character streams, and the `args`
//!   module parses the command line of the `linesep` binary.
//!
//! ```
//! use linesep::chars::CharReader;
//! use linesep::{LineRead, LineSeparator, LineSink, LineSource, LineWrite};
//!
//! let mut reader = LineSource::detect(CharReader::new(&b"one\r\ntwo\r\n"[..]))?;
//! assert_eq!(reader.separator(), LineSeparator::CrLf);
//!
//! let mut out = Vec::new();
//! let mut sink = LineSink::new(&mut out, LineSeparator::Lf);
//! assert_eq!(reader.transfer_to(&mut sink)?, 2);
//! sink.close()?;
//! drop(sink);
//! assert_eq!(out, b"one\ntwo");
//! # Ok::<(), linesep::Error>(())
//! ```
//!
//! Nothing here is synchronized: each reader or writer owns its stream, and
//! sharing one between threads is up to the caller.

#![cfg_attr(debug_assertions, allow(dead_code, unused_imports))]
#![deny(unused_must_use)]
#![deny(clippy::all)]
#![allow(clippy::needless_return)]
#![deny(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![deny(missing_docs)]

pub mod args;
pub mod chars;
mod error;
pub mod io;
mod reader;
mod strategy;
mod tally;
mod window;
mod writer;

pub use crate::error::{Error, Result};
pub use crate::reader::{LineRead, LineSource, Lines};
pub use crate::strategy::{LineSeparator, NativeSeparator, DETECTION_SAMPLE_LIMIT};
pub use crate::tally::{CountingLineReader, CountingLineWriter};
pub use crate::window::{LineRange, RangeLineReader, RangeLineWriter};
pub use crate::writer::{LineSink, LineWrite};
