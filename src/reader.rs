//! Reading a character stream one line at a time.
use crate::chars::CharSource;
use crate::error::{Error, Result};
use crate::strategy::LineSeparator;
use crate::writer::LineWrite;

/// Anything that hands out lines: a [`LineSource`], or a decorator wrapping
/// one.
pub trait LineRead {
    /// Returns the next line without its terminator, or `None` when there are
    /// no more lines.
    fn read_line(&mut self) -> Result<Option<String>>;

    /// Reads and discards up to `n` lines, returning how many there actually
    /// were.
    fn skip(&mut self, n: u64) -> Result<u64> {
        let mut skipped = 0;
        while skipped < n && self.read_line()?.is_some() {
            skipped += 1;
        }
        tracing::trace!(requested = n, skipped, "skipped lines");
        Ok(skipped)
    }

    /// Writes every remaining line to `sink`, returning the number of lines
    /// transferred. Never returns if the lines never stop.
    fn transfer_to(&mut self, sink: &mut dyn LineWrite) -> Result<u64> {
        let mut transferred = 0;
        while let Some(line) = self.read_line()? {
            sink.write_line(&line)?;
            transferred += 1;
        }
        tracing::trace!(transferred, "transferred lines");
        Ok(transferred)
    }

    /// Closes the underlying stream.
    fn close(&mut self) -> Result<()>;

    /// An iterator over the remaining lines.
    fn lines(&mut self) -> Lines<'_, Self>
    where
        Self: Sized,
    {
        Lines { reader: self }
    }
}

impl<R: LineRead + ?Sized> LineRead for Box<R> {
    fn read_line(&mut self) -> Result<Option<String>> {
        (**self).read_line()
    }
    fn skip(&mut self, n: u64) -> Result<u64> {
        (**self).skip(n)
    }
    fn transfer_to(&mut self, sink: &mut dyn LineWrite) -> Result<u64> {
        (**self).transfer_to(sink)
    }
    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// The iterator returned by [`LineRead::lines`]. It stops at the first error.
#[derive(Debug)]
pub struct Lines<'a, R> {
    reader: &'a mut R,
}

impl<R: LineRead> Iterator for Lines<'_, R> {
    type Item = Result<String>;
    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_line().transpose()
    }
}

/// Reads lines from a [`CharSource`] using one [`LineSeparator`].
///
/// By default a separator at the very end of the stream just ends the last
/// line: `"foo\n"` is the single line `"foo"`. With
/// [`ignore_trailing_empty_line(false)`](LineSource::ignore_trailing_empty_line)
/// every separator starts a new line, so `"foo\n"` is `"foo"` followed by
/// `""`, and even an empty stream holds one empty line.
#[derive(Debug)]
pub struct LineSource<S> {
    source: Option<S>,
    separator: LineSeparator,
    ignore_trailing_empty_line: bool,
    at_last_line: bool,
    buffer: String,
}

impl<S: CharSource> LineSource<S> {
    /// Reads `source` using `separator`.
    #[must_use]
    pub fn new(source: S, separator: LineSeparator) -> Self {
        LineSource {
            source: Some(source),
            separator,
            ignore_trailing_empty_line: true,
            at_last_line: false,
            buffer: String::new(),
        }
    }

    /// Reads `source` using the separator [`LineSeparator::detect`] finds in it.
    pub fn detect(mut source: S) -> Result<Self> {
        let separator = LineSeparator::detect(&mut source)?;
        Ok(LineSource::new(source, separator))
    }

    /// Sets whether a separator at end of stream is followed by an empty line.
    #[must_use]
    pub fn ignore_trailing_empty_line(mut self, ignore: bool) -> Self {
        self.ignore_trailing_empty_line = ignore;
        self
    }

    /// The separator this source splits lines on
    #[must_use]
    pub fn separator(&self) -> LineSeparator {
        self.separator
    }

    /// Unwraps the character source, or `None` if it was closed.
    #[must_use]
    pub fn into_inner(self) -> Option<S> {
        self.source
    }
}

impl<S: CharSource> LineRead for LineSource<S> {
    fn read_line(&mut self) -> Result<Option<String>> {
        let source = self.source.as_mut().ok_or(Error::Closed)?;
        if self.at_last_line {
            return Ok(None);
        }
        self.buffer.clear();
        let terminator = self.separator.consume_line(source, &mut self.buffer)?;
        if terminator.is_none() {
            if self.ignore_trailing_empty_line {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
            } else {
                self.at_last_line = true;
            }
        }
        Ok(Some(self.buffer.clone()))
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut source) = self.source.take() {
            source.close()?;
            tracing::debug!(separator = self.separator.name(), "closed line source");
        }
        Ok(())
    }
}
