//! Decorators that restrict reading or writing to an inclusive window of line
//! indices. Line indices start at zero.
use crate::error::{Error, Result};
use crate::reader::LineRead;
use crate::writer::LineWrite;

/// An inclusive window `from_index..=to_index` of line indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    from_index: u64,
    to_index: u64,
}

impl LineRange {
    /// The window `from_index..=to_index`, which must not be inverted.
    pub fn new(from_index: u64, to_index: u64) -> Result<Self> {
        if to_index < from_index {
            return Err(Error::InvalidRange { from_index, to_index });
        }
        Ok(LineRange { from_index, to_index })
    }

    /// The first index in the window
    #[must_use]
    pub fn from_index(self) -> u64 {
        self.from_index
    }

    /// The last index in the window
    #[must_use]
    pub fn to_index(self) -> u64 {
        self.to_index
    }

    /// Is `index` in the window?
    #[must_use]
    pub fn contains(self, index: u64) -> bool {
        (self.from_index..=self.to_index).contains(&index)
    }
}

/// Reads only the lines whose indices fall in a [`LineRange`]. Lines before
/// the window are skipped on the first read; once past the window, reads
/// return `None` without touching the wrapped reader.
#[derive(Debug)]
pub struct RangeLineReader<R> {
    inner: R,
    range: LineRange,
    cursor: u64,
}

impl<R: LineRead> RangeLineReader<R> {
    /// Wraps `inner`, whose next line has index zero.
    #[must_use]
    pub fn new(inner: R, range: LineRange) -> Self {
        RangeLineReader { inner, range, cursor: 0 }
    }

    /// The index of the next line the wrapped reader will produce
    #[must_use]
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Unwraps the reader
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: LineRead> LineRead for RangeLineReader<R> {
    fn read_line(&mut self) -> Result<Option<String>> {
        if self.cursor < self.range.from_index {
            let skipped = self.inner.skip(self.range.from_index - self.cursor)?;
            self.cursor += skipped;
            if self.cursor < self.range.from_index {
                return Ok(None);
            }
        }
        if self.cursor > self.range.to_index {
            return Ok(None);
        }
        let line = self.inner.read_line()?;
        if line.is_some() {
            self.cursor = self.cursor.saturating_add(1);
        }
        Ok(line)
    }

    fn close(&mut self) -> Result<()> {
        self.inner.close()
    }
}

/// Forwards only the `write_line` and `new_line` calls whose index falls in a
/// [`LineRange`]. Every call advances the index, forwarded or not.
#[derive(Debug)]
pub struct RangeLineWriter<W> {
    inner: W,
    range: LineRange,
    cursor: u64,
}

impl<W: LineWrite> RangeLineWriter<W> {
    /// Wraps `inner`; the next call has index zero.
    #[must_use]
    pub fn new(inner: W, range: LineRange) -> Self {
        RangeLineWriter { inner, range, cursor: 0 }
    }

    /// The index the next call will have
    #[must_use]
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// The wrapped writer
    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwraps the writer
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Advances the cursor, reporting whether the call it stood for is in the
    /// window.
    fn advance(&mut self) -> bool {
        let in_range = self.range.contains(self.cursor);
        self.cursor = self.cursor.saturating_add(1);
        in_range
    }
}

impl<W: LineWrite> LineWrite for RangeLineWriter<W> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        if self.advance() {
            self.inner.write_line(line)?;
        }
        Ok(())
    }

    fn new_line(&mut self) -> Result<()> {
        if self.advance() {
            self.inner.new_line()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()
    }

    fn close(&mut self) -> Result<()> {
        self.inner.close()
    }
}
