//! Decorators that count the lines passing through them.
use crate::error::Result;
use crate::reader::LineRead;
use crate::writer::LineWrite;

/// Counts the lines read through it. Calls that find no line don't count.
#[derive(Debug)]
pub struct CountingLineReader<R> {
    inner: R,
    count: u64,
}

impl<R: LineRead> CountingLineReader<R> {
    /// Wraps `inner`, starting the count at zero
    #[must_use]
    pub fn new(inner: R) -> Self {
        CountingLineReader { inner, count: 0 }
    }

    /// Lines read (or skipped) so far
    #[must_use]
    pub fn line_count(&self) -> u64 {
        self.count
    }

    /// Unwraps the reader
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: LineRead> LineRead for CountingLineReader<R> {
    fn read_line(&mut self) -> Result<Option<String>> {
        let line = self.inner.read_line()?;
        if line.is_some() {
            self.count += 1;
        }
        Ok(line)
    }

    fn skip(&mut self, n: u64) -> Result<u64> {
        let skipped = self.inner.skip(n)?;
        self.count += skipped;
        Ok(skipped)
    }

    fn close(&mut self) -> Result<()> {
        self.inner.close()
    }
}

/// Counts every `write_line` and `new_line` that reaches it.
#[derive(Debug)]
pub struct CountingLineWriter<W> {
    inner: W,
    count: u64,
}

impl<W: LineWrite> CountingLineWriter<W> {
    /// Wraps `inner`, starting the count at zero
    #[must_use]
    pub fn new(inner: W) -> Self {
        CountingLineWriter { inner, count: 0 }
    }

    /// Lines written so far, blank ones from `new_line` included
    #[must_use]
    pub fn line_count(&self) -> u64 {
        self.count
    }

    /// Unwraps the writer
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: LineWrite> LineWrite for CountingLineWriter<W> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.inner.write_line(line)?;
        self.count += 1;
        Ok(())
    }

    fn new_line(&mut self) -> Result<()> {
        self.inner.new_line()?;
        self.count += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()
    }

    fn close(&mut self) -> Result<()> {
        self.inner.close()
    }
}
