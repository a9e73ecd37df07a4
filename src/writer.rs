//! Writing lines to a character sink.
use crate::chars::CharSink;
use crate::error::{Error, Result};
use crate::strategy::{LineSeparator, NativeSeparator};

/// Anything that accepts lines: a [`LineSink`], or a decorator wrapping one.
pub trait LineWrite {
    /// Writes `line`, preceded by a separator unless it's the first line.
    fn write_line(&mut self, line: &str) -> Result<()>;

    /// Writes a separator, whether or not any line has been written.
    fn new_line(&mut self) -> Result<()>;

    /// Flushes the underlying sink.
    fn flush(&mut self) -> Result<()>;

    /// Closes the underlying sink.
    fn close(&mut self) -> Result<()>;
}

impl<W: LineWrite + ?Sized> LineWrite for Box<W> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        (**self).write_line(line)
    }
    fn new_line(&mut self) -> Result<()> {
        (**self).new_line()
    }
    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Writes lines to a [`CharSink`], putting the separator *between* lines:
/// writing `"a"` and `"b"` produces `"a\nb"`. Set
/// [`append_trailing_separator_on_close`](LineSink::append_trailing_separator_on_close)
/// to get `"a\nb\n"`.
///
/// Lines are written verbatim; a line containing separator characters is not
/// an error.
#[derive(Debug)]
pub struct LineSink<W> {
    sink: Option<W>,
    separator: LineSeparator,
    native: NativeSeparator,
    append_trailing_separator_on_close: bool,
    is_first_line: bool,
}

impl<W: CharSink> LineSink<W> {
    /// Writes to `sink` using `separator`.
    #[must_use]
    pub fn new(sink: W, separator: LineSeparator) -> Self {
        LineSink {
            sink: Some(sink),
            separator,
            native: NativeSeparator::host(),
            append_trailing_separator_on_close: false,
            is_first_line: true,
        }
    }

    /// Sets what `LineSeparator::PlatformDefault` writes. Defaults to
    /// [`NativeSeparator::host()`].
    #[must_use]
    pub fn native(mut self, native: NativeSeparator) -> Self {
        self.native = native;
        self
    }

    /// Sets whether `close` writes one last separator.
    #[must_use]
    pub fn append_trailing_separator_on_close(mut self, append: bool) -> Self {
        self.append_trailing_separator_on_close = append;
        self
    }

    /// The separator written between lines
    #[must_use]
    pub fn separator(&self) -> LineSeparator {
        self.separator
    }

    /// Unwraps the sink, or `None` if it was closed. Nothing is flushed.
    #[must_use]
    pub fn into_inner(self) -> Option<W> {
        self.sink
    }

    fn sink(&mut self) -> Result<&mut W> {
        self.sink.as_mut().ok_or(Error::Closed)
    }

    fn write_separator(&mut self) -> Result<()> {
        let text = self.separator.as_str_for(self.native);
        self.sink()?.write_str(text)?;
        Ok(())
    }
}

impl<W: CharSink> LineWrite for LineSink<W> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        if self.is_first_line {
            self.sink()?;
            self.is_first_line = false;
        } else {
            self.write_separator()?;
        }
        self.sink()?.write_str(line)?;
        Ok(())
    }

    fn new_line(&mut self) -> Result<()> {
        self.write_separator()
    }

    fn flush(&mut self) -> Result<()> {
        self.sink()?.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let Some(mut sink) = self.sink.take() else { return Ok(()) };
        // The sink is closed even if the trailing separator can't be written.
        let trailing = if self.append_trailing_separator_on_close {
            sink.write_str(self.separator.as_str_for(self.native))
        } else {
            Ok(())
        };
        let closed = sink.close();
        tracing::debug!(separator = self.separator.name(), "closed line sink");
        trailing?;
        closed?;
        Ok(())
    }
}

#[allow(clippy::pedantic)]
#[cfg(test)]
mod test {
    use super::*;
    use crate::chars::CharReader;
    use crate::reader::{LineRead, LineSource};
    use proptest::prelude::*;

    fn written(
        separator: LineSeparator,
        trailing: bool,
        actions: impl FnOnce(&mut LineSink<&mut Vec<u8>>),
    ) -> String {
        let mut out = Vec::new();
        let mut sink = LineSink::new(&mut out, separator)
            .native(NativeSeparator::Lf)
            .append_trailing_separator_on_close(trailing);
        actions(&mut sink);
        sink.close().unwrap();
        drop(sink);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn separators_go_between_lines() {
        let text = written(LineSeparator::CrLf, false, |sink| {
            for line in ["a", "b", "c"] {
                sink.write_line(line).unwrap();
            }
        });
        assert_eq!(text, "a\r\nb\r\nc");
    }

    #[test]
    fn close_can_append_a_trailing_separator() {
        let text = written(LineSeparator::Cr, true, |sink| {
            sink.write_line("a").unwrap();
            sink.write_line("b").unwrap();
        });
        assert_eq!(text, "a\rb\r");
    }

    #[test]
    fn new_line_does_not_count_as_the_first_line() {
        let text = written(LineSeparator::Lf, false, |sink| {
            sink.new_line().unwrap();
            sink.write_line("a").unwrap();
            sink.new_line().unwrap();
            sink.write_line("b").unwrap();
        });
        assert_eq!(text, "\na\n\nb");
    }

    #[test]
    fn empty_first_line_still_counts() {
        let text = written(LineSeparator::Lf, false, |sink| {
            sink.write_line("").unwrap();
            sink.write_line("x").unwrap();
        });
        assert_eq!(text, "\nx");
    }

    #[test]
    fn content_is_written_verbatim() {
        let text = written(LineSeparator::Lf, false, |sink| {
            sink.write_line("a\r\nb").unwrap();
        });
        assert_eq!(text, "a\r\nb");
    }

    #[test]
    fn platform_default_uses_the_injected_native_separator() {
        let mut out = Vec::new();
        let mut sink =
            LineSink::new(&mut out, LineSeparator::PlatformDefault).native(NativeSeparator::CrLf);
        sink.write_line("a").unwrap();
        sink.write_line("b").unwrap();
        sink.close().unwrap();
        drop(sink);
        assert_eq!(out, b"a\r\nb");
    }

    #[test]
    fn writing_after_close_fails() {
        let mut out = Vec::new();
        let mut sink = LineSink::new(&mut out, LineSeparator::Lf);
        sink.close().unwrap();
        sink.close().unwrap();
        assert!(matches!(sink.write_line("late"), Err(Error::Closed)));
        assert!(matches!(sink.new_line(), Err(Error::Closed)));
    }

    /// Fails every write, and records whether it was closed.
    struct BrokenSink<'a> {
        closed: &'a mut bool,
    }

    impl CharSink for BrokenSink<'_> {
        fn write_str(&mut self, _s: &str) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "broken"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
        fn close(&mut self) -> std::io::Result<()> {
            *self.closed = true;
            Ok(())
        }
    }

    #[test]
    fn failed_trailing_separator_still_closes_the_sink() {
        let mut closed = false;
        let mut sink = LineSink::new(BrokenSink { closed: &mut closed }, LineSeparator::Lf)
            .append_trailing_separator_on_close(true);
        assert!(matches!(sink.close(), Err(Error::Io(_))));
        assert!(sink.close().is_ok());
        assert!(matches!(sink.write_line("late"), Err(Error::Closed)));
        drop(sink);
        assert!(closed);
    }

    fn separator_strategy() -> impl Strategy<Value = LineSeparator> {
        prop_oneof![
            Just(LineSeparator::Lf),
            Just(LineSeparator::CrLf),
            Just(LineSeparator::Cr),
            Just(LineSeparator::PlatformDefault),
        ]
    }

    proptest! {
        #[test]
        fn lines_read_back_as_written(
            lines in proptest::collection::vec("[^\r\n]*", 0..8),
            separator in separator_strategy(),
            trailing in any::<bool>(),
        ) {
            // Without a trailing separator, an empty last line leaves no trace.
            prop_assume!(match lines.last() {
                None => !trailing,
                Some(last) => trailing || !last.is_empty(),
            });
            let text = written(separator, trailing, |sink| {
                for line in &lines {
                    sink.write_line(line).unwrap();
                }
            });
            let mut reader = LineSource::new(CharReader::new(text.as_bytes()), separator);
            let read: Vec<String> = reader.lines().collect::<Result<_>>().unwrap();
            prop_assert_eq!(read, lines);
        }
    }
}
