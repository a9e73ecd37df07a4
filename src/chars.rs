//! Character-level streams underneath the line reader and writer.
//!
//! * [`CharSource`] hands out one `char` at a time, with one character of
//!   lookahead and (optionally) mark/reset.
//! * [`CharReader`] is the `CharSource` for any `BufRead`. It decodes UTF-8,
//!   turning malformed sequences into U+FFFD, and always supports mark/reset.
//! * [`CharSink`] accepts text. Every `std::io::Write` is a `CharSink` that
//!   writes UTF-8.
use std::collections::VecDeque;
use std::io::{self, BufRead};

/// A sequential source of characters.
pub trait CharSource {
    /// Returns the next character, or `None` at end of stream.
    fn read_char(&mut self) -> io::Result<Option<char>>;

    /// Returns the next character without consuming it.
    fn peek_char(&mut self) -> io::Result<Option<char>>;

    /// Can this source [`mark`](CharSource::mark) and [`reset`](CharSource::reset)?
    fn mark_supported(&self) -> bool {
        false
    }

    /// Remembers the current position. A later `reset` returns to it, provided
    /// no more than `read_ahead_limit` characters were read in between.
    fn mark(&mut self, _read_ahead_limit: usize) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "mark is not supported"))
    }

    /// Returns to the most recent mark.
    fn reset(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "reset is not supported"))
    }

    /// Releases the underlying resource.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

const REPLACEMENT: char = '\u{FFFD}';

/// Characters read since the last `mark`, kept so `reset` can replay them.
#[derive(Debug)]
struct Mark {
    limit: usize,
    seen: Vec<char>,
    overflowed: bool,
}

/// A [`CharSource`] decoding UTF-8 from a `BufRead`.
#[derive(Debug)]
pub struct CharReader<R> {
    inner: R,
    pending: VecDeque<char>, // handed out before we decode anything new
    mark: Option<Mark>,
}

impl<R: BufRead> CharReader<R> {
    /// Wraps `inner`
    #[must_use]
    pub fn new(inner: R) -> Self {
        CharReader { inner, pending: VecDeque::new(), mark: None }
    }

    /// Unwraps the underlying reader. Characters already peeked (or replayable
    /// after a reset) are lost.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn peek_byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.inner.fill_buf()?.first().copied())
    }

    /// Decodes one character from `inner`. A malformed or truncated sequence
    /// consumes its lead byte and any valid continuation bytes, and decodes
    /// as U+FFFD.
    ///
    /// We gather the sequence a byte at a time because `fill_buf` may end in
    /// the middle of a character.
    fn decode(&mut self) -> io::Result<Option<char>> {
        let Some(lead) = self.peek_byte()? else { return Ok(None) };
        self.inner.consume(1);
        let width = utf8_width(lead);
        match width {
            0 => return Ok(Some(REPLACEMENT)),
            1 => return Ok(Some(char::from(lead))),
            _ => {}
        }
        let mut bytes = [lead, 0, 0, 0];
        for slot in &mut bytes[1..width] {
            match self.peek_byte()? {
                Some(b) if (0x80..=0xBF).contains(&b) => {
                    *slot = b;
                    self.inner.consume(1);
                }
                _ => return Ok(Some(REPLACEMENT)),
            }
        }
        let (ch, _) = bstr::decode_utf8(&bytes[..width]);
        Ok(Some(ch.unwrap_or(REPLACEMENT)))
    }
}

/// Length of the UTF-8 sequence introduced by `lead`, or 0 if `lead` can't
/// start a sequence.
fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

impl<R: BufRead> CharSource for CharReader<R> {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        let ch = match self.pending.pop_front() {
            Some(ch) => Some(ch),
            None => self.decode()?,
        };
        if let (Some(ch), Some(mark)) = (ch, self.mark.as_mut()) {
            if mark.seen.len() < mark.limit {
                mark.seen.push(ch);
            } else if !mark.overflowed {
                mark.overflowed = true;
                mark.seen = Vec::new();
            }
        }
        Ok(ch)
    }

    fn peek_char(&mut self) -> io::Result<Option<char>> {
        if let Some(&ch) = self.pending.front() {
            return Ok(Some(ch));
        }
        let ch = self.decode()?;
        if let Some(ch) = ch {
            self.pending.push_back(ch);
        }
        Ok(ch)
    }

    fn mark_supported(&self) -> bool {
        true
    }

    fn mark(&mut self, read_ahead_limit: usize) -> io::Result<()> {
        self.mark = Some(Mark { limit: read_ahead_limit, seen: Vec::new(), overflowed: false });
        Ok(())
    }

    fn reset(&mut self) -> io::Result<()> {
        let Some(mark) = self.mark.as_mut() else {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "stream not marked"));
        };
        if mark.overflowed {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "mark invalid: read-ahead limit exceeded",
            ));
        }
        for ch in mark.seen.drain(..).rev() {
            self.pending.push_front(ch);
        }
        Ok(())
    }
}

/// A sink for text.
pub trait CharSink {
    /// Writes all of `s`.
    fn write_str(&mut self, s: &str) -> io::Result<()>;

    /// Flushes anything buffered.
    fn flush(&mut self) -> io::Result<()>;

    /// Flushes and finishes the sink. Writing after `close` is an error the
    /// sink may or may not report.
    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl<W: io::Write> CharSink for W {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.write_all(s.as_bytes())
    }
    fn flush(&mut self) -> io::Result<()> {
        io::Write::flush(self)
    }
}
