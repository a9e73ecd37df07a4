//! Line separators: how each one ends a line on input, how it's spelled on
//! output, and how to guess which one a stream uses.
use std::fmt;
use std::io;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::chars::CharSource;
use crate::error::{Error, Result};

/// The number of characters `detect` examines before deciding.
pub const DETECTION_SAMPLE_LIMIT: usize = 8000;

/// The line separator convention of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineSeparator {
    /// `\n`
    Lf,
    /// `\r\n`. A `\r` not followed by `\n` is ordinary line content.
    CrLf,
    /// `\r`
    Cr,
    /// On input, either `\n` or `\r` ends a line. On output, the native
    /// separator of the platform (see [`NativeSeparator`]).
    PlatformDefault,
}

/// The separator `LineSeparator::PlatformDefault` writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeSeparator {
    /// `\n`, the Unix convention
    Lf,
    /// `\r\n`, the Windows convention
    CrLf,
}

static HOST_SEPARATOR: Lazy<NativeSeparator> =
    Lazy::new(|| if cfg!(windows) { NativeSeparator::CrLf } else { NativeSeparator::Lf });

impl NativeSeparator {
    /// The native separator of the platform we were compiled for, looked up
    /// once per process.
    #[must_use]
    pub fn host() -> Self {
        *HOST_SEPARATOR
    }

    /// The separator's text
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NativeSeparator::Lf => "\n",
            NativeSeparator::CrLf => "\r\n",
        }
    }
}

impl Default for NativeSeparator {
    fn default() -> Self {
        NativeSeparator::host()
    }
}

impl LineSeparator {
    /// The text written for this separator, with `PlatformDefault` rendered as
    /// `native`.
    #[must_use]
    pub fn as_str_for(self, native: NativeSeparator) -> &'static str {
        match self {
            LineSeparator::Lf => "\n",
            LineSeparator::CrLf => "\r\n",
            LineSeparator::Cr => "\r",
            LineSeparator::PlatformDefault => native.as_str(),
        }
    }

    /// The text written for this separator on the host platform.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.as_str_for(NativeSeparator::host())
    }

    /// The short name used on the command line and in `Display`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            LineSeparator::Lf => "lf",
            LineSeparator::CrLf => "crlf",
            LineSeparator::Cr => "cr",
            LineSeparator::PlatformDefault => "native",
        }
    }

    /// Reads one line's worth of characters from `source`, appending
    /// everything but the terminator to `line`. Returns the terminator's last
    /// character, or `None` if the source ran out first.
    pub fn consume_line<S: CharSource + ?Sized>(
        self,
        source: &mut S,
        line: &mut String,
    ) -> io::Result<Option<char>> {
        match self {
            LineSeparator::Lf => consume_until(source, line, |ch| ch == '\n'),
            LineSeparator::Cr => consume_until(source, line, |ch| ch == '\r'),
            LineSeparator::PlatformDefault => {
                consume_until(source, line, |ch| ch == '\n' || ch == '\r')
            }
            LineSeparator::CrLf => {
                while let Some(ch) = source.read_char()? {
                    if ch == '\r' && source.peek_char()? == Some('\n') {
                        source.read_char()?;
                        return Ok(Some('\n'));
                    }
                    line.push(ch);
                }
                Ok(None)
            }
        }
    }

    /// Guesses the separator `source` uses from (at most) its first
    /// [`DETECTION_SAMPLE_LIMIT`] characters, then rewinds `source` so
    /// reading starts from where it was.
    ///
    /// `\r\n` counts as CRLF. Any other `\r` counts as CR, so `\r\r\n` is one
    /// CR and one CRLF. If the three counts are all equal (no separators at
    /// all, for instance) the answer is `PlatformDefault`. Otherwise the most
    /// frequent wins, with ties going to LF, then CRLF, then CR.
    pub fn detect<S: CharSource + ?Sized>(source: &mut S) -> Result<LineSeparator> {
        if !source.mark_supported() {
            return Err(Error::MarkUnsupported);
        }
        source.mark(DETECTION_SAMPLE_LIMIT)?;
        let counts = count_separators(source)?;
        source.reset()?;

        let detected = counts.verdict();
        tracing::debug!(
            lf = counts.lf,
            crlf = counts.crlf,
            cr = counts.cr,
            separator = detected.name(),
            "detected line separator"
        );
        Ok(detected)
    }
}

fn consume_until<S: CharSource + ?Sized>(
    source: &mut S,
    line: &mut String,
    is_terminator: impl Fn(char) -> bool,
) -> io::Result<Option<char>> {
    while let Some(ch) = source.read_char()? {
        if is_terminator(ch) {
            return Ok(Some(ch));
        }
        line.push(ch);
    }
    Ok(None)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct SeparatorCounts {
    lf: u32,
    crlf: u32,
    cr: u32,
}

fn count_separators<S: CharSource + ?Sized>(source: &mut S) -> io::Result<SeparatorCounts> {
    let mut counts = SeparatorCounts::default();
    let mut after_cr = false;
    for _ in 0..DETECTION_SAMPLE_LIMIT {
        let Some(ch) = source.read_char()? else { break };
        match ch {
            '\n' if after_cr => counts.crlf += 1,
            '\n' => counts.lf += 1,
            '\r' if after_cr => counts.cr += 1,
            '\r' => {}
            _ if after_cr => counts.cr += 1,
            _ => {}
        }
        after_cr = ch == '\r';
    }
    if after_cr {
        counts.cr += 1;
    }
    Ok(counts)
}

impl SeparatorCounts {
    fn verdict(self) -> LineSeparator {
        let SeparatorCounts { lf, crlf, cr } = self;
        let max = lf.max(crlf).max(cr);
        let min = lf.min(crlf).min(cr);
        if max == min {
            LineSeparator::PlatformDefault
        } else if lf == max {
            LineSeparator::Lf
        } else if crlf == max {
            LineSeparator::CrLf
        } else {
            LineSeparator::Cr
        }
    }
}

impl fmt::Display for LineSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LineSeparator {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "lf" | "unix" => Ok(LineSeparator::Lf),
            "crlf" | "dos" | "windows" => Ok(LineSeparator::CrLf),
            "cr" | "mac" => Ok(LineSeparator::Cr),
            "native" | "platform" | "default" => Ok(LineSeparator::PlatformDefault),
            _ => Err(Error::UnknownSeparator(s.to_owned())),
        }
    }
}

#[allow(clippy::pedantic)]
#[cfg(test)]
mod test {
    use super::*;
    use crate::chars::CharReader;

    fn detect(text: &str) -> LineSeparator {
        let mut reader = CharReader::new(text.as_bytes());
        LineSeparator::detect(&mut reader).unwrap()
    }

    fn lines_of(text: &str, separator: LineSeparator) -> Vec<(String, Option<char>)> {
        let mut reader = CharReader::new(text.as_bytes());
        let mut result = Vec::new();
        loop {
            let mut line = String::new();
            let end = separator.consume_line(&mut reader, &mut line).unwrap();
            let done = end.is_none();
            result.push((line, end));
            if done {
                return result;
            }
        }
    }

    fn s(text: &str, end: Option<char>) -> (String, Option<char>) {
        (text.to_string(), end)
    }

    #[test]
    fn lf_keeps_carriage_returns_as_content() {
        assert_eq!(
            lines_of("a\r\nb\rc\n", LineSeparator::Lf),
            vec![s("a\r", Some('\n')), s("b\rc", Some('\n')), s("", None)]
        );
    }

    #[test]
    fn cr_keeps_line_feeds_as_content() {
        assert_eq!(
            lines_of("a\r\nb\r", LineSeparator::Cr),
            vec![s("a", Some('\r')), s("\nb", Some('\r')), s("", None)]
        );
    }

    #[test]
    fn crlf_needs_both_characters() {
        assert_eq!(
            lines_of("a\rb\r\r\nc\nd\r", LineSeparator::CrLf),
            vec![s("a\rb\r", Some('\n')), s("c\nd\r", None)]
        );
    }

    #[test]
    fn platform_default_reads_either_character_singly() {
        assert_eq!(
            lines_of("a\r\nb\nc\rd", LineSeparator::PlatformDefault),
            vec![
                s("a", Some('\r')),
                s("", Some('\n')),
                s("b", Some('\n')),
                s("c", Some('\r')),
                s("d", None)
            ]
        );
    }

    #[test]
    fn detects_each_pure_convention() {
        assert_eq!(detect("a\nb\nc\n"), LineSeparator::Lf);
        assert_eq!(detect("a\r\nb\r\nc\r\n"), LineSeparator::CrLf);
        assert_eq!(detect("a\rb\rc\r"), LineSeparator::Cr);
    }

    #[test]
    fn no_separators_means_platform_default() {
        assert_eq!(detect(""), LineSeparator::PlatformDefault);
        assert_eq!(detect("just one line"), LineSeparator::PlatformDefault);
    }

    #[test]
    fn a_three_way_tie_means_platform_default() {
        assert_eq!(detect("a\nb\r\nc\rd"), LineSeparator::PlatformDefault);
    }

    #[test]
    fn ties_for_the_maximum_prefer_lf_then_crlf() {
        assert_eq!(detect("a\nb\r\nc"), LineSeparator::Lf);
        assert_eq!(detect("a\r\nb\rc\r\n"), LineSeparator::CrLf);
        assert_eq!(detect("a\nb\n\rc\r"), LineSeparator::Lf);
    }

    #[test]
    fn consecutive_carriage_returns_each_count() {
        // \r\r\r\n is two CRs and one CRLF
        assert_eq!(detect("a\r\r\r\n"), LineSeparator::Cr);
        // \r\r\n is one CR and one CRLF, tied with zero LF: CRLF wins the tie
        assert_eq!(detect("a\r\r\n"), LineSeparator::CrLf);
    }

    #[test]
    fn detection_only_samples_the_beginning() {
        let mut text = "x\n".repeat(DETECTION_SAMPLE_LIMIT / 4);
        text.push_str(&"y\r\n".repeat(DETECTION_SAMPLE_LIMIT));
        assert_eq!(detect(&text), LineSeparator::Lf);
    }

    #[test]
    fn carriage_return_ending_the_sample_counts_as_cr() {
        let mut text = "x".repeat(DETECTION_SAMPLE_LIMIT - 1);
        text.push_str("\r\n");
        assert_eq!(detect(&text), LineSeparator::Cr);
    }

    #[test]
    fn detection_rewinds_the_source() {
        let mut reader = CharReader::new(&b"first\r\nsecond\r\n"[..]);
        assert_eq!(LineSeparator::detect(&mut reader).unwrap(), LineSeparator::CrLf);
        let mut line = String::new();
        LineSeparator::CrLf.consume_line(&mut reader, &mut line).unwrap();
        assert_eq!(line, "first");
    }

    struct NoMark;
    impl CharSource for NoMark {
        fn read_char(&mut self) -> io::Result<Option<char>> {
            Ok(None)
        }
        fn peek_char(&mut self) -> io::Result<Option<char>> {
            Ok(None)
        }
    }

    #[test]
    fn detection_requires_mark_support() {
        assert!(matches!(LineSeparator::detect(&mut NoMark), Err(Error::MarkUnsupported)));
    }

    #[test]
    fn platform_default_is_written_as_the_injected_native_separator() {
        assert_eq!(LineSeparator::PlatformDefault.as_str_for(NativeSeparator::CrLf), "\r\n");
        assert_eq!(LineSeparator::PlatformDefault.as_str_for(NativeSeparator::Lf), "\n");
        assert_eq!(LineSeparator::Cr.as_str_for(NativeSeparator::CrLf), "\r");
    }

    #[test]
    fn names_parse_back() {
        for sep in [
            LineSeparator::Lf,
            LineSeparator::CrLf,
            LineSeparator::Cr,
            LineSeparator::PlatformDefault,
        ] {
            assert_eq!(sep.to_string().parse::<LineSeparator>().unwrap(), sep);
        }
        assert!(matches!("nl".parse::<LineSeparator>(), Err(Error::UnknownSeparator(_))));
    }
}
