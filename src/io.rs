//! Opening files as character sources and sinks.
//!
//! Input is decoded by `encoding_rs_io`: a UTF-16 Byte Order Mark is detected
//! and the file transcoded to UTF-8, a UTF-8 BOM is stripped, and anything
//! else is taken as UTF-8 unless an encoding label says otherwise. Output is
//! UTF-8, or encoded with `encoding_rs` when a label is given.
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use encoding_rs::{CoderResult, Encoder, Encoding};
use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};

use crate::chars::{CharReader, CharSink};
use crate::error::{Error, Result};

/// A decoding [`CharReader`] over any `Read`.
pub type DecodedSource<R> = CharReader<BufReader<DecodeReaderBytes<R, Vec<u8>>>>;

/// The character source [`open_source`] returns
pub type FileSource = DecodedSource<File>;

/// The character sink [`create_sink`] returns
pub type FileSink = EncodedSink<BufWriter<File>>;

/// Looks up the `encoding_rs` encoding for `label` (`"latin1"`, `"utf-16le"`,
/// `"shift_jis"`, ...).
pub fn encoding_for(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| Error::UnknownEncoding(label.to_owned()))
}

/// Opens `path` for reading lines, decoding it from `encoding` (by default,
/// UTF-8 or whatever its Byte Order Mark says).
pub fn open_source(path: &Path, encoding: Option<&str>) -> Result<FileSource> {
    let encoding = encoding.map(encoding_for).transpose()?;
    let file = File::open(path)?;
    tracing::debug!(
        path = %path.display(),
        encoding = encoding.map_or("utf-8 (sniffed)", Encoding::name),
        "opened character source"
    );
    Ok(decoded_source(file, encoding))
}

/// Wraps `reader` in a buffered, decoding, mark-capable character source.
#[must_use]
pub fn decoded_source<R: Read>(reader: R, encoding: Option<&'static Encoding>) -> DecodedSource<R> {
    let decoder = DecodeReaderBytesBuilder::new()
        .encoding(encoding)
        .bom_sniffing(true) // Look at the BOM to detect UTF-16 files and convert to UTF-8
        .strip_bom(true) // Remove the BOM before sending data to us
        .utf8_passthru(true) // Don't enforce UTF-8; CharReader replaces bad sequences
        .build(reader);
    CharReader::new(BufReader::with_capacity(32 * 1024, decoder))
}

/// Creates (or truncates) `path` for writing lines in `encoding` (by
/// default, UTF-8).
pub fn create_sink(path: &Path, encoding: Option<&str>) -> Result<FileSink> {
    let encoding = encoding.map(encoding_for).transpose()?.unwrap_or(encoding_rs::UTF_8);
    let file = File::create(path)?;
    tracing::debug!(path = %path.display(), encoding = encoding.name(), "created character sink");
    Ok(EncodedSink::new(BufWriter::new(file), encoding))
}

/// A [`CharSink`] that encodes text before writing it. `encoding_rs` can't
/// encode UTF-16, so UTF-16 encodings write UTF-8 instead.
pub struct EncodedSink<W> {
    inner: W,
    encoder: Option<Encoder>, // None for UTF-8, which needs no encoding
    buffer: Vec<u8>,
}

impl<W: Write> EncodedSink<W> {
    /// Writes to `inner` in `encoding`
    #[must_use]
    pub fn new(inner: W, encoding: &'static Encoding) -> Self {
        let encoding = encoding.output_encoding();
        let encoder = (encoding != encoding_rs::UTF_8).then(|| encoding.new_encoder());
        EncodedSink { inner, encoder, buffer: Vec::new() }
    }

    /// Unwraps the underlying writer
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn encode(&mut self, mut text: &str, last: bool) -> io::Result<()> {
        let Some(encoder) = self.encoder.as_mut() else {
            return self.inner.write_all(text.as_bytes());
        };
        self.buffer.clear();
        loop {
            let needed =
                encoder.max_buffer_length_from_utf8_if_no_unmappables(text.len()).unwrap_or(text.len());
            self.buffer.reserve(needed.max(16));
            let (result, read, _had_unmappables) =
                encoder.encode_from_utf8_to_vec(text, &mut self.buffer, last);
            text = &text[read..];
            if result == CoderResult::InputEmpty {
                break;
            }
        }
        self.inner.write_all(&self.buffer)
    }
}

impl<W> std::fmt::Debug for EncodedSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let encoding = self.encoder.as_ref().map_or("UTF-8", |e| e.encoding().name());
        f.debug_struct("EncodedSink").field("encoding", &encoding).finish_non_exhaustive()
    }
}

impl<W: Write> CharSink for EncodedSink<W> {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.encode(s, false)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        self.encode("", true)?;
        self.inner.flush()
    }
}
