use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use std::io::{self, Write};
use std::path::Path;
use tracing::Level;

use linesep::args::{Args, Command};
use linesep::io::{open_source, FileSource};
use linesep::{
    CountingLineReader, LineRange, LineRead, LineSeparator, LineSink, LineSource, LineWrite,
    RangeLineReader,
};

fn main() -> Result<()> {
    let args = linesep::args::parsed();
    init_logging(args.verbosity);

    let stdout = io::stdout().lock();
    if stdout.is_terminal() {
        run(args, stdout)
    } else {
        run(args, io::BufWriter::new(stdout))
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).with_writer(io::stderr).with_target(false).init();
}

fn run(args: Args, mut out: impl Write) -> Result<()> {
    let encoding = args.encoding.as_deref();
    match args.command {
        Command::Detect { files } => {
            for path in &files {
                let mut source = open(path, encoding)?;
                let separator = LineSeparator::detect(&mut source)
                    .with_context(|| format!("Error reading file: {}", path.display()))?;
                writeln!(out, "{}: {separator}", path.display())?;
            }
        }

        Command::Convert { to, from, keep_trailing_empty, trailing, file } => {
            let mut reader =
                line_source(&file, encoding, from)?.ignore_trailing_empty_line(!keep_trailing_empty);
            let mut sink = LineSink::new(&mut out, to).append_trailing_separator_on_close(trailing);
            let converted = reader
                .transfer_to(&mut sink)
                .with_context(|| format!("Error converting file: {}", file.display()))?;
            sink.close()?;
            tracing::info!(lines = converted, from = %reader.separator(), %to, "converted");
        }

        Command::Lines { from, to, separator, file } => {
            let range = LineRange::new(from, to)?;
            let source = line_source(&file, encoding, separator)?;
            let mut reader = RangeLineReader::new(source, range);
            let mut sink =
                LineSink::new(&mut out, LineSeparator::Lf).append_trailing_separator_on_close(true);
            let mut printed = 0;
            while let Some(line) =
                reader.read_line().with_context(|| format!("Error reading file: {}", file.display()))?
            {
                sink.write_line(&line)?;
                printed += 1;
            }
            if printed == 0 {
                // Nothing in range: don't print a lone separator
                drop(sink);
            } else {
                sink.close()?;
            }
        }

        Command::Count { separator, keep_trailing_empty, files } => {
            for path in &files {
                let source = line_source(path, encoding, separator)?
                    .ignore_trailing_empty_line(!keep_trailing_empty);
                let mut reader = CountingLineReader::new(source);
                reader
                    .skip(u64::MAX)
                    .with_context(|| format!("Error reading file: {}", path.display()))?;
                writeln!(out, "{} {}", reader.line_count(), path.display())?;
                reader.close()?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn open(path: &Path, encoding: Option<&str>) -> Result<FileSource> {
    open_source(path, encoding).with_context(|| format!("Can't open file: {}", path.display()))
}

/// Opens `path` as a `LineSource` reading `separator`, or the separator
/// detected in the file if `separator` is `None`.
fn line_source(
    path: &Path,
    encoding: Option<&str>,
    separator: Option<LineSeparator>,
) -> Result<LineSource<FileSource>> {
    let source = open(path, encoding)?;
    match separator {
        Some(separator) => Ok(LineSource::new(source, separator)),
        None => LineSource::detect(source)
            .with_context(|| format!("Error reading file: {}", path.display())),
    }
}
