//! Code to parse the command line using `clap`, and definitions of the parsed
//! result

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::strategy::LineSeparator;

/// Returns the parsed command line.
#[must_use]
pub fn parsed() -> Args {
    let parsed = CliArgs::parse();
    let command = match parsed.command {
        CliCommand::Detect { files } => Command::Detect { files },
        CliCommand::Convert { to, from, keep_trailing_empty, trailing, file } => Command::Convert {
            to: to.into(),
            from: from.map(LineSeparator::from),
            keep_trailing_empty,
            trailing,
            file,
        },
        CliCommand::Lines { from, to, separator, file } => {
            Command::Lines { from, to, separator: separator.map(LineSeparator::from), file }
        }
        CliCommand::Count { separator, keep_trailing_empty, files } => Command::Count {
            separator: separator.map(LineSeparator::from),
            keep_trailing_empty,
            files,
        },
    };
    Args { verbosity: parsed.verbose, encoding: parsed.encoding, command }
}

/// The parsed command line
#[derive(Debug)]
pub struct Args {
    /// How chatty the log on stderr should be: 0 for warnings only, 3 or more
    /// for everything
    pub verbosity: u8,
    /// Encoding label for the input files, if given
    pub encoding: Option<String>,
    /// What to do
    pub command: Command,
}

/// The requested subcommand. A `separator` (or `from`) of `None` means
/// "detect it".
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// Report the separator each file uses
    Detect {
        /// Files to examine
        files: Vec<PathBuf>,
    },
    /// Rewrite a file's lines with a different separator
    Convert {
        /// Separator to write
        to: LineSeparator,
        /// Separator to read
        from: Option<LineSeparator>,
        /// Keep the empty line implied by a separator at end of file
        keep_trailing_empty: bool,
        /// End the output with a separator
        trailing: bool,
        /// File to convert
        file: PathBuf,
    },
    /// Print the lines with indices `from..=to`
    Lines {
        /// First line to print (0-based)
        from: u64,
        /// Last line to print (0-based, inclusive)
        to: u64,
        /// Separator to read
        separator: Option<LineSeparator>,
        /// File to read
        file: PathBuf,
    },
    /// Count each file's lines
    Count {
        /// Separator to read
        separator: Option<LineSeparator>,
        /// Count the empty line implied by a separator at end of file
        keep_trailing_empty: bool,
        /// Files to count
        files: Vec<PathBuf>,
    },
}

#[derive(Debug, Parser)]
#[command(name = "linesep", version, about)]
/// Read and rewrite files line by line, honoring LF, CRLF, and CR separators
struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    /// Log more to stderr (repeat for even more)
    verbose: u8,
    #[arg(long, global = true, value_name = "LABEL")]
    /// Character encoding of the input files (default: UTF-8, or as the BOM says)
    encoding: Option<String>,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Print the line separator each file uses
    Detect {
        #[arg(required = true, name = "FILES")]
        files: Vec<PathBuf>,
    },
    /// Print FILE's lines using a different separator
    Convert {
        #[arg(long, value_enum)]
        /// Separator to write
        to: SeparatorName,
        #[arg(long, value_enum)]
        /// Separator to read (default: detect it)
        from: Option<SeparatorName>,
        #[arg(long)]
        /// Keep the empty line implied by a separator at end of file
        keep_trailing_empty: bool,
        #[arg(long)]
        /// End the output with a separator
        trailing: bool,
        file: PathBuf,
    },
    /// Print the lines of FILE numbered FROM through TO, counting from 0
    Lines {
        #[arg(long, default_value_t = 0)]
        /// First line to print
        from: u64,
        #[arg(long)]
        /// Last line to print
        to: u64,
        #[arg(long, value_enum)]
        /// Separator to read (default: detect it)
        separator: Option<SeparatorName>,
        file: PathBuf,
    },
    /// Print the number of lines in each file
    Count {
        #[arg(long, value_enum)]
        /// Separator to read (default: detect it)
        separator: Option<SeparatorName>,
        #[arg(long)]
        /// Count the empty line implied by a separator at end of file
        keep_trailing_empty: bool,
        #[arg(required = true, name = "FILES")]
        files: Vec<PathBuf>,
    },
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, ValueEnum)]
/// Name of a line separator
enum SeparatorName {
    /// \n
    Lf,
    /// \r\n
    Crlf,
    /// \r
    Cr,
    /// The platform's native separator
    Native,
}

impl From<SeparatorName> for LineSeparator {
    fn from(name: SeparatorName) -> Self {
        match name {
            SeparatorName::Lf => LineSeparator::Lf,
            SeparatorName::Crlf => LineSeparator::CrLf,
            SeparatorName::Cr => LineSeparator::Cr,
            SeparatorName::Native => LineSeparator::PlatformDefault,
        }
    }
}

#[allow(clippy::pedantic)]
#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }

    #[test]
    fn separator_names_map_to_separators() {
        let argv = ["linesep", "convert", "--to", "crlf", "--from", "cr", "x.txt"];
        let parsed = CliArgs::try_parse_from(argv).unwrap();
        match parsed.command {
            CliCommand::Convert { to, from, .. } => {
                assert_eq!(LineSeparator::from(to), LineSeparator::CrLf);
                assert_eq!(from.map(LineSeparator::from), Some(LineSeparator::Cr));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
