use crate::config::WriteMode;
use crate::summary::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// Recursive find-and-replace that keeps every file's owner, group and mode.
///
/// EXAMPLES:
///   find_replace ./site 'old.example.com' 'new.example.com' '*.php' '*.html'
///   find_replace -e ./src 'v(\d+)_api' 'api_v$1' '*.rs'
///   find_replace --write-mode atomic ./conf 'debug=1' 'debug=0'
#[derive(Parser, Debug)]
#[command(author, version)]
pub struct Args {
    /// The directory to search recursively.
    pub path: PathBuf,

    /// The text (or regex with --regex) to search for.
    pub find: String,

    /// The replacement text. With --regex, `$1` and `${name}` refer to capture groups.
    pub replace: String,

    /// Filename globs to restrict the search to (e.g. '*.php'). All files when omitted.
    pub file_patterns: Vec<String>,

    /// Treat FIND as a regular expression.
    #[arg(short = 'e', long)]
    pub regex: bool,

    /// How changed files are written back.
    #[arg(long, value_enum, default_value_t = WriteMode::InPlace, env = "FIND_REPLACE_WRITE_MODE")]
    pub write_mode: WriteMode,

    /// Stop at the first file that cannot be rewritten instead of reporting it at the end.
    #[arg(long)]
    pub fail_fast: bool,

    /// Draw a progress bar on stderr instead of printing percentages.
    #[arg(long, conflicts_with = "quiet")]
    pub bar: bool,

    /// Do not report progress.
    #[arg(short, long)]
    pub quiet: bool,

    /// The format of the closing summary.
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Text, env = "FIND_REPLACE_FORMAT")]
    pub format: OutputFormat,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parses command-line arguments and returns the populated `Args` struct.
pub fn parse_args() -> Args {
    Args::parse()
}
