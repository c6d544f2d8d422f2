//! The main entry point for the `find_replace` command-line application.

use anyhow::Context;
use find_replace::cli;
use find_replace::logging::setup_logging;
use find_replace::progress::{BarReporter, PercentReporter, Progress, Silent};
use find_replace::{OutputFormat, ScanRequest, Scanner};
use std::io::{self, Write};

const PATTERN_WARNING: &str = "** Consider using file patterns to speed up the process **";

fn main() -> anyhow::Result<()> {
    let args = cli::parse_args();
    setup_logging(args.verbose)?;

    if args.file_patterns.is_empty() {
        match args.format {
            OutputFormat::Text => println!("{PATTERN_WARNING}"),
            OutputFormat::Json => eprintln!("{PATTERN_WARNING}"),
        }
    }

    let request = ScanRequest::new(&args.path, args.find, args.replace)
        .regex(args.regex)
        .file_patterns(args.file_patterns)
        .write_mode(args.write_mode)
        .fail_fast(args.fail_fast);
    let scanner = Scanner::new(request)
        .with_context(|| format!("Cannot scan {}", args.path.display()))?;

    // Percentages are only printed next to the text summary.
    let percentages = !args.quiet && !args.bar && args.format == OutputFormat::Text;
    let mut progress: Box<dyn Progress> = if percentages {
        Box::new(PercentReporter::stdout())
    } else if args.bar {
        Box::new(BarReporter::new())
    } else {
        Box::new(Silent)
    };
    let summary = scanner.run(progress.as_mut())?;

    let mut stdout = io::stdout().lock();
    if percentages {
        writeln!(stdout)?;
    }
    summary.write_to(&mut stdout, args.format)?;

    Ok(())
}
