//! Incremental progress reporting while files are processed.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};

/// Receives progress events from a running scan.
///
/// `begin` is called once with the number of filtered-in files, `advance`
/// after each file with the running count, and `finish` when the last file
/// has been handled.
pub trait Progress {
    fn begin(&mut self, total: usize) -> io::Result<()>;
    fn advance(&mut self, processed: usize) -> io::Result<()>;
    fn finish(&mut self) -> io::Result<()>;
}

/// `floor(100 * processed / total)`, with an empty scan counting as complete.
pub fn percent(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (processed.min(total) as u64 * 100) / total as u64;
    pct as u8
}

/// Prints `Progress: N%` each time the whole percentage changes.
///
/// Intermediate values overwrite each other with a carriage return; the
/// final `Progress: 100%` is terminated by a newline. Every update is
/// flushed right away.
pub struct PercentReporter<W: Write> {
    out: W,
    total: usize,
    last: Option<u8>,
}

impl<W: Write> PercentReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            total: 0,
            last: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, pct: u8) -> io::Result<()> {
        if self.last == Some(pct) {
            return Ok(());
        }
        self.last = Some(pct);
        write!(self.out, "\rProgress: {pct}%")?;
        if pct == 100 {
            writeln!(self.out)?;
        }
        self.out.flush()
    }
}

impl PercentReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Progress for PercentReporter<W> {
    fn begin(&mut self, total: usize) -> io::Result<()> {
        self.total = total;
        self.last = None;
        if total == 0 {
            self.emit(100)?;
        }
        Ok(())
    }

    fn advance(&mut self, processed: usize) -> io::Result<()> {
        let pct = percent(processed, self.total);
        self.emit(pct)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.emit(100)
    }
}

/// An `indicatif` progress bar drawn on stderr.
pub struct BarReporter {
    bar: ProgressBar,
}

impl BarReporter {
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl Default for BarReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for BarReporter {
    fn begin(&mut self, total: usize) -> io::Result<()> {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("Progress: {percent:>3}% {bar:40.cyan/blue} {pos}/{len}")
                .map_err(io::Error::other)?
                .progress_chars("##-"),
        );
        self.bar = bar;
        Ok(())
    }

    fn advance(&mut self, processed: usize) -> io::Result<()> {
        self.bar.set_position(processed as u64);
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.bar.finish();
        Ok(())
    }
}

/// Reports nothing.
pub struct Silent;

impl Progress for Silent {
    fn begin(&mut self, _total: usize) -> io::Result<()> {
        Ok(())
    }

    fn advance(&mut self, _processed: usize) -> io::Result<()> {
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}
