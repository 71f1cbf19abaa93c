//! Result formatting and display
//!
//! Scan results can be written as:
//! - an aligned text table with optional color
//! - a JSON document
//! - CSV rows
//!
//! # Module Structure
//!
//! - `config` - Output configuration types
//! - `table` - Text table formatter
//! - `json` - JSON output
//! - `csv` - CSV output

mod config;
mod csv;
mod json;
mod table;

use std::io::{self, Write};

use termcolor::{ColorChoice, StandardStream, WriteColor};

use crate::scan::{ScanOutcome, ScanResults, ScanStats};

pub use config::{OutputConfig, OutputFormat};
pub use self::csv::{write_csv_grouped, write_csv_ranked};
pub use json::{JsonFile, JsonGroup, write_json_grouped, write_json_ranked};
pub use table::{TableFormatter, format_modified};

/// One-line summary of the scan counters.
pub fn write_summary<W: WriteColor>(out: &mut W, stats: &ScanStats) -> io::Result<()> {
    write!(
        out,
        "Scanned {} files in {} directories in {:.2}s",
        stats.files_seen,
        stats.dirs_visited,
        stats.elapsed.as_secs_f64()
    )?;
    if stats.errors > 0 {
        write!(out, " ({} entries could not be read)", stats.errors)?;
    }
    writeln!(out)
}

/// Write an outcome to stdout in the configured format.
pub fn print_outcome(outcome: &ScanOutcome<ScanResults>, config: &OutputConfig) -> io::Result<()> {
    match config.format {
        OutputFormat::Table => {
            let choice = if config.use_color {
                ColorChoice::Always
            } else {
                ColorChoice::Never
            };
            let mut stdout = StandardStream::stdout(choice);
            write_table(&mut stdout, outcome, config)?;
            stdout.flush()
        }
        OutputFormat::Json => {
            let mut stdout = io::stdout().lock();
            match &outcome.results {
                ScanResults::Ranked(records) => write_json_ranked(
                    &mut stdout,
                    records,
                    &outcome.root,
                    outcome.cancelled,
                    config,
                ),
                ScanResults::Grouped(groups) => write_json_grouped(
                    &mut stdout,
                    groups,
                    &outcome.root,
                    outcome.cancelled,
                    config,
                ),
            }
        }
        OutputFormat::Csv => {
            let stdout = io::stdout().lock();
            match &outcome.results {
                ScanResults::Ranked(records) => {
                    write_csv_ranked(stdout, records, &outcome.root, config)
                }
                ScanResults::Grouped(groups) => {
                    write_csv_grouped(stdout, groups, &outcome.root, config)
                }
            }
        }
    }
}

/// Table results followed by the summary line.
pub fn write_table<W: WriteColor>(
    out: &mut W,
    outcome: &ScanOutcome<ScanResults>,
    config: &OutputConfig,
) -> io::Result<()> {
    let formatter = TableFormatter::new(config);
    match &outcome.results {
        ScanResults::Ranked(records) => formatter.write_ranked(out, records, &outcome.root)?,
        ScanResults::Grouped(groups) => formatter.write_grouped(out, groups, &outcome.root)?,
    }
    writeln!(out)?;
    write_summary(out, &outcome.stats)
}
