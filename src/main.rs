//! CLI entry point for hefty

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::SystemTime;

use anyhow::{Result, anyhow};
use chrono::{Local, NaiveDate, TimeZone};
use clap::{Parser, ValueEnum};
use hefty::error::ConfigError;
use hefty::output::{OutputConfig, OutputFormat, print_outcome};
use hefty::scan::{CancelFlag, Finder, GroupBy, GroupScope, SearchOptions, TracingSink};
use hefty::size::parse_size;
use tracing::{Level, warn};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GroupByArg {
    /// Parent directory
    #[value(name = "dir", alias = "directory")]
    Dir,
    /// File extension
    #[value(name = "ext", alias = "extension")]
    Ext,
}

impl From<GroupByArg> for GroupBy {
    fn from(arg: GroupByArg) -> Self {
        match arg {
            GroupByArg::Dir => GroupBy::Directory,
            GroupByArg::Ext => GroupBy::Extension,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum GroupScopeArg {
    /// Group only the overall top N files
    Top,
    /// Group every matching file, keeping the top N per group
    #[default]
    All,
}

impl From<GroupScopeArg> for GroupScope {
    fn from(arg: GroupScopeArg) -> Self {
        match arg {
            GroupScopeArg::Top => GroupScope::TopN,
            GroupScopeArg::All => GroupScope::AllMatches,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum FormatArg {
    #[default]
    Table,
    Json,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Table => OutputFormat::Table,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "hefty")]
#[command(about = "Find the largest files in a directory tree")]
#[command(version)]
struct Args {
    /// Directory to search
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Number of files to show
    #[arg(short = 'n', long = "top", value_name = "N", default_value = "20")]
    top: usize,

    /// Ignore files smaller than SIZE (e.g. 500K, 10MB, 1.5G)
    #[arg(long = "min-size", value_name = "SIZE")]
    min_size: Option<String>,

    /// Only include files with this extension (can be used multiple times)
    #[arg(short = 'e', long = "extension", value_name = "EXT")]
    extensions: Vec<String>,

    /// Only include files modified on or after DATE (YYYY-MM-DD, local time)
    #[arg(long = "modified-since", value_name = "DATE")]
    modified_since: Option<String>,

    /// Only include files modified more recently than DURATION ago
    /// Duration format: 30s, 5m, 1h, 7d, 2w, 3M, 1y
    #[arg(long = "newer", value_name = "DURATION")]
    newer: Option<String>,

    /// Exclude paths matching a glob pattern (can be used multiple times)
    #[arg(long = "exclude", value_name = "GLOB")]
    exclude: Vec<String>,

    /// Exclude paths matching a regular expression (can be used multiple times)
    #[arg(long = "exclude-regex", value_name = "REGEX")]
    exclude_regex: Vec<String>,

    /// Group results by directory or extension
    #[arg(long = "group-by", value_name = "KEY")]
    group_by: Option<GroupByArg>,

    /// Which files are grouped when --group-by is set
    #[arg(long = "group-scope", value_name = "SCOPE", default_value = "all")]
    group_scope: GroupScopeArg,

    /// Follow symbolic links
    #[arg(long = "follow-symlinks")]
    follow_symlinks: bool,

    /// Include hidden files and directories
    #[arg(long = "include-hidden")]
    include_hidden: bool,

    /// Descend only N levels below the root (0 = root only)
    #[arg(short = 'L', long = "depth", value_name = "N")]
    depth: Option<usize>,

    /// Report allocated disk usage instead of apparent size
    #[arg(long = "disk-usage")]
    disk_usage: bool,

    /// Show paths relative to the search root
    #[arg(long = "relative")]
    relative: bool,

    /// Output format
    #[arg(long = "format", value_name = "FORMAT", default_value = "table")]
    format: FormatArg,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

/// Parse YYYY-MM-DD as local midnight.
fn parse_date(s: &str) -> Result<SystemTime, ConfigError> {
    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ConfigError::InvalidDate(s.to_string()))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| ConfigError::InvalidDate(s.to_string()))?;
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(SystemTime::from)
        .ok_or_else(|| ConfigError::InvalidDate(s.to_string()))
}

/// Cutoff for a "newer than DURATION ago" filter.
fn parse_newer(s: &str) -> Result<SystemTime, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidDuration {
        input: s.to_string(),
        reason,
    };
    let duration = humantime::parse_duration(s.trim()).map_err(|e| invalid(e.to_string()))?;
    SystemTime::now()
        .checked_sub(duration)
        .ok_or_else(|| invalid("duration reaches before the epoch".to_string()))
}

fn build_options(args: &Args) -> Result<SearchOptions, ConfigError> {
    let min_size = args.min_size.as_deref().map(parse_size).transpose()?;

    // Both time filters may be given; the later cutoff wins.
    let since = args.modified_since.as_deref().map(parse_date).transpose()?;
    let newer = args.newer.as_deref().map(parse_newer).transpose()?;
    let earliest_modified = since.into_iter().chain(newer).max();

    SearchOptions::builder()
        .top_n(args.top)
        .min_size(min_size.unwrap_or(0))
        .extensions(&args.extensions)
        .earliest_modified(earliest_modified)
        .exclude(&args.exclude)
        .exclude_regex(&args.exclude_regex)
        .include_hidden(args.include_hidden)
        .follow_symlinks(args.follow_symlinks)
        .max_depth(args.depth)
        .disk_usage(args.disk_usage)
        .group_by(args.group_by.map(GroupBy::from))
        .group_scope(args.group_scope.into())
        .build()
}

fn init_logging(args: &Args) {
    let level = if args.quiet {
        Level::ERROR
    } else {
        match args.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Cancel flag raised by SIGINT or SIGTERM.
fn install_signal_handlers() -> Result<CancelFlag> {
    let flag = Arc::new(AtomicBool::new(false));
    for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(&flag))
            .map_err(|e| anyhow!("failed to install signal handler: {}", e))?;
    }
    Ok(CancelFlag::from_arc(flag))
}

fn run(args: Args) -> Result<()> {
    let options = build_options(&args)?;
    let cancel = install_signal_handlers()?;

    let output_config = OutputConfig {
        format: args.format.into(),
        use_color: matches!(args.format, FormatArg::Table) && should_use_color(args.color),
        relative: args.relative,
    };

    let mut finder = Finder::new(options)
        .with_cancel_flag(cancel)
        .with_diagnostics(TracingSink);

    if !args.quiet && output_config.format == OutputFormat::Table {
        eprintln!("Searching for large files in: {}", args.path.display());
    }

    let outcome = finder.run(&args.path)?;
    if outcome.cancelled {
        warn!("interrupted; showing partial results");
    }

    print_outcome(&outcome, &output_config)
        .map_err(|e| anyhow!("error writing output: {}", e))?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(&args);

    if let Err(e) = run(args) {
        eprintln!("hefty: {}", e);
        process::exit(1);
    }
}
