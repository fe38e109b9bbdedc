//! CLI argument definitions for the converter.

use std::ffi::OsString;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{ArgAction, ColorChoice, Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use crate::logging::{LogConfig, LogFormat};

/// Multi-letter flags that are also accepted with a single dash (`-ncpu 4`,
/// `-header=false`).
const SINGLE_DASH_LONG_FLAGS: &[&str] = &[
    "id",
    "ncpu",
    "header",
    "headernames",
    "nolabel",
    "ordered",
    "delimiter",
];

#[derive(Parser)]
#[command(
    name = "csvvw",
    version,
    about = "Convert CSV data to the Vowpal Wabbit input format",
    long_about = "Convert comma separated data to the Vowpal Wabbit input format.\n\n\
                  Columns are addressed by zero-based index or, with a header row, by\n\
                  name. Prefix numeric column names with _ (-l _23 selects the column\n\
                  named 23). Empty cells and numeric zeros are left out of the output."
)]
pub struct Cli {
    /// Input CSV file (default: stdin).
    #[arg(short = 'i', value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Label column. -1 uses the last cell of every row. The label column
    /// stays out of the features even with --nolabel.
    #[arg(
        short = 'l',
        value_name = "COLUMN",
        default_value = "0",
        allow_hyphen_values = true
    )]
    pub label: String,

    /// Tag (example id) column. -1 for none.
    #[arg(
        long = "id",
        value_name = "COLUMN",
        default_value = "-1",
        allow_hyphen_values = true
    )]
    pub tag: String,

    /// Importance weight column. -1 for none.
    #[arg(
        short = 'w',
        value_name = "COLUMN",
        default_value = "-1",
        allow_hyphen_values = true
    )]
    pub importance: String,

    /// Nominal (categorical) columns, comma separated. Example: -n 1,2,5
    #[arg(short = 'n', value_name = "COLUMNS", default_value = "")]
    pub nominal: String,

    /// Columns to leave out, comma separated. Example: -r 2,5,8
    #[arg(short = 'r', value_name = "COLUMNS", default_value = "")]
    pub remove: String,

    /// Worker threads. Values <= 0 use one per CPU. Use 1 (or --ordered) to
    /// keep the input row order.
    #[arg(
        long = "ncpu",
        value_name = "N",
        default_value_t = 0,
        allow_negative_numbers = true
    )]
    pub ncpu: i64,

    /// Use the first row as header.
    #[arg(
        long = "header",
        value_name = "BOOL",
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub header: bool,

    /// Use header names instead of column indices as feature names. Implies --header=true.
    #[arg(
        long = "headernames",
        value_name = "BOOL",
        default_value_t = false,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub header_names: bool,

    /// Omit the label, for prediction-only data.
    #[arg(
        long = "nolabel",
        value_name = "BOOL",
        default_value_t = false,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub no_label: bool,

    /// Keep input row order with more than one worker.
    #[arg(long = "ordered")]
    pub ordered: bool,

    /// Field delimiter (a single ASCII character, or \t).
    #[arg(long = "delimiter", value_name = "CHAR", default_value = ",")]
    pub delimiter: String,

    /// What to do with rows too short for the label, tag or importance column.
    #[arg(long = "on-short-row", value_enum, default_value = "skip")]
    pub on_short_row: ShortRowArg,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Parses arguments after normalizing single-dash long flags.
    pub fn parse_normalized<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::parse_from(normalize_args(args))
    }

    /// Like [`Cli::parse_normalized`], returning parse errors instead of exiting.
    pub fn try_parse_normalized<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    /// Worker count with non-positive values meaning "one per CPU" (zero).
    pub fn workers(&self) -> usize {
        usize::try_from(self.ncpu).unwrap_or(0)
    }

    /// Logging setup. `--log-level` beats `-v`/`-q`, and either one turns
    /// off `RUST_LOG`. Progress events are `info`, so `-q` hides them.
    pub fn log_config(&self) -> LogConfig {
        let explicit = self.log_level.map(LevelFilter::from);
        let with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        LogConfig {
            level_filter: explicit.unwrap_or_else(|| self.verbosity.tracing_level_filter()),
            use_env_filter: explicit.is_none() && !self.verbosity.is_present(),
            with_ansi,
            format: self.log_format.into(),
            log_file: self.log_file.clone(),
            ..LogConfig::default()
        }
    }
}

/// Rewrites `-ncpu`, `-header=false` and friends to their `--` forms.
///
/// Arguments after a bare `--` are left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            if arg == "--" {
                passthrough = true;
                return arg;
            }
            match arg.to_str().and_then(single_dash_long_flag) {
                Some(flag) => OsString::from(format!("-{flag}")),
                None => arg,
            }
        })
        .collect()
}

fn single_dash_long_flag(arg: &str) -> Option<&str> {
    let flag = arg.strip_prefix('-').filter(|rest| !rest.starts_with('-'))?;
    let name = flag.split_once('=').map_or(flag, |(name, _)| name);
    SINGLE_DASH_LONG_FLAGS.contains(&name).then_some(arg)
}

/// Handling of rows missing a special-role cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ShortRowArg {
    /// Drop the row with a warning.
    Skip,
    /// Stop with an error.
    Abort,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
