//! Conversion configuration: raw column specifiers, runtime options and the
//! resolved column layout shared by all transformer workers.

use std::collections::BTreeSet;
use std::fmt;

use crate::header::Header;

/// Role a special column plays in an output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Label,
    Importance,
    Tag,
}

impl ColumnRole {
    /// Get a human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Importance => "importance",
            Self::Tag => "tag",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Location of a special-role column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnRef {
    /// The column is not present.
    #[default]
    Absent,
    /// Zero-based column position.
    AtIndex(usize),
    /// The last cell of each row, whatever the row's width.
    LastCell,
}

impl ColumnRef {
    /// Resolves the column position for a row of `width` cells.
    ///
    /// Returns `None` for `Absent` and for `LastCell` on an empty row.
    #[must_use]
    pub fn index_in(&self, width: usize) -> Option<usize> {
        match self {
            Self::Absent => None,
            Self::AtIndex(index) => Some(*index),
            Self::LastCell => width.checked_sub(1),
        }
    }

    /// Returns true if the column is present.
    #[must_use]
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Absent)
    }
}

/// Raw column specifiers as supplied on the command line.
///
/// Singular specifiers use `-1` for "absent" (and "last cell" for the label).
/// Lists are comma separated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpecs {
    pub label: String,
    pub tag: String,
    pub importance: String,
    pub nominal: String,
    pub remove: String,
}

impl Default for ColumnSpecs {
    fn default() -> Self {
        Self {
            label: "0".to_string(),
            tag: "-1".to_string(),
            importance: "-1".to_string(),
            nominal: String::new(),
            remove: String::new(),
        }
    }
}

impl ColumnSpecs {
    #[must_use]
    pub fn with_label(mut self, spec: impl Into<String>) -> Self {
        self.label = spec.into();
        self
    }

    #[must_use]
    pub fn with_tag(mut self, spec: impl Into<String>) -> Self {
        self.tag = spec.into();
        self
    }

    #[must_use]
    pub fn with_importance(mut self, spec: impl Into<String>) -> Self {
        self.importance = spec.into();
        self
    }

    #[must_use]
    pub fn with_nominal(mut self, list: impl Into<String>) -> Self {
        self.nominal = list.into();
        self
    }

    #[must_use]
    pub fn with_remove(mut self, list: impl Into<String>) -> Self {
        self.remove = list.into();
        self
    }
}

/// What to do with a row that cannot be transformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortRowPolicy {
    /// Drop the row, log a warning and keep going.
    #[default]
    Skip,
    /// Stop the conversion with an error.
    Abort,
}

/// Number of rows between progress events.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10_000;

/// Upper bound on transformer threads.
pub const MAX_WORKERS: usize = 1024;

/// Options controlling a conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Treat the first row as a header.
    pub has_header: bool,
    /// Use header names instead of positions as feature keys. Implies `has_header`.
    pub header_names: bool,
    /// Write the label field. False for prediction-only output.
    pub emit_label: bool,
    /// Transformer worker count. Zero means one per CPU.
    pub workers: usize,
    /// Keep input order when running more than one worker.
    pub ordered: bool,
    /// Field delimiter of the input.
    pub delimiter: u8,
    /// Handling of rows that cannot be transformed.
    pub short_rows: ShortRowPolicy,
    /// Rows between progress events. Zero disables progress events.
    pub progress_interval: u64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            header_names: false,
            emit_label: true,
            workers: 0,
            ordered: false,
            delimiter: b',',
            short_rows: ShortRowPolicy::default(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl ConvertOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_header(mut self, enable: bool) -> Self {
        self.has_header = enable;
        self
    }

    #[must_use]
    pub fn with_header_names(mut self, enable: bool) -> Self {
        self.header_names = enable;
        self
    }

    #[must_use]
    pub fn with_emit_label(mut self, enable: bool) -> Self {
        self.emit_label = enable;
        self
    }

    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    #[must_use]
    pub fn with_ordered(mut self, enable: bool) -> Self {
        self.ordered = enable;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_short_rows(mut self, policy: ShortRowPolicy) -> Self {
        self.short_rows = policy;
        self
    }

    #[must_use]
    pub fn with_progress_interval(mut self, rows: u64) -> Self {
        self.progress_interval = rows;
        self
    }

    /// Whether the first row must be read as a header.
    #[must_use]
    pub fn reads_header(&self) -> bool {
        self.has_header || self.header_names
    }

    /// Worker count with zero replaced by the number of CPUs, capped at
    /// [`MAX_WORKERS`].
    #[must_use]
    pub fn worker_count(&self) -> usize {
        let workers = if self.workers == 0 {
            num_cpus::get().max(1)
        } else {
            self.workers
        };
        workers.min(MAX_WORKERS)
    }
}

/// Column layout resolved against the header, immutable once built.
#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    pub label: ColumnRef,
    pub tag: ColumnRef,
    pub importance: ColumnRef,
    pub nominal: BTreeSet<usize>,
    pub remove: BTreeSet<usize>,
    /// False in prediction-only mode.
    pub emit_label: bool,
    /// Emit header names instead of positions as feature keys.
    pub use_names: bool,
    /// Present when a header row was read.
    pub header: Option<Header>,
}

impl ResolvedConfig {
    /// Whether column `index` is treated as nominal.
    #[must_use]
    pub fn is_nominal(&self, index: usize) -> bool {
        self.nominal.contains(&index)
    }

    /// Whether column `index` is dropped from the feature list.
    #[must_use]
    pub fn is_removed(&self, index: usize) -> bool {
        self.remove.contains(&index)
    }
}
