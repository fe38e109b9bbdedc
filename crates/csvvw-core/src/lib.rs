//! CSV to Vowpal Wabbit conversion.
//!
//! This crate turns delimiter-separated rows into the sparse line format read
//! by Vowpal Wabbit:
//!
//! ```text
//! [label] [importance] [tag]|n [feature ...]
//! ```
//!
//! # Features
//!
//! - **Column resolution**: columns are addressed by position or, with a
//!   header row, by name (`_23` names a column called `23`)
//! - **Sparse encoding**: empty cells and numeric zeros are left out; nominal
//!   columns are written as `key=value`, numeric ones as `key:value`
//! - **Streaming**: a producer, `N` transformer threads and a writer connected
//!   by bounded channels, optionally reordered back to input order
//!
//! # Example
//!
//! ```
//! use csvvw_core::{ColumnSpecs, ConvertOptions, convert};
//!
//! let input = "y,a,b,c\n1,0,2,hello\n";
//! let specs = ColumnSpecs::default().with_label("y").with_nominal("c");
//! let options = ConvertOptions::new().with_header_names(true).with_workers(1);
//!
//! let mut output = Vec::new();
//! let summary = convert(specs, options, input.as_bytes(), &mut output)?;
//!
//! assert_eq!(String::from_utf8(output).unwrap(), "1 |n b:2 c=hello \n");
//! assert_eq!(summary.rows_read, 1);
//! # Ok::<(), csvvw_core::ConvertError>(())
//! ```

mod column;
mod config;
mod error;
mod header;
mod pipeline;
mod reader;
mod transform;

// === Error Types ===
pub use error::{ConvertError, Result, RowError};

// === Configuration ===
pub use config::{
    ColumnRef, ColumnRole, ColumnSpecs, ConvertOptions, DEFAULT_PROGRESS_INTERVAL, MAX_WORKERS,
    ResolvedConfig, ShortRowPolicy,
};

// === Column Resolution ===
pub use column::{Specifier, resolve, resolve_column, resolve_label, resolve_list};
pub use header::Header;

// === Row Transformation ===
pub use transform::{
    NAMESPACE, NOMINAL_SEPARATOR, NUMERIC_SEPARATOR, RowTransformer, is_nonzero_number,
};

// === Pipeline ===
pub use pipeline::{
    ConversionSummary, Converter, QUEUE_SLOTS_PER_WORKER, ReorderBuffer, convert,
};

// === Streams ===
pub use reader::{STDIO_PATH, create_output, csv_reader, open_input, parse_delimiter};
