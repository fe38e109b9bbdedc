//! Row to Vowpal Wabbit line transformation.
//!
//! Output grammar, fields separated by single spaces:
//!
//! ```text
//! [label] [importance] [tag]|n [feature ...]
//! ```
//!
//! Features are `key:value` for numeric columns and `key=value` for nominal
//! columns. Empty cells and numeric cells equal to zero are left out. Every
//! feature is followed by one space, including the last one.

use std::fmt::Write as _;

use csv::StringRecord;

use crate::config::{ColumnRef, ColumnRole, ResolvedConfig};
use crate::error::RowError;

/// Namespace marker between the prefix and the features.
pub const NAMESPACE: &str = "|n ";

/// Separator between key and value of a numeric feature.
pub const NUMERIC_SEPARATOR: char = ':';

/// Separator between key and value of a nominal feature.
pub const NOMINAL_SEPARATOR: char = '=';

/// Returns true if `value` parses as a float other than zero.
///
/// Unparseable text counts as zero, so non-numeric cells in numeric columns
/// are dropped. `NaN` is not equal to zero and is kept. Finite text that
/// overflows to infinity (`1e400`) is out of range and dropped; the literal
/// spellings `inf` and `infinity` are kept.
pub fn is_nonzero_number(value: &str) -> bool {
    match value.parse::<f64>() {
        Ok(number) if number.is_infinite() => is_infinity_literal(value),
        Ok(number) => number != 0.0,
        Err(_) => false,
    }
}

fn is_infinity_literal(value: &str) -> bool {
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Stateless transformer over a shared, resolved column layout.
#[derive(Debug, Clone, Copy)]
pub struct RowTransformer<'a> {
    config: &'a ResolvedConfig,
}

impl<'a> RowTransformer<'a> {
    pub fn new(config: &'a ResolvedConfig) -> Self {
        Self { config }
    }

    /// Transforms one row into one newline-terminated output line.
    pub fn transform(&self, row: &StringRecord) -> Result<String, RowError> {
        let mut line = String::with_capacity(row.as_slice().len() + 2 * row.len() + 8);
        self.write_line(row, &mut line)?;
        Ok(line)
    }

    /// Appends the output line for `row` to `out`.
    ///
    /// On error `out` may hold a partial line.
    pub fn write_line(&self, row: &StringRecord, out: &mut String) -> Result<(), RowError> {
        let config = self.config;
        let width = row.len();
        let label = config.label.index_in(width);
        let tag = config.tag.index_in(width);
        let importance = config.importance.index_in(width);

        if config.emit_label {
            if config.label == ColumnRef::LastCell && label.is_none() {
                return Err(RowError::EmptyRow);
            }
            if let Some(index) = label {
                out.push_str(cell(row, ColumnRole::Label, index)?);
                out.push(' ');
            }
        }
        if let Some(index) = importance {
            out.push_str(cell(row, ColumnRole::Importance, index)?);
            out.push(' ');
        }
        if let Some(index) = tag {
            out.push_str(cell(row, ColumnRole::Tag, index)?);
        }
        out.push_str(NAMESPACE);

        for (index, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let special = Some(index) == label || Some(index) == tag || Some(index) == importance;
            if special || config.is_removed(index) {
                continue;
            }
            let nominal = config.is_nominal(index);
            if !nominal && !is_nonzero_number(value) {
                continue;
            }
            self.write_key(index, out)?;
            out.push(if nominal {
                NOMINAL_SEPARATOR
            } else {
                NUMERIC_SEPARATOR
            });
            out.push_str(value);
            out.push(' ');
        }

        out.push('\n');
        Ok(())
    }

    fn write_key(&self, index: usize, out: &mut String) -> Result<(), RowError> {
        if !self.config.use_names {
            // Writing to a String cannot fail.
            let _ = write!(out, "{index}");
            return Ok(());
        }
        let header = self.config.header.as_ref();
        match header.and_then(|header| header.name(index)) {
            Some(name) => {
                out.push_str(name);
                Ok(())
            }
            None => Err(RowError::UnnamedColumn {
                index,
                header_width: header.map_or(0, |header| header.len()),
            }),
        }
    }
}

fn cell(row: &StringRecord, role: ColumnRole, index: usize) -> Result<&str, RowError> {
    row.get(index).ok_or(RowError::ColumnOutOfRange {
        role,
        index,
        width: row.len(),
    })
}
