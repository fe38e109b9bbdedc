//! Column specifier parsing and resolution.
//!
//! A specifier is either a decimal position or a column name. Anything that
//! parses as an integer is a position, so a column literally named `23` has
//! to be written `_23`: one leading underscore is stripped before the name
//! lookup.

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::{ColumnRef, ColumnSpecs, ConvertOptions, ResolvedConfig};
use crate::error::{ConvertError, Result};
use crate::header::Header;

/// Position value meaning "absent", or "last cell" for the label.
const SENTINEL: i64 = -1;

/// A parsed, not yet resolved, column specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specifier<'a> {
    Position(i64),
    Name(&'a str),
}

impl<'a> Specifier<'a> {
    pub fn parse(raw: &'a str) -> Self {
        match raw.parse::<i64>() {
            Ok(position) => Self::Position(position),
            Err(_) => Self::Name(raw.strip_prefix('_').unwrap_or(raw)),
        }
    }
}

/// Resolves a specifier to a raw position, which may be negative.
fn resolve_position(raw: &str, header: Option<&Header>) -> Result<i64> {
    match Specifier::parse(raw) {
        Specifier::Position(position) => Ok(position),
        Specifier::Name(name) => header
            .and_then(|header| header.position(name))
            .and_then(|index| i64::try_from(index).ok())
            .ok_or_else(|| ConvertError::UnresolvedColumn {
                specifier: raw.to_string(),
                header_available: header.is_some(),
            }),
    }
}

fn to_index(raw: &str, position: i64) -> Result<usize> {
    usize::try_from(position).map_err(|_| ConvertError::InvalidPosition {
        specifier: raw.to_string(),
        value: position,
    })
}

/// Resolves a tag or importance specifier. `-1` means absent.
pub fn resolve_column(raw: &str, header: Option<&Header>) -> Result<ColumnRef> {
    match resolve_position(raw, header)? {
        SENTINEL => Ok(ColumnRef::Absent),
        position => to_index(raw, position).map(ColumnRef::AtIndex),
    }
}

/// Resolves the label specifier. `-1` means the last cell of every row.
pub fn resolve_label(raw: &str, header: Option<&Header>) -> Result<ColumnRef> {
    match resolve_position(raw, header)? {
        SENTINEL => Ok(ColumnRef::LastCell),
        position => to_index(raw, position).map(ColumnRef::AtIndex),
    }
}

/// Resolves a comma separated specifier list. Empty entries are skipped.
pub fn resolve_list(raw: &str, header: Option<&Header>) -> Result<BTreeSet<usize>> {
    raw.split(',')
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let position = resolve_position(entry, header)?;
            to_index(entry, position)
        })
        .collect()
}

/// Builds the immutable column layout for a conversion.
///
/// `header` must be the first input row when `options.reads_header()` is set,
/// and `None` otherwise.
pub fn resolve(
    specs: &ColumnSpecs,
    options: &ConvertOptions,
    header: Option<Header>,
) -> Result<ResolvedConfig> {
    if options.header_names && header.as_ref().is_none_or(Header::is_empty) {
        return Err(ConvertError::EmptyHeader);
    }

    let lookup = header.as_ref();
    let config = ResolvedConfig {
        label: resolve_label(&specs.label, lookup)?,
        tag: resolve_column(&specs.tag, lookup)?,
        importance: resolve_column(&specs.importance, lookup)?,
        nominal: resolve_list(&specs.nominal, lookup)?,
        remove: resolve_list(&specs.remove, lookup)?,
        emit_label: options.emit_label,
        use_names: options.header_names,
        header,
    };

    debug!(
        label = ?config.label,
        tag = ?config.tag,
        importance = ?config.importance,
        nominal = config.nominal.len(),
        remove = config.remove.len(),
        use_names = config.use_names,
        "resolved columns"
    );
    Ok(config)
}
