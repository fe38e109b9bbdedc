//! Header row and column name lookup.

use std::collections::HashMap;

/// Column names read from the first row of the input.
#[derive(Debug, Clone, Default)]
pub struct Header {
    /// Column names in input order, verbatim.
    names: Vec<String>,
    /// Name to zero-based position. Duplicate names map to the last position.
    positions: HashMap<String, usize>,
}

impl Header {
    /// Creates a header from the cells of the first row.
    pub fn new(names: Vec<String>) -> Self {
        let positions = names
            .iter()
            .enumerate()
            .map(|(index, name)| (name.clone(), index))
            .collect();
        Self { names, positions }
    }

    /// Creates a header from a parsed CSV record.
    pub fn from_record(record: &csv::StringRecord) -> Self {
        Self::new(record.iter().map(str::to_string).collect())
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the position of a column name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Returns the name of the column at `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Column names in input order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}
