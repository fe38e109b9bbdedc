//! Input and output streams.
//!
//! `-` or no path selects stdin/stdout.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{ConvertError, Result};

/// Path meaning stdin or stdout.
pub const STDIO_PATH: &str = "-";

fn is_stdio(path: Option<&Path>) -> bool {
    path.is_none_or(|path| path.as_os_str() == STDIO_PATH)
}

/// Opens the input file, or stdin when `path` is `None` or `-`.
pub fn open_input(path: Option<&Path>) -> Result<Box<dyn Read + Send>> {
    let Some(path) = path.filter(|_| !is_stdio(path)) else {
        return Ok(Box::new(io::stdin()));
    };
    let file = File::open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ConvertError::InputNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConvertError::InputOpen {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    Ok(Box::new(BufReader::new(file)))
}

/// Creates the output file, or uses stdout when `path` is `None` or `-`.
pub fn create_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    let Some(path) = path.filter(|_| !is_stdio(path)) else {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    };
    let file = File::create(path).map_err(|e| ConvertError::OutputCreate {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(Box::new(BufWriter::new(file)))
}

/// Parses a delimiter argument into a single ASCII byte.
pub fn parse_delimiter(value: &str) -> Result<u8> {
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ if value == "\\t" => Ok(b'\t'),
        _ => Err(ConvertError::InvalidDelimiter(value.to_string())),
    }
}

/// Builds a CSV reader that accepts rows of varying width.
///
/// Headers are not consumed by the reader; the pipeline reads the first
/// record itself so that header and data rows share one code path.
pub fn csv_reader<R: Read>(input: R, delimiter: u8) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .buffer_capacity(1 << 20)
        .from_reader(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert!(matches!(
            parse_delimiter("ab"),
            Err(ConvertError::InvalidDelimiter(_))
        ));
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("é").is_err());
    }

    #[test]
    fn test_open_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.csv");
        let result = open_input(Some(&missing));
        assert!(matches!(result, Err(ConvertError::InputNotFound { .. })));
    }

    #[test]
    fn test_csv_reader_allows_jagged_rows() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "a,b,c\n1\n\"x,y\",\"say \"\"hi\"\"\"\n").unwrap();

        let input = open_input(Some(file.path())).unwrap();
        let mut reader = csv_reader(input, b',');
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[1].len(), 1);
        assert_eq!(&rows[2][0], "x,y");
        assert_eq!(&rows[2][1], "say \"hi\"");
    }

    #[test]
    fn test_create_output_in_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.vw");
        assert!(matches!(
            create_output(Some(&path)),
            Err(ConvertError::OutputCreate { .. })
        ));
    }
}
