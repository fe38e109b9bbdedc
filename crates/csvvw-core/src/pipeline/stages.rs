//! Producer, transformer and writer stages of the conversion pipeline.
//!
//! Stages talk over bounded channels only. A stage that fails raises the
//! shared `cancelled` flag so the others stop at their next row, and dropping
//! a stage's channel ends unblocks whoever waits on it.

use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, Sender};
use csv::StringRecord;
use tracing::{info, warn};

use crate::config::{ResolvedConfig, ShortRowPolicy};
use crate::error::{ConvertError, Result};
use crate::transform::RowTransformer;

use super::reorder::ReorderBuffer;

/// A data row on its way to a transformer.
#[derive(Debug)]
pub(crate) struct RowJob {
    /// Zero-based position among data rows.
    pub seq: u64,
    /// One-based record number in the input, header included.
    pub row: u64,
    pub record: StringRecord,
}

/// Output of one row. `None` for a skipped row.
#[derive(Debug)]
pub(crate) struct LineResult {
    pub seq: u64,
    pub line: Option<String>,
}

pub(crate) fn cancel(cancelled: &AtomicBool) {
    cancelled.store(true, Ordering::Release);
}

fn is_cancelled(cancelled: &AtomicBool) -> bool {
    cancelled.load(Ordering::Acquire)
}

/// Reads data rows and feeds them to the workers. Returns the number of rows read.
pub(crate) fn produce<R: Read>(
    mut reader: csv::Reader<R>,
    rows: &Sender<RowJob>,
    rows_before: u64,
    progress_interval: u64,
    cancelled: &AtomicBool,
) -> Result<u64> {
    let mut read = 0u64;
    let mut record = StringRecord::new();
    while !is_cancelled(cancelled) {
        let row = rows_before + read + 1;
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(source) => {
                cancel(cancelled);
                return Err(ConvertError::CsvParse { row, source });
            }
        }
        let job = RowJob {
            seq: read,
            row,
            record: std::mem::take(&mut record),
        };
        if rows.send(job).is_err() {
            break;
        }
        read += 1;
        if progress_interval > 0 && read % progress_interval == 0 {
            info!(rows_read = read, "progress");
        }
    }
    Ok(read)
}

/// Transforms rows until the row channel closes. Returns the number of skipped rows.
pub(crate) fn transform_rows(
    worker: usize,
    config: &ResolvedConfig,
    policy: ShortRowPolicy,
    rows: &Receiver<RowJob>,
    lines: &Sender<LineResult>,
    cancelled: &AtomicBool,
) -> Result<u64> {
    let transformer = RowTransformer::new(config);
    let mut skipped = 0u64;
    for job in rows {
        if is_cancelled(cancelled) {
            break;
        }
        let line = match transformer.transform(&job.record) {
            Ok(line) => Some(line),
            Err(source) => match policy {
                ShortRowPolicy::Skip => {
                    warn!(worker, row = job.row, error = %source, "skipping row");
                    skipped += 1;
                    None
                }
                ShortRowPolicy::Abort => {
                    cancel(cancelled);
                    return Err(ConvertError::Row {
                        row: job.row,
                        source,
                    });
                }
            },
        };
        if lines.send(LineResult { seq: job.seq, line }).is_err() {
            break;
        }
    }
    Ok(skipped)
}

/// Writes transformed lines, in arrival order or, when `ordered`, in input
/// order. Returns the number of lines written.
pub(crate) fn write_lines<W: Write>(
    lines: &Receiver<LineResult>,
    output: W,
    ordered: bool,
    cancelled: &AtomicBool,
) -> Result<u64> {
    copy_lines(lines, output, ordered, cancelled).map_err(|source| {
        cancel(cancelled);
        ConvertError::Write(source)
    })
}

fn copy_lines<W: Write>(
    lines: &Receiver<LineResult>,
    mut output: W,
    ordered: bool,
    cancelled: &AtomicBool,
) -> io::Result<u64> {
    let mut reorder = ordered.then(ReorderBuffer::new);
    let mut written = 0u64;
    for result in lines {
        if is_cancelled(cancelled) {
            break;
        }
        match reorder.as_mut() {
            Some(buffer) => {
                buffer.push(result.seq, result.line);
                while let Some(line) = buffer.pop_ready() {
                    written += write_line(&mut output, line)?;
                }
            }
            None => written += write_line(&mut output, result.line)?,
        }
    }
    output.flush()?;
    Ok(written)
}

fn write_line<W: Write>(output: &mut W, line: Option<String>) -> io::Result<u64> {
    match line {
        Some(line) => {
            output.write_all(line.as_bytes())?;
            Ok(1)
        }
        None => Ok(0),
    }
}
