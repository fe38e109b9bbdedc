//! Streaming conversion driver.
//!
//! One producer thread parses rows, `N` worker threads transform them and the
//! calling thread writes the resulting lines:
//!
//! ```text
//! input -> producer -> [rows] -> worker x N -> [lines] -> writer -> output
//! ```
//!
//! Both channels are bounded to a few slots per worker, so memory stays
//! proportional to the worker count. With one worker, or with `ordered` set,
//! lines come out in input order; otherwise in completion order.

mod reorder;
mod stages;

use std::io::{Read, Write};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::thread::{self, ScopedJoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::bounded;
use csv::StringRecord;
use tracing::{debug, info, info_span};

use crate::column::resolve;
use crate::config::{ColumnSpecs, ConvertOptions};
use crate::error::{ConvertError, Result};
use crate::header::Header;
use crate::reader::{create_output, csv_reader, open_input};

pub use reorder::ReorderBuffer;

/// Queue slots per worker for both channels.
pub const QUEUE_SLOTS_PER_WORKER: usize = 10;

/// Counts reported at the end of a conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Whether the first row was consumed as a header.
    pub header_read: bool,
    /// Data rows read, header excluded.
    pub rows_read: u64,
    /// Lines written to the output.
    pub lines_written: u64,
    /// Rows dropped by the skip policy.
    pub rows_skipped: u64,
    /// Transformer threads used.
    pub workers: usize,
    pub duration: Duration,
}

/// Converts CSV input to Vowpal Wabbit lines.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    specs: ColumnSpecs,
    options: ConvertOptions,
}

impl Converter {
    pub fn new(specs: ColumnSpecs, options: ConvertOptions) -> Self {
        Self { specs, options }
    }

    pub fn specs(&self) -> &ColumnSpecs {
        &self.specs
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Converts from `input` to `output` and flushes `output`.
    ///
    /// Column specifiers are resolved after the header row (if any) was read
    /// and before any data row is transformed.
    pub fn run<R, W>(&self, input: R, output: W) -> Result<ConversionSummary>
    where
        R: Read + Send,
        W: Write,
    {
        let start = Instant::now();
        let options = &self.options;
        let mut reader = csv_reader(input, options.delimiter);

        let header = if options.reads_header() {
            Some(read_header(&mut reader)?)
        } else {
            None
        };
        let header_read = header.is_some();
        let config = resolve(&self.specs, options, header)?;

        let workers = options.worker_count();
        let capacity = workers * QUEUE_SLOTS_PER_WORKER;
        let span = info_span!("convert", workers, ordered = options.ordered);
        let _guard = span.enter();
        info!(header = header_read, "started conversion");

        let (row_tx, row_rx) = bounded(capacity);
        let (line_tx, line_rx) = bounded(capacity);
        let cancelled = AtomicBool::new(false);
        let cancelled = &cancelled;
        let config = &config;
        let rows_before = u64::from(header_read);
        let progress_interval = options.progress_interval;
        let policy = options.short_rows;

        let (read, skipped, written) = thread::scope(|scope| {
            let spawned = thread::Builder::new()
                .name("csvvw-producer".into())
                .spawn_scoped(scope, move || {
                    stages::produce(reader, &row_tx, rows_before, progress_interval, cancelled)
                });
            let producer = match spawned {
                Ok(handle) => handle,
                Err(source) => {
                    let error = ConvertError::ThreadSpawn {
                        stage: "producer",
                        source,
                    };
                    return (Err(error), Ok(0), Ok(0));
                }
            };

            let mut handles = Vec::with_capacity(workers);
            let mut spawn_error = None;
            for worker in 0..workers {
                let rows = row_rx.clone();
                let lines = line_tx.clone();
                let spawned = thread::Builder::new()
                    .name(format!("csvvw-worker-{worker}"))
                    .spawn_scoped(scope, move || {
                        stages::transform_rows(worker, config, policy, &rows, &lines, cancelled)
                    });
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(source) => {
                        stages::cancel(cancelled);
                        spawn_error = Some(ConvertError::ThreadSpawn {
                            stage: "worker",
                            source,
                        });
                        break;
                    }
                }
            }
            // Workers hold the only remaining channel ends.
            drop(row_rx);
            drop(line_tx);

            let written = stages::write_lines(&line_rx, output, options.ordered, cancelled);
            drop(line_rx);

            let read = join(producer, "producer");
            let mut skipped = spawn_error.map_or(Ok(0u64), Err);
            for handle in handles {
                let result = join(handle, "worker");
                skipped = match (skipped, result) {
                    (Ok(total), Ok(count)) => Ok(total + count),
                    (Err(error), _) | (Ok(_), Err(error)) => Err(error),
                };
            }
            (read, skipped, written)
        });

        let summary = ConversionSummary {
            header_read,
            rows_read: read?,
            rows_skipped: skipped?,
            lines_written: written?,
            workers,
            duration: start.elapsed(),
        };
        info!(
            rows_read = summary.rows_read,
            lines_written = summary.lines_written,
            rows_skipped = summary.rows_skipped,
            duration_ms = summary.duration.as_millis(),
            "conversion complete"
        );
        Ok(summary)
    }

    /// Converts between files. `None` or `-` selects stdin/stdout.
    pub fn run_paths(
        &self,
        input: Option<&Path>,
        output: Option<&Path>,
    ) -> Result<ConversionSummary> {
        let reader = open_input(input)?;
        let writer = create_output(output)?;
        debug!(
            input = %input.map_or("-".into(), |p| p.display().to_string()),
            output = %output.map_or("-".into(), |p| p.display().to_string()),
            "opened streams"
        );
        self.run(reader, writer)
    }
}

/// Reads the first record as the header row.
fn read_header<R: Read>(reader: &mut csv::Reader<R>) -> Result<Header> {
    let mut record = StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => {
            let header = Header::from_record(&record);
            debug!(columns = header.len(), "read header");
            Ok(header)
        }
        Ok(false) => Err(ConvertError::MissingHeader),
        Err(source) => Err(ConvertError::CsvParse { row: 1, source }),
    }
}

fn join<T>(handle: ScopedJoinHandle<'_, Result<T>>, stage: &'static str) -> Result<T> {
    handle
        .join()
        .map_err(|_| ConvertError::ThreadPanicked { stage })?
}

/// Converts with the given specifiers and options. See [`Converter::run`].
pub fn convert<R, W>(
    specs: ColumnSpecs,
    options: ConvertOptions,
    input: R,
    output: W,
) -> Result<ConversionSummary>
where
    R: Read + Send,
    W: Write,
{
    Converter::new(specs, options).run(input, output)
}
