use anyhow::{Context, Result};
use tracing::info;

use csvvw_core::{
    ColumnSpecs, ConversionSummary, ConvertOptions, Converter, ShortRowPolicy, parse_delimiter,
};

use crate::cli::{Cli, ShortRowArg};

/// Builds the column specifiers from CLI flags.
pub fn column_specs(cli: &Cli) -> ColumnSpecs {
    ColumnSpecs::default()
        .with_label(cli.label.as_str())
        .with_tag(cli.tag.as_str())
        .with_importance(cli.importance.as_str())
        .with_nominal(cli.nominal.as_str())
        .with_remove(cli.remove.as_str())
}

/// Builds the conversion options from CLI flags.
pub fn convert_options(cli: &Cli) -> Result<ConvertOptions> {
    let delimiter = parse_delimiter(&cli.delimiter).context("parse --delimiter")?;
    let short_rows = match cli.on_short_row {
        ShortRowArg::Skip => ShortRowPolicy::Skip,
        ShortRowArg::Abort => ShortRowPolicy::Abort,
    };
    Ok(ConvertOptions::new()
        // --headernames implies --header=true
        .with_header(cli.header || cli.header_names)
        .with_header_names(cli.header_names)
        .with_emit_label(!cli.no_label)
        .with_workers(cli.workers())
        .with_ordered(cli.ordered)
        .with_delimiter(delimiter)
        .with_short_rows(short_rows))
}

pub fn run_convert(cli: &Cli) -> Result<ConversionSummary> {
    let converter = Converter::new(column_specs(cli), convert_options(cli)?);
    let options = converter.options();
    info!(
        input = %display_path(cli.input.as_deref()),
        output = %display_path(cli.output.as_deref()),
        header = options.reads_header(),
        header_names = options.header_names,
        workers = options.worker_count(),
        "started data conversion"
    );
    let summary = converter
        .run_paths(cli.input.as_deref(), cli.output.as_deref())
        .context("convert")?;
    info!(
        rows_read = summary.rows_read,
        lines_written = summary.lines_written,
        rows_skipped = summary.rows_skipped,
        "done converting"
    );
    Ok(summary)
}

fn display_path(path: Option<&std::path::Path>) -> String {
    path.map_or_else(|| "-".to_string(), |path| path.display().to_string())
}
