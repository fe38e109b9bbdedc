//! Integration tests for flag handling and file conversion.

use std::fs;
use std::path::Path;

use csvvw_cli::cli::{Cli, ShortRowArg};
use csvvw_cli::commands::{column_specs, convert_options, run_convert};
use csvvw_cli::logging::LogFormat;
use csvvw_core::{ColumnSpecs, ShortRowPolicy};
use tracing::level_filters::LevelFilter;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_normalized(std::iter::once("csvvw").chain(args.iter().copied())).unwrap()
}

fn convert_file(dir: &Path, input: &str, flags: &[&str]) -> String {
    let input_path = dir.join("input.csv");
    let output_path = dir.join("output.vw");
    fs::write(&input_path, input).unwrap();

    let mut args = vec![
        "-i",
        input_path.to_str().unwrap(),
        "-o",
        output_path.to_str().unwrap(),
    ];
    args.extend_from_slice(flags);
    run_convert(&parse(&args)).unwrap();
    fs::read_to_string(output_path).unwrap()
}

#[test]
fn test_defaults() {
    let cli = parse(&[]);
    assert_eq!(column_specs(&cli), ColumnSpecs::default());

    let options = convert_options(&cli).unwrap();
    assert!(options.has_header);
    assert!(!options.header_names);
    assert!(options.emit_label);
    assert_eq!(options.workers, 0);
    assert_eq!(options.delimiter, b',');
    assert_eq!(options.short_rows, ShortRowPolicy::Skip);
    assert!(cli.input.is_none());
    assert!(cli.output.is_none());
}

#[test]
fn test_go_style_flags() {
    let cli = parse(&[
        "-l", "-1", "-id", "-1", "-w", "3", "-n", "1,color", "-r", "_7", "-ncpu", "-2",
        "-header=false", "-nolabel", "-q",
    ]);
    let specs = column_specs(&cli);
    assert_eq!(specs.label, "-1");
    assert_eq!(specs.tag, "-1");
    assert_eq!(specs.importance, "3");
    assert_eq!(specs.nominal, "1,color");
    assert_eq!(specs.remove, "_7");

    let options = convert_options(&cli).unwrap();
    assert!(!options.has_header);
    assert!(!options.emit_label);
    assert_eq!(options.workers, 0);
    assert!(cli.verbosity.is_present());
}

#[test]
fn test_header_names_imply_header() {
    let cli = parse(&["-header=false", "-headernames"]);
    let options = convert_options(&cli).unwrap();
    assert!(options.has_header);
    assert!(options.header_names);
}

#[test]
fn test_double_dash_flags() {
    let cli = parse(&[
        "--ncpu=3",
        "--ordered",
        "--delimiter",
        ";",
        "--on-short-row",
        "abort",
    ]);
    assert_eq!(cli.on_short_row, ShortRowArg::Abort);
    let options = convert_options(&cli).unwrap();
    assert_eq!(options.workers, 3);
    assert!(options.ordered);
    assert_eq!(options.delimiter, b';');
    assert_eq!(options.short_rows, ShortRowPolicy::Abort);
}

#[test]
fn test_log_config_levels() {
    let config = parse(&[]).log_config();
    assert_eq!(config.level_filter, LevelFilter::INFO);
    assert!(config.use_env_filter);

    // Quiet drops info, which carries the progress events.
    let config = parse(&["-q"]).log_config();
    assert_eq!(config.level_filter, LevelFilter::WARN);
    assert!(!config.use_env_filter);

    let config = parse(&["-q", "--log-level", "debug", "--log-format", "json"]).log_config();
    assert_eq!(config.level_filter, LevelFilter::DEBUG);
    assert_eq!(config.format, LogFormat::Json);
    assert!(!config.use_env_filter);
}

#[test]
fn test_invalid_delimiter() {
    let cli = parse(&["--delimiter", "::"]);
    assert!(convert_options(&cli).is_err());
}

#[test]
fn test_bool_flag_rejects_detached_value() {
    let result = Cli::try_parse_normalized(["csvvw", "-header", "false"]);
    assert!(result.is_err());
}

#[test]
fn test_convert_with_header_names() {
    let dir = tempfile::tempdir().unwrap();
    let output = convert_file(
        dir.path(),
        "y,a,b,c\n1,0,2,hello\n-1,3,0,world\n",
        &["-headernames=true", "-l", "y", "-n", "c", "-ncpu", "1"],
    );
    assert_eq!(output, "1 |n b:2 c=hello \n-1 |n a:3 c=world \n");
}

#[test]
fn test_convert_without_header() {
    let dir = tempfile::tempdir().unwrap();
    let output = convert_file(
        dir.path(),
        "1,0.5,ex1,2.0,3.0\n",
        &["-header=false", "-l", "0", "-w", "1", "-id", "2", "-ncpu", "1"],
    );
    assert_eq!(output, "1 0.5 ex1|n 3:2.0 4:3.0 \n");
}

#[test]
fn test_convert_reports_unresolved_column() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("input.csv");
    let output_path = dir.path().join("output.vw");
    fs::write(&input_path, "1,2\n").unwrap();

    let cli = parse(&[
        "-i",
        input_path.to_str().unwrap(),
        "-o",
        output_path.to_str().unwrap(),
        "-header=false",
        "-l",
        "target",
    ]);
    let error = run_convert(&cli).unwrap_err();
    let message = format!("{error:#}");
    assert!(message.contains("'target'"), "{message}");
    assert!(message.contains("no header row was read"), "{message}");
}
