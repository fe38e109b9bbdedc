//! CSV to Vowpal Wabbit converter CLI.

use csvvw_cli::cli::Cli;
use csvvw_cli::commands::run_convert;
use csvvw_cli::logging::init_logging;

fn main() {
    let cli = Cli::parse_normalized(std::env::args_os());
    cli.color.write_global();
    if let Err(error) = init_logging(&cli.log_config()) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run_convert(&cli) {
        Ok(_) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}
