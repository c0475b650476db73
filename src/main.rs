//! scangate - Terminal Gate Check Scanner
//!
//! Entry point for the scangate CLI application.

use clap::Parser;
use scangate::{
    cli::Cli,
    error::{ExitCode, StructuredError},
    logging,
};

fn main() {
    let cli = Cli::parse();
    let json_errors = cli.json_errors;

    if cli.no_color {
        // env_logger and the terminal both honor NO_COLOR.
        std::env::set_var("NO_COLOR", "1");
    }

    logging::init_logging(cli.verbose, cli.quiet);

    match scangate::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::GeneralError;

            if json_errors {
                let structured = StructuredError::new(&err, exit_code);
                if let Ok(json) = serde_json::to_string_pretty(&structured) {
                    eprintln!("{}", json);
                } else {
                    eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
                }
            } else {
                eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            }

            std::process::exit(exit_code.as_i32());
        }
    }
}
