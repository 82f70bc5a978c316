//! Drake CLI
//!
//! Entry point for the Drake front end. Parses CLI arguments and delegates
//! to the Driver for lexing and parsing.

use clap::Parser as ClapParser;
use drake_cli::{logger, Cli, CliError, DiagnosticPrinter, Driver, SourceInput};

fn main() {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let input = match SourceInput::from_cli(&cli) {
        Ok(input) => input,
        Err(e) => {
            eprintln!(
                "error: could not read file '{}': {}",
                cli.file.as_deref().unwrap_or_default(),
                e
            );
            std::process::exit(1);
        }
    };

    let driver = Driver::from_cli(&cli);
    let result = driver
        .render(&input.text)
        .and_then(|rendered| driver.write_output(&rendered, cli.output.as_deref()));

    match result {
        Ok(()) => {}
        Err(CliError::Drake(e)) => {
            DiagnosticPrinter::new(&input.name, &input.text).print(&e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
