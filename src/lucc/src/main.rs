use clap::Parser;
use std::process::ExitCode;

use lucc::cli::Cli;
use lucc::{logging, LuccError, Registry};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return report(LuccError::from(e)),
    };

    logging::init(cli.log_level());

    let registry = Registry::builtin();
    match lucc::run(&cli, &registry) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(err),
    }
}

fn report(err: LuccError) -> ExitCode {
    match &err {
        // clap formats its own usage and help output
        LuccError::Usage(e) => {
            let _ = e.print();
        }
        LuccError::UnknownCommand(_) => {
            tracing::error!("{}", err);
            eprint!("{}", Registry::builtin().usage());
        }
        _ => tracing::error!("{}", err.chain()),
    }
    ExitCode::from(err.exit_code())
}
