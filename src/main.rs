use std::error::Error as _;
use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use seriescast::cli::Cli;
use seriescast::pipeline;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_directive()));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => return fail(&e),
    };

    match pipeline::run(&config, io::stdout().lock()) {
        Ok(report) => {
            if let Some(e) = report.render_error {
                eprintln!("warning: {}", e);
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn fail(err: &seriescast::Error) -> ExitCode {
    eprintln!("error: {}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {}", cause);
        source = cause.source();
    }
    ExitCode::FAILURE
}
