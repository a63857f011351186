//! fitpick - best-fit combination search CLI

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use fitpick::Result;
use fitpick::app::AppContext;
use fitpick::cli::Cli;
use fitpick::cli::output::robot_error_structured;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.wants_json() {
                // Machine mode: structured error on stdout
                let response = robot_error_structured(&e);
                println!("{}", serde_json::to_string(&response).unwrap_or_default());
            } else {
                let structured = e.to_structured();
                eprintln!("Error: {e}");
                eprintln!("Hint: {}", structured.suggestion);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let ctx = AppContext::from_cli(cli)?;
    fitpick::cli::commands::run(&ctx, &cli.command)
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,fitpick=info",
        1 => "info,fitpick=debug",
        2 => "debug,fitpick=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.wants_json() {
        // JSON logging for machine mode
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
