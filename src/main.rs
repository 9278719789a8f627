mod app;
mod bridge;
mod classify;
mod config;
mod error;
mod events;
mod i18n;
mod ipc;
mod store;
mod surface;
mod theme;
mod transport;
mod util;
mod views;

use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("notify_hud=info")),
        )
        .init();

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        println!("{}", config::USAGE);
        return ExitCode::SUCCESS;
    }

    let settings = match config::CliArgs::parse(args).and_then(config::load) {
        Ok(s) => s,
        Err(e) => {
            error!("{e}");
            eprintln!("{}", config::USAGE);
            return ExitCode::FAILURE;
        }
    };

    match app::run(settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
