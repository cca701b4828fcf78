use std::process::ExitCode;

use clap::Parser;
use latchkey_daemon::{DaemonConfig, daemon, logging};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let config = DaemonConfig::parse();

    if let Err(e) = logging::init(&config) {
        eprintln!("latchkey: {e:#}");
        return ExitCode::FAILURE;
    }

    match daemon::run(&config).await {
        Ok(never) => match never {},
        Err(e) => {
            error!(exit_code = e.exit_code(), "{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
