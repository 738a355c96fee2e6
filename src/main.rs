// Entrypoint for the uploader.
// - Sets up logging on stderr (`RUST_LOG`, default `warn`).
// - Runs one publish and reports any failure as a single line.

use ameliorate_uploader::ui;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match ui::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("\n✗ {}", ui::describe_failure(&err));
            ExitCode::FAILURE
        }
    }
}
