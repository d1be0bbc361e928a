//! This is the main entry point for weather-aug.

use tracing_subscriber::EnvFilter;
use weather_aug::cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::parse(None) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
