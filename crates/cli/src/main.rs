use std::process::ExitCode;

use shopfront_core::config::{AppConfig, LoadOptions, LogFormat};

fn main() -> ExitCode {
    init_logging();
    shopfront_cli::run()
}

/// Tracing goes to stderr so command output on stdout stays parseable.
/// A config that fails to load falls back to compact/info; the command
/// itself will surface the config error.
fn init_logging() {
    let (level, format) = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => (config.logging.level, config.logging.format),
        Err(_) => ("info".to_string(), LogFormat::Compact),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if let Err(error) = result {
        eprintln!("failed to initialize logging: {error}");
    }
}
