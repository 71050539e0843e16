//! CLI entry point for the border crossing report.
//!
//! Reads a border crossing table and writes monthly totals with running
//! averages per border and measure, newest month first.

use anyhow::{Context, Result};
use clap::Parser;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "border_analytics")]
#[command(about = "Monthly border crossing totals and running averages", long_about = None)]
struct Cli {
    /// Border crossing CSV to read
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Report CSV to write (overwritten if present)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_logging();

    let cli = Cli::parse();

    let summary = border_analytics::run(&cli.input, &cli.output)
        .inspect_err(|e| error!(error = %e, "Run failed"))
        .with_context(|| {
            format!(
                "failed to build report from {} into {}",
                cli.input.display(),
                cli.output.display()
            )
        })?;

    info!(
        rows = summary.rows,
        output = %cli.output.display(),
        "Report ready"
    );
    Ok(())
}

/// Logging setup: colored stderr, plus a JSON rolling log file when
/// `LOG_FILE_PATH` is set. The returned guard must outlive all logging.
fn init_logging() -> Option<WorkerGuard> {
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "info"));

    let (json_layer, guard) = match std::env::var("LOG_FILE_PATH") {
        Ok(log_file_path) => {
            let log_dir = Path::new(&log_file_path)
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("logs"));
            let log_file_name = Path::new(&log_file_path)
                .file_name()
                .unwrap_or(OsStr::new("border_analytics.log"));

            let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(non_blocking_file)
                .with_filter(env_filter("RUST_LOG_JSON", "debug"));
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    guard
}

/// Reads directives from `var`, always enabling `default` as a floor.
fn env_filter(var: &str, default: &str) -> EnvFilter {
    let filter = EnvFilter::from_env(var);
    match default.parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}
