use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use querystats_analyzer::config::Config;
use querystats_analyzer::services::query_stats;
use querystats_analyzer::{AppState, build_router, console};

/// MongoDB query metrics analyzer
///
/// Summarizes a `$queryStats` dump by query shape: execution counts, latency,
/// and document/index scan volumes, either as console tables or as a local
/// web dashboard.
#[derive(Parser, Debug)]
#[command(name = "querystats-analyzer", version, about)]
struct Cli {
    /// JSON file containing `$queryStats` aggregation output
    file: PathBuf,

    /// Serve the web dashboard instead of printing console tables
    #[arg(long)]
    web: bool,

    /// Dashboard bind host (overrides configuration)
    #[arg(long)]
    host: Option<String>,

    /// Dashboard bind port (overrides configuration)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    // Keep the non-blocking writer guard alive for the process lifetime.
    let _log_guard = init_tracing(&config);

    let raw = fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;
    let dump: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid JSON in {}", cli.file.display()))?;

    let records = query_stats::first_batch(&dump);
    let analysis = query_stats::aggregate(records);
    info!(
        records = records.len(),
        shapes = analysis.groups.len(),
        "Analysis complete"
    );

    if cli.web {
        let addr = format!("{}:{}", config.server.host, config.server.port);
        let state = Arc::new(AppState { analysis });

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        info!("Dashboard listening on http://{}", addr);

        axum::serve(listener, build_router(state))
            .await
            .context("Dashboard server failed")?;
    } else {
        console::print_tables(&analysis);
    }

    Ok(())
}

/// Initialize tracing from the logging configuration.
///
/// Diagnostics go to stderr so console tables stay clean on stdout; setting
/// `logging.file` redirects them to a file instead.
fn init_tracing(config: &Config) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_new(&config.logging.level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match &config.logging.file {
        Some(file) => {
            let path = std::path::Path::new(file);
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
            let name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "querystats-analyzer.log".into());
            let appender =
                tracing_appender::rolling::never(dir.unwrap_or(std::path::Path::new(".")), name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    }
}
