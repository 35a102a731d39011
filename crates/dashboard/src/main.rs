mod charts;
mod config;
mod error;
mod render;
mod routes;
mod state;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crypto_tracker_core::models::snapshot::ViewMode;
use crypto_tracker_core::CryptoTracker;

use state::AppState;

/// Two-asset crypto tracker: normalized performance, EMA trends, daily logs.
#[derive(Debug, Parser)]
#[command(name = "crypto-tracker", version, about)]
struct Cli {
    /// TOML file overriding the built-in defaults.
    #[arg(long, global = true, env = "TRACKER_CONFIG")]
    config: Option<PathBuf>,

    /// Root directory for logs (`<dir>`) and snapshots (`<dir>/raw_data`).
    #[arg(long, global = true, env = "TRACKER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the dashboard over HTTP (default).
    Serve {
        #[arg(long, env = "TRACKER_BIND", default_value = config::DEFAULT_BIND)]
        bind: SocketAddr,
    },
    /// Run the pipeline once and print the summary.
    Run {
        /// "live" or a saved snapshot date (YYYY-MM-DD).
        #[arg(long, default_value = "live")]
        snapshot: String,
    },
    /// List the saved snapshot dates, newest first.
    Snapshots,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let tracker_config = config::load_tracker_config(cli.config.as_deref(), cli.data_dir)?;
    let tracker = CryptoTracker::new(tracker_config).context("building tracker")?;

    let command = cli.command.unwrap_or(Command::Serve {
        bind: config::DEFAULT_BIND.parse().context("parsing default bind address")?,
    });

    match command {
        Command::Serve { bind } => serve(tracker, bind).await,
        Command::Run { snapshot } => run_once(&tracker, &snapshot).await,
        Command::Snapshots => {
            for date in tracker.available_snapshot_dates()? {
                println!("{date}");
            }
            Ok(())
        }
    }
}

async fn serve(tracker: CryptoTracker, bind: SocketAddr) -> anyhow::Result<()> {
    let state = AppState::new(tracker);
    let app = routes::router(state);

    tracing::info!("Crypto tracker dashboard listening on http://{bind}");

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("binding {bind}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving dashboard")?;
    Ok(())
}

async fn run_once(tracker: &CryptoTracker, snapshot: &str) -> anyhow::Result<()> {
    let mode = ViewMode::parse(snapshot)
        .with_context(|| format!("invalid snapshot selector {snapshot:?}"))?;
    let report = tracker.run(mode).await?;

    let cfg = tracker.config();
    let (a, b) = (&cfg.asset_a.label, &cfg.asset_b.label);
    let s = &report.summary;

    println!("mode: {}", report.mode);
    println!("{a} normalized: {:.4} ({:+.2}%)", s.a_normalized, s.a_return_pct);
    println!("{b} normalized: {:.4} ({:+.2}%)", s.b_normalized, s.b_return_pct);
    println!("{b}/{a} ratio:  {:.4} ({:+.2}%)", s.ratio, s.diff_pct);
    println!("50/50 mix:      {:.4}", s.mix);
    println!("{}", report.signal.message(a, b, s.ratio));
    println!("logged to {}", report.log_path.display());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, gracefully stopping");
}
