use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use pipegate_api::{CloudBackend, FixtureBackend};
use pipegate_util::{AppConfig, default_log_path};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Approve or reject pending pipeline approvals and start pipelines from the terminal.
#[derive(Debug, Parser)]
#[command(name = "pipegate", version, about)]
struct Cli {
    /// YAML fixture served by the demo backend (overrides the config file)
    #[arg(long, value_name = "PATH")]
    fixture: Option<PathBuf>,

    /// Config file to read instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Tracing filter, e.g. `debug` or `pipegate_engine=trace` (defaults to RUST_LOG, then `info`)
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_path = init_tracing(cli.log_level.as_deref())?;

    let config = match cli.config.as_deref() {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .context("load configuration")?;

    let backend = select_backend(cli.fixture.as_deref(), &config)?;
    info!(log = %log_path.display(), "starting pipegate");
    pipegate_tui::run(backend, config).await
}

/// Install a file-backed subscriber; stdout belongs to the TUI.
fn init_tracing(level: Option<&str>) -> Result<PathBuf> {
    let log_path = default_log_path();
    if let Some(parent) = log_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("open log file {}", log_path.display()))?;

    let filter = match level {
        Some(level) => EnvFilter::try_new(level).with_context(|| format!("invalid log filter '{level}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .try_init();
    Ok(log_path)
}

fn select_backend(flag: Option<&Path>, config: &AppConfig) -> Result<Arc<dyn CloudBackend>> {
    let fixture = flag.or(config.fixture_path.as_deref());
    let backend = match fixture {
        Some(path) => {
            info!(fixture = %path.display(), "using fixture backend");
            FixtureBackend::from_path(path)?
        }
        None => {
            info!("no fixture configured; using built-in sample data");
            FixtureBackend::sample()
        }
    };
    Ok(Arc::new(backend))
}
