//! Bond client - binary host for one language client session.
//!
//! ```text
//! main() -> BondConfig::load() -> ClientSession::start() -> run() -> stop()
//!                                        ^
//!                                        |
//!                                 Ctrl-C -> StopHandle::stop()
//! ```
//!
//! Logs go to `~/.bond/logs/bond-client.log`; user-facing notices go to
//! stderr.

use anyhow::Result;
use std::{
    env,
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
    sync::Mutex,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use bond_config::BondConfig;
use bond_lsp::{ClientSession, Notifier, StdioConnector};

const LOG_FILE_NAME: &str = "bond-client.log";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
    for warning in init_warnings {
        tracing::warn!("{warning}");
    }
}

fn open_log_file() -> (Option<(PathBuf, File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates(BondConfig::path()) {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates(config_path: Option<PathBuf>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: next to the config file, ~/.bond/logs/bond-client.log
    if let Some(config_path) = config_path
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join(LOG_FILE_NAME));
    }

    // Fallback: ./.bond/logs/bond-client.log
    let fallback = PathBuf::from(".bond").join("logs").join(LOG_FILE_NAME);
    if !candidates.contains(&fallback) {
        candidates.push(fallback);
    }

    candidates
}

/// Shows session notices on stderr.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify_error(&self, message: &str) {
        tracing::error!("{message}");
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "error: {message}");
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();

    let config = BondConfig::load().unwrap_or_default();
    let settings = config.backend_settings();
    let workspace_root = env::current_dir()?;
    tracing::debug!(root = %workspace_root.display(), "Workspace root");

    let mut session = ClientSession::new(
        settings,
        StdioConnector::new(workspace_root),
        StderrNotifier,
    );

    let stop = session.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping");
            stop.stop();
        }
    });

    if let Err(e) = session.start().await {
        // Already shown to the user by the notifier.
        tracing::debug!("Session did not start: {e}");
        return Ok(ExitCode::FAILURE);
    }
    session.run().await;
    session.stop().await;

    tracing::info!(state = %session.state(), "Language client exited");
    Ok(ExitCode::SUCCESS)
}
