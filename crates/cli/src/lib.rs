//! Command-line host for the warehouse aggregate.
//!
//! Replays a JSON history, executes JSON commands in order and publishes the
//! accepted events as JSON lines. Logs go to stderr so stdout carries only
//! events.

pub mod config;
pub mod error;
pub mod sink;

use std::path::Path;

use domain::{Warehouse, WarehouseCommand, WarehouseEvent};
use event_sink::{EventSink, Version};
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub use config::{Config, LogFormat};
pub use error::CliError;
pub use sink::JsonLinesSink;

/// Installs the global tracing subscriber.
///
/// Does nothing if a subscriber is already installed.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.log_format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Reads and parses a JSON file.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub accepted: usize,
    pub rejected: usize,
    pub final_version: Version,
}

/// Executes commands in order.
///
/// Rejected commands are logged and counted. Any other failure ends the run.
pub async fn run_commands<S: EventSink>(
    warehouse: &mut Warehouse<S>,
    commands: Vec<WarehouseCommand>,
) -> Result<RunSummary, CliError> {
    let mut accepted = 0;
    let mut rejected = 0;

    for (index, command) in commands.into_iter().enumerate() {
        match warehouse.execute(command).await {
            Ok(_) => accepted += 1,
            Err(error) if error.kind().is_rejection() => {
                rejected += 1;
                tracing::warn!(index, kind = %error.kind(), %error, "skipping rejected command");
            }
            Err(error) => return Err(error.into()),
        }
    }

    Ok(RunSummary {
        accepted,
        rejected,
        final_version: warehouse.version(),
    })
}

/// Replays the history file, executes the commands file and publishes the
/// accepted events to `sink`.
pub async fn run<S: EventSink>(
    config: &Config,
    history_path: &Path,
    commands_path: &Path,
    sink: S,
) -> Result<RunSummary, CliError> {
    let history: Vec<WarehouseEvent> = load_json(history_path).await?;
    let commands: Vec<WarehouseCommand> = load_json(commands_path).await?;

    let mut warehouse = Warehouse::with_roles(sink, config.roles.clone(), history)?;
    tracing::info!(
        version = %warehouse.version(),
        commands = commands.len(),
        "history replayed"
    );

    let summary = run_commands(&mut warehouse, commands).await?;
    tracing::info!(
        accepted = summary.accepted,
        rejected = summary.rejected,
        version = %summary.final_version,
        "run complete"
    );
    Ok(summary)
}
