use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use history_ui::{HistoryPage, TableRow};
use notification_client::{NotificationClient, PageEvent, StreamOutcome};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod terminal;

use config::{load_settings, Settings};
use terminal::{TerminalHistoryView, TerminalNotificationView};

#[derive(Parser, Debug)]
struct Cli {
    /// Overrides `base_url` from console.toml / APP__BASE_URL.
    #[arg(long)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Follow the live notification feed.
    Watch {
        #[arg(long)]
        max_retries: Option<u32>,
        #[arg(long)]
        heartbeat_timeout_secs: Option<u64>,
    },
    /// Print the expense summary for a list of transaction rows.
    Summary {
        #[arg(long)]
        rows: PathBuf,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RowRecord {
    item_name: String,
    price: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }

    match cli.command {
        Command::Watch {
            max_retries,
            heartbeat_timeout_secs,
        } => {
            if let Some(v) = max_retries {
                settings.max_retries = v;
            }
            if let Some(v) = heartbeat_timeout_secs {
                settings.heartbeat_timeout_secs = v;
            }
            watch(settings).await
        }
        Command::Summary { rows, start, end } => summary(&rows, start, end),
    }
}

async fn watch(settings: Settings) -> Result<()> {
    info!(base_url = %settings.base_url, "watching notifications");
    loop {
        // Each pass is a fresh page load.
        let client = NotificationClient::new_with_settings(
            &settings.base_url,
            Arc::new(TerminalNotificationView),
            settings.client_settings(),
        );
        let mut events = client.subscribe_page_events();
        client.mount().await;

        loop {
            let event = tokio::select! {
                event = events.recv() => event,
                _ = tokio::signal::ctrl_c() => return Ok(()),
            };
            match event {
                Ok(PageEvent::StreamClosed(StreamOutcome::HeartbeatExpired)) => break,
                Ok(PageEvent::StreamClosed(StreamOutcome::MaxRetriesExceeded)) => bail!(
                    "notification stream closed after {} consecutive errors",
                    settings.max_retries
                ),
                Ok(PageEvent::UnreadChat(detail)) => println!("[chat] {detail}"),
                Ok(PageEvent::ConnectionStateChanged(state)) => {
                    info!(?state, "connection state changed")
                }
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "page events lagged"),
                Err(RecvError::Closed) => bail!("notification client shut down"),
            }
        }
    }
}

fn summary(path: &Path, start: Option<String>, end: Option<String>) -> Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read rows from '{}'", path.display()))?;
    let records: Vec<RowRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("'{}' is not a JSON array of rows", path.display()))?;
    let rows = records
        .into_iter()
        .map(|record| TableRow::transaction(record.item_name, record.price))
        .collect();

    let view = Arc::new(TerminalHistoryView::new(start, end, rows));
    let page = HistoryPage::mount(view, chrono::Local::now().date_naive())?;
    page.request_summary()?;
    Ok(())
}
