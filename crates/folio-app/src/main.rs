//! Folio demo binary - composition root for the share dialogue.
//!
//! 1. Initialize tracing
//! 2. Load configuration from TOML and apply its log level
//! 3. Build the command bus and in-memory viewer collaborators
//! 4. Create the share dialogue and subscribe it to the bus
//! 5. Run the scripted steps, printing the dialogue view after each

mod cli;
mod script;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use folio_core::{CommandEnvelope, CommandKind, EventBus, FolioConfig};
use folio_dialogues::providers::{FocusLog, MemoryClipboard, MemoryViewer};
use folio_dialogues::{RequiredStatement, ShareCollaborators, ShareDialogue};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing_subscriber::{prelude::*, reload, EnvFilter};

use cli::CliArgs;
use script::{run_step, Step};

/// Log every command published on the bus.
async fn observe_bus(mut rx: broadcast::Receiver<CommandEnvelope>) {
    loop {
        match rx.recv().await {
            Ok(envelope) => tracing::info!(
                command = envelope.command.name(),
                published_at = %envelope.published_at.to_datetime(),
                "Bus command"
            ),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Bus observer lagged, commands dropped")
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn build_viewer(args: &CliArgs) -> Arc<MemoryViewer> {
    let viewer = Arc::new(MemoryViewer::new());
    viewer.set_share_url(args.share_url.clone());
    viewer.set_manifest_url(args.manifest_url.clone());
    viewer.set_embed_base_url(args.embed_url.clone());
    viewer.set_required_statement(args.required_statement.clone().map(RequiredStatement::new));
    viewer
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Tracing. RUST_LOG wins outright; otherwise start at the CLI level and
    // switch to the config level once the config is loaded.
    let env_filter = EnvFilter::try_from_default_env().ok();
    let filter_from_env = env_filter.is_some();
    let initial_filter =
        env_filter.unwrap_or_else(|| EnvFilter::new(args.resolve_log_level("info")));
    let (filter, filter_handle) = reload::Layer::new(initial_filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Folio v{}", env!("CARGO_PKG_VERSION"));

    let config_file = args.resolve_config_path();
    let config = FolioConfig::load_or_default(&config_file);
    if !filter_from_env {
        let level = args.resolve_log_level(&config.general.log_level);
        filter_handle.reload(EnvFilter::new(&level))?;
        tracing::debug!(level = %level, "Log level applied");
    }

    let steps = args
        .steps
        .iter()
        .map(|s| s.parse::<Step>())
        .collect::<Result<Vec<_>, _>>()?;

    // Bus and collaborators.
    let bus = EventBus::new();
    tokio::spawn(observe_bus(bus.watch()));
    bus.subscribe(CommandKind::ShowTermsOfUse, |_| {
        tracing::info!("Shell would now display the terms of use");
    });

    let focus = Arc::new(FocusLog::new());
    let clipboard = Arc::new(MemoryClipboard::new());
    let collaborators =
        ShareCollaborators::from_memory(build_viewer(&args), clipboard.clone(), focus.clone());
    let share = ShareDialogue::create(&bus, collaborators, &config)?;

    // Give deferred focus shifts time to land before reporting.
    let settle = Duration::from_millis(config.embed_size.focus_delay_ms + 10);

    for step in &steps {
        let report = run_step(step, &bus, &share);
        if *step == Step::Embed {
            tokio::time::sleep(settle).await;
        }
        println!("{}", serde_json::to_string_pretty(&report)?);
        if let Some(focused) = focus.last() {
            tracing::info!(element = %focused, "Focused element");
        }
    }

    if let Some(copied) = clipboard.last() {
        tracing::info!(text = %copied, "Clipboard contents");
    }

    // Let the observer drain before exit.
    tokio::task::yield_now().await;
    Ok(())
}
