// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `showctl`: drive the jukebox settings panel from the command line.
//! Loads a show snapshot, runs one edit through the save workflow, prints the
//! resulting toast and writes the committed show back.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use showpanel_config_fs::FsConfigStore;
use showpanel_core::config::{ConfigService, PanelConfig, PANEL_CONFIG_KEY};
use showpanel_core::field::PanelField;
use showpanel_core::{JukeboxPanel, NotificationSink, PreferenceStore, SaveOutcome, Show, ToastMessage};
use showpanel_graphql::GraphQlGateway;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Show control panel: jukebox settings")]
struct Args {
    /// GraphQL endpoint (overrides config)
    #[arg(long)]
    endpoint: Option<String>,
    /// Bearer token (overrides config)
    #[arg(long)]
    token: Option<String>,
    /// Directory holding panel.json (defaults to the platform config dir)
    #[arg(long)]
    config_dir: Option<PathBuf>,
    /// Show snapshot JSON file to edit
    #[arg(long)]
    show: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Set the jukebox queue depth (0 = unlimited)
    SetDepth {
        /// Whole number
        value: String,
    },
    /// Set the jukebox sequence request limit (0 = any time)
    SetRequestLimit {
        /// Whole number
        value: String,
    },
    /// Turn "prevent multiple requests" on or off
    CheckIfRequested {
        /// true or false
        #[arg(action = ArgAction::Set)]
        enabled: bool,
    },
    /// Print the documentation link for a field
    Docs {
        #[arg(value_enum)]
        field: FieldArg,
    },
    /// Write the effective config to panel.json
    InitConfig,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FieldArg {
    JukeboxDepth,
    JukeboxRequestLimit,
    CheckIfRequested,
}

impl From<FieldArg> for PanelField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::JukeboxDepth => Self::JukeboxDepth,
            FieldArg::JukeboxRequestLimit => Self::JukeboxRequestLimit,
            FieldArg::CheckIfRequested => Self::CheckIfRequested,
        }
    }
}

/// Prints toasts to stdout.
struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn show_alert(&self, toast: Option<&ToastMessage>) {
        if let Some(toast) = toast {
            if let Err(err) = write_toast(&mut io::stdout().lock(), toast) {
                warn!(error = %err, message = %toast.message, "toast not printed");
            }
        }
    }
}

fn write_toast(out: &mut impl Write, toast: &ToastMessage) -> io::Result<()> {
    writeln!(out, "[{}] {}", toast.severity.as_str(), toast.message)?;
    out.flush()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(io::stderr)
        .init();

    let store = match &args.config_dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new(),
    }
    .context("open config dir")?;
    let base = store.base().to_path_buf();
    let configs = ConfigService::new(store);
    let mut config = configs.load_panel_config().context("load panel config")?;
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(token) = args.token {
        config.auth_token = Some(token);
    }

    let show_path = match &args.command {
        Command::Docs { field } => {
            let field = PanelField::from(*field);
            writeln!(io::stdout().lock(), "{}: {}", field.label(), field.docs_url())?;
            return Ok(());
        }
        Command::InitConfig => {
            configs
                .save(PANEL_CONFIG_KEY, &config)
                .context("save panel config")?;
            info!(path = %base.join("panel.json").display(), "config written");
            return Ok(());
        }
        _ => args
            .show
            .clone()
            .context("--show <FILE> is required for edits")?,
    };

    let show = read_show(&show_path)?;
    let outcome = run_edit(&config, show, &args.command, &show_path).await?;
    if !outcome.result.success {
        bail!("save failed");
    }
    Ok(())
}

async fn run_edit(
    config: &PanelConfig,
    show: Show,
    command: &Command,
    show_path: &Path,
) -> Result<SaveOutcome> {
    let store = PreferenceStore::new(show);
    let mut changes = store.subscribe();
    let gateway = GraphQlGateway::from_config(config)?;
    info!(endpoint = gateway.endpoint(), "using backend");
    let mut panel = JukeboxPanel::new(store.clone(), gateway, ConsoleSink, |visible: bool| {
        debug!(visible, "progress");
    })
    .with_commit_policy(config.commit_policy);

    let outcome = match command {
        Command::SetDepth { value } => {
            panel.edit_depth(value);
            panel.save_queue_fields().await?
        }
        Command::SetRequestLimit { value } => {
            panel.edit_request_limit(value);
            panel.save_queue_fields().await?
        }
        Command::CheckIfRequested { enabled } => panel.toggle_check_if_requested(*enabled).await,
        Command::Docs { .. } | Command::InitConfig => bail!("not an edit command"),
    };

    if changes.has_changed()? {
        write_show(show_path, &changes.borrow_and_update())?;
        info!(path = %show_path.display(), "show snapshot updated");
    }
    Ok(outcome)
}

fn read_show(path: &Path) -> Result<Show> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))
}

fn write_show(path: &Path, show: &Show) -> Result<()> {
    let data = serde_json::to_vec_pretty(show)?;
    fs::write(path, data).with_context(|| format!("write {}", path.display()))
}
