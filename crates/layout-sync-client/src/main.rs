//! layout-sync: command-line front end for saved grid layouts.
//!
//! Signs in to an account on the remote store, applies one layout operation
//! and waits for the save queue to drain before exiting.
//!
//! # Usage
//!
//! ```text
//! layout-sync [OPTIONS] <COMMAND>
//!
//! Commands:
//!   list                       List layouts of the account
//!   export [--ids a,b] [--out FILE]
//!   import <FILE>
//!   set-default <ID>
//!   delete <ID>
//!   repair                     Decode string states, backfill revisions
//!   register --first-name <N> [--last-name <L>]
//!   init-config [--force]      Write the effective config file
//!
//! Options:
//!   --config <PATH>    Config file [default: platform config dir]
//!   --account <ID>     Sign in by account id
//!   --name <NAME>      Sign in by first name
//!   --offline          Use an in-process store instead of the remote one
//! ```
//!
//! `RUST_LOG` overrides the configured log level.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use layout_sync_core::Notifier;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use layout_sync_client::application::account_store::AccountStore;
use layout_sync_client::application::manage_account::Registration;
use layout_sync_client::infrastructure::notify::TracingNotifier;
use layout_sync_client::infrastructure::remote::{HttpAccountStore, InMemoryAccountStore};
use layout_sync_client::infrastructure::storage::config::{
    config_file_path, load_config, load_config_from, save_config_to, ClientConfig,
};
use layout_sync_client::LayoutSync;

// ── CLI argument definitions ──────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name = "layout-sync",
    about = "Manage saved data-grid layouts stored in a remote account",
    version
)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, env = "LAYOUT_SYNC_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Sign in with this account id.
    #[arg(long, env = "LAYOUT_SYNC_ACCOUNT", global = true, conflicts_with = "name")]
    account: Option<String>,

    /// Sign in with the first account whose first name matches.
    #[arg(long, global = true)]
    name: Option<String>,

    /// Keep everything in memory; nothing reaches the remote store.
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a new account seeded with the default layout.
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: Option<String>,
    },
    /// Write the effective configuration (defaults filled in) to the config
    /// file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    #[command(flatten)]
    Layout(LayoutCommand),
}

/// Commands that operate on the signed-in account.
#[derive(Debug, Subcommand)]
enum LayoutCommand {
    /// List layouts of the account.
    List,
    /// Write layouts as an export envelope.
    Export {
        /// Only export these layout ids.
        #[arg(long, value_delimiter = ',')]
        ids: Option<Vec<String>>,
        /// Write to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Merge layouts from an export envelope.
    Import { file: PathBuf },
    /// Make a layout the default.
    SetDefault { id: String },
    /// Delete a layout and write the account immediately.
    Delete { id: String },
    /// Decode string-encoded states and backfill missing revisions.
    Repair,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .context("failed to load configuration")?;

    // `RUST_LOG` wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.log_level)),
        )
        .init();
    debug!(?config, "configuration loaded");

    if let Command::InitConfig { force } = cli.command {
        let path = match cli.config {
            Some(path) => path,
            None => config_file_path().context("failed to resolve config path")?,
        };
        if path.exists() && !force {
            bail!("{} already exists; pass --force to overwrite", path.display());
        }
        save_config_to(&config, &path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("{}", path.display());
        return Ok(());
    }

    let client = build_client(&config, cli.offline)?;

    match cli.command {
        Command::Register {
            first_name,
            last_name,
        } => {
            let account = client.accounts.register(Registration {
                first_name,
                last_name,
                ..Default::default()
            });
            println!("{}", account.id);
        }
        Command::Layout(command) => {
            sign_in(&client, cli.account.as_deref(), cli.name.as_deref()).await?;
            run_layout_command(&client, command).await?;
        }
        Command::InitConfig { .. } => {}
    }

    client.saves.wait_idle().await;
    info!("done");
    Ok(())
}

fn build_client(config: &ClientConfig, offline: bool) -> anyhow::Result<LayoutSync> {
    let store: Arc<dyn AccountStore> = if offline {
        Arc::new(InMemoryAccountStore::new())
    } else {
        Arc::new(
            HttpAccountStore::new(&config.remote.base_url, config.remote.request_timeout())
                .context("failed to create HTTP client")?,
        )
    };
    let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);
    Ok(LayoutSync::new(store, notifier, config.save.min_interval()))
}

async fn sign_in(
    client: &LayoutSync,
    account: Option<&str>,
    name: Option<&str>,
) -> anyhow::Result<()> {
    match (account, name) {
        (Some(id), _) => client.accounts.sign_in(id).await.context("sign-in failed"),
        (None, Some(name)) => client
            .accounts
            .sign_in_by_name(name)
            .await
            .context("sign-in failed"),
        (None, None) => bail!("--account or --name is required for this command"),
    }
}

async fn run_layout_command(client: &LayoutSync, command: LayoutCommand) -> anyhow::Result<()> {
    let layouts = &client.layouts;
    match command {
        LayoutCommand::List => {
            for layout in layouts.layouts() {
                let marker = if layout.is_default { '*' } else { ' ' };
                println!(
                    "{marker} {}\t{}\trev {}",
                    layout.id,
                    layout.name,
                    layout.revision()
                );
            }
        }
        LayoutCommand::Export { ids, out } => {
            let json = layouts.export_layouts(ids.as_deref())?;
            match out {
                Some(path) => std::fs::write(&path, json)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => println!("{json}"),
            }
        }
        LayoutCommand::Import { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let report = layouts.import_layouts_from_json(&text)?;
            println!("imported {}, skipped {}", report.imported, report.skipped);
        }
        LayoutCommand::SetDefault { id } => layouts.set_default_layout(&id)?,
        LayoutCommand::Delete { id } => {
            let removed = layouts.delete_layout(&id).await?;
            println!("deleted {} ({})", removed.id, removed.name);
        }
        LayoutCommand::Repair => {
            let backfilled = layouts.ensure_revisions();
            let decoded = layouts.repair_state_isolation().unwrap_or(0);
            println!("decoded {decoded} state(s), backfilled {backfilled} revision(s)");
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
