use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{ApiClient, DeleteOutcome, DisplayNode, PartyController};
use shared::{
    domain::PartyId,
    protocol::{DateEncoding, EnvelopeKey, PartyForm},
};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, Settings};

#[derive(Parser, Debug)]
#[command(name = "partyctl", about = "List, add and delete parties on an events API")]
struct Cli {
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// URL of a `{ "baseUrl", "headers" }` config document.
    #[arg(long, global = true)]
    config_url: Option<String>,
    #[arg(long, global = true)]
    config_file: Option<PathBuf>,
    /// One of `data`, `parties` or `none`.
    #[arg(long, global = true)]
    envelope: Option<EnvelopeKey>,
    /// One of `date` or `timestamp`.
    #[arg(long, global = true)]
    date_encoding: Option<DateEncoding>,
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List,
    Add {
        #[arg(long)]
        name: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// HH:MM
        #[arg(long, default_value = "")]
        time: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Delete {
        #[arg(required_unless_present = "index")]
        id: Option<PartyId>,
        /// Position in the printed list instead of an id.
        #[arg(long, conflicts_with = "id")]
        index: Option<usize>,
    },
}

impl Cli {
    fn apply(&self, settings: &mut Settings) {
        if let Some(v) = &self.base_url {
            settings.base_url = v.clone();
        }
        if let Some(v) = &self.config_url {
            settings.config_url = Some(v.clone());
        }
        if let Some(v) = &self.config_file {
            settings.config_file = Some(v.clone());
        }
        if let Some(v) = self.envelope {
            settings.envelope = v;
        }
        if let Some(v) = self.date_encoding {
            settings.date_encoding = v;
        }
        if let Some(v) = self.timeout_secs {
            settings.timeout_secs = v;
        }
    }
}

fn print_list(nodes: &[DisplayNode]) {
    for (index, node) in nodes.iter().enumerate() {
        if node.is_placeholder() {
            println!("{node}");
            continue;
        }
        println!("[{index}]");
        for line in node.to_string().lines() {
            println!("    {line}");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let mut settings = load_settings();
    cli.apply(&mut settings);

    let client = ApiClient::with_timeout(settings.config_provider(), settings.request_timeout());
    let mut controller = PartyController::new(Arc::new(client), settings.controller_options());

    controller
        .on_fetch_parties()
        .await
        .context("failed to fetch parties")?;

    match cli.command {
        Command::List => {}
        Command::Add {
            name,
            date,
            time,
            location,
            description,
        } => {
            let form = PartyForm {
                name,
                date,
                time,
                location,
                description,
            };
            controller
                .on_add_party(&form)
                .await
                .context("failed to add party")?;
        }
        Command::Delete { id, index } => {
            let outcome = match (id, index) {
                (Some(id), _) => controller.on_delete_party(&id).await,
                (None, Some(index)) => {
                    let Some(action) = controller.view().action_at(index) else {
                        bail!("no party at position {index}");
                    };
                    controller.dispatch(action).await
                }
                (None, None) => bail!("a party id or --index is required"),
            }
            .context("failed to delete party")?;
            if outcome == DeleteOutcome::AlreadyAbsent {
                println!("party was already deleted");
            }
        }
    }

    print_list(controller.view().nodes());
    Ok(())
}
