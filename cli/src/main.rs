//! SlotDesk CLI
//!
//! Command-line interface for the SlotDesk console. Every customers command
//! goes through the plan-tier gate.
//!
//! # Usage
//!
//! ```bash
//! slotdesk customers list --page 2
//! slotdesk customers get c_123
//! slotdesk customers search "smith"
//! slotdesk customers export --out ./exports
//! slotdesk plan show --format json
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "slotdesk")]
#[command(author = "SlotDesk")]
#[command(version)]
#[command(about = "SlotDesk Command Line Interface", long_about = None)]
struct Cli {
    /// API endpoint URL
    #[arg(long, env = "SLOTDESK_API_URL")]
    api_url: Option<String>,

    /// API key for authentication
    #[arg(long, env = "SLOTDESK_API_KEY")]
    api_key: Option<String>,

    /// Tenant ID
    #[arg(long, env = "SLOTDESK_TENANT_ID")]
    tenant_id: Option<String>,

    /// Output format
    #[arg(long, short)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and export customers
    Customers {
        #[command(subcommand)]
        action: CustomerCommands,
    },
    /// Inspect the tenant's plan
    Plan {
        #[command(subcommand)]
        action: PlanCommands,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum CustomerCommands {
    /// List customers, one page at a time
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },
    /// Get customer details
    Get { id: String },
    /// Search customers
    Search { query: String },
    /// Export accessible customers to CSV
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum PlanCommands {
    /// Show the customers limit and usage
    Show,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let profile = cli.profile.as_deref();

    if let Commands::Config { action } = cli.command {
        return commands::config::handle(action, profile).await;
    }

    let config = config::Config::load(profile)?;
    let format = cli
        .format
        .or_else(|| output::OutputFormat::from_config(config.default_format.as_deref()))
        .unwrap_or(output::OutputFormat::Table);
    let api_url = cli
        .api_url
        .or(config.api_url)
        .unwrap_or_else(|| slotdesk_client::DEFAULT_BASE_URL.to_string());
    let api_key = cli.api_key.or(config.api_key);
    let tenant_id = cli.tenant_id.or(config.tenant_id);

    let session = commands::Session::new(&api_url, api_key.as_deref(), tenant_id.as_deref(), config.gate)?;

    match cli.command {
        Commands::Customers { action } => commands::customers::handle(action, &session, format).await,
        Commands::Plan { action } => commands::plan::handle(action, &session, format).await,
        Commands::Config { .. } => Ok(()),
    }
}
