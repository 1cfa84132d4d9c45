mod render;
mod subcommands;


use crate::errors::AgriBidError;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agribid")]
#[command(about = "AgriBid marketplace client", version)]
pub struct Cli {
    /// Path to config.json (default: ~/.agribid/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List product listings
    Products {
        /// Only show products whose title, description or location contains this text
        #[arg(long, short = 's')]
        search: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show seller dashboard chart data (description counts per category)
    Dashboard {
        #[arg(long)]
        json: bool,
    },
    /// List user accounts (admin console)
    Users {
        /// Only admins
        #[arg(long)]
        admins: bool,
        /// Only active accounts
        #[arg(long)]
        active: bool,
    },
    /// Grant or revoke the admin role
    Admin {
        #[command(subcommand)]
        cmd: AdminCommands,
    },
    /// Show the latest message of each conversation about a product
    Messages {
        #[arg(long, short = 'p')]
        product: i64,
        #[arg(long)]
        json: bool,
    },
    /// Check once for unread notifications
    Unread,
    /// Poll for unread notifications until interrupted (Ctrl-C)
    Watch,
    /// Manage the stored session
    Session {
        #[command(subcommand)]
        cmd: SessionCommands,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Give a user the admin role
    Grant {
        #[arg(long)]
        id: i64,
    },
    /// Remove the admin role from a user
    Revoke {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// Store a bearer token and the profile it belongs to
    Set {
        #[arg(long)]
        token: String,
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        admin: bool,
    },
    /// Show who is signed in
    Show,
    /// Sign out and forget the stored token
    Clear,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write a default config.json
    Init {
        /// Overwrite an existing file
        #[arg(long, short = 'f')]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    dispatch(cli).await.map_err(with_hint)
}

async fn dispatch(cli: Cli) -> Result<(), AgriBidError> {
    let config_path = cli.config;
    let ctx = || subcommands::Context::load(config_path.as_deref());
    match cli.command {
        Commands::Products { search, json } => {
            subcommands::products(&ctx()?, search.as_deref(), json).await
        }
        Commands::Dashboard { json } => subcommands::dashboard(&ctx()?, json).await,
        Commands::Users { admins, active } => subcommands::users(&ctx()?, admins, active).await,
        Commands::Admin { cmd } => match cmd {
            AdminCommands::Grant { id } => subcommands::set_admin(&ctx()?, id, true).await,
            AdminCommands::Revoke { id } => subcommands::set_admin(&ctx()?, id, false).await,
        },
        Commands::Messages { product, json } => {
            subcommands::messages(&ctx()?, product, json).await
        }
        Commands::Unread => subcommands::unread(&ctx()?).await,
        Commands::Watch => subcommands::watch(ctx()?).await,
        Commands::Session { cmd } => match cmd {
            SessionCommands::Set {
                token,
                user_id,
                first_name,
                last_name,
                admin,
            } => subcommands::session_set(token, user_id, first_name, last_name, admin),
            SessionCommands::Show => subcommands::session_show(),
            SessionCommands::Clear => subcommands::session_clear(),
        },
        Commands::Config { cmd } => match cmd {
            ConfigCommands::Init { force } => {
                subcommands::config_init(config_path.as_deref(), force)
            }
            ConfigCommands::Show => subcommands::config_show(config_path.as_deref()),
        },
    }
}

/// Attach the next step the user should take to errors that need one.
fn with_hint(err: AgriBidError) -> anyhow::Error {
    match err {
        AgriBidError::MissingCredentials => anyhow::anyhow!(
            "{err}\nSign in with: agribid session set --token <TOKEN> --user-id <ID>"
        ),
        AgriBidError::Unauthorized => anyhow::anyhow!(
            "{err}: the server rejected the stored token\nSign in again with: agribid session set --token <TOKEN> --user-id <ID>"
        ),
        AgriBidError::Transport(_) => {
            anyhow::anyhow!("{err}\nCould not reach the AgriBid server; check api.baseUrl and your connection")
        }
        AgriBidError::Internal(e) => e,
        other => other.into(),
    }
}
