pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

use crate::api::ApiClient;

#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Portal CLI - drive the backend admin API from the command line")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Backend API base URL (defaults to config)")]
    pub server: Option<String>,

    #[arg(
        long,
        global = true,
        help = "Access token for authenticated calls (or PORTAL_ACCESS_TOKEN)"
    )]
    pub token: Option<String>,

    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authentication and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Admin operations: users, files, settings, dashboard")]
    Admin {
        #[command(subcommand)]
        cmd: commands::admin::AdminCommands,
    },
}

#[derive(Debug, Clone)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    let server = cli
        .server
        .clone()
        .unwrap_or_else(|| crate::config::config().backend.base_url.clone());
    let token = cli
        .token
        .clone()
        .or_else(|| std::env::var("PORTAL_ACCESS_TOKEN").ok());

    let client = ApiClient::new(&server)?;
    client.set_access_token(token);

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &client, &output_format).await,
        Commands::Admin { cmd } => commands::admin::handle(cmd, &client, &output_format).await,
    }
}
