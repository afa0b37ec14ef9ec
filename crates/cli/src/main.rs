//! Roster CLI - manage user records from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the user table
//! roster users list
//!
//! # Add a user (unspecified fields take the placeholder values)
//! roster users add --first-name Ada --last-name Lovelace --age 36
//!
//! # Edit fields of an existing user
//! roster users edit 2 --email jane@example.org
//!
//! # Delete a user, skipping the confirmation prompt
//! roster users delete 2 --yes
//! ```
//!
//! Every mutation re-fetches and prints the table.
//!
//! # Environment Variables
//!
//! - `ROSTER_API_URL` - Base URL of the admin server (default: <http://127.0.0.1:3001>)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io;
use std::time::Duration;

use clap::{Parser, Subcommand};
use roster_admin::client::UsersClient;
use roster_core::UserId;

mod commands;

use commands::users::{self, FieldArgs, UsersError};

#[derive(Parser)]
#[command(name = "roster")]
#[command(author, version, about = "Roster user record tools")]
struct Cli {
    /// Base URL of the admin server
    #[arg(
        long,
        global = true,
        env = "ROSTER_API_URL",
        default_value = "http://127.0.0.1:3001"
    )]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 10)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage user records
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
}

#[derive(Subcommand)]
enum UsersAction {
    /// Print the user table
    List,
    /// Create a user
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Replace fields of an existing user
    Edit {
        /// Id of the user to edit
        id: String,

        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a user
    Delete {
        /// Id of the user to delete
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so the table on stdout stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "roster_cli=info,roster_admin=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), UsersError> {
    let client = UsersClient::from_base(&cli.api_url, Duration::from_secs(cli.timeout_secs))?;
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Users { action } => match action {
            UsersAction::List => users::list(&client, &mut out).await?,
            UsersAction::Add { fields } => {
                users::add(&client, &fields, &mut out).await?;
            }
            UsersAction::Edit { id, fields } => {
                users::edit(&client, &UserId::new(id), &fields, &mut out).await?;
            }
            UsersAction::Delete { id, yes } => {
                let mut input = io::stdin().lock();
                users::delete(&client, &UserId::new(id), yes, &mut input, &mut out).await?;
            }
        },
    }
    Ok(())
}
