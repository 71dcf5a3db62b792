//! Operator CLI for the SRED showcase.
//!
//! `sred migrate` applies the schema (application tables plus the session
//! store's own table), `sred seed catalog` fills an empty product catalog
//! with the starter set, `sred seed admins` provisions the bootstrap
//! superadmin from `SEED_ADMIN_*` variables, and `sred admin create` adds
//! an account directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sred")]
#[command(author, version, about = "SRED showcase CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply database migrations
    Migrate,
    /// Seed database content
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert the starter product set when the catalog is empty
    Catalog,
    /// Create or refresh the bootstrap superadmin account
    Admins,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new account
    Create {
        /// Account username
        #[arg(short, long)]
        username: String,

        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Account role (`superadmin`, `admin`)
        #[arg(short, long, default_value = "admin")]
        role: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run(Cli::parse()).await {
        tracing::error!("command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Catalog => commands::seed::catalog().await?,
            SeedTarget::Admins => commands::seed::admins().await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Create {
                username,
                email,
                password,
                role,
            } => {
                commands::admin::create_user(&username, &email, &password, &role).await?;
            }
        },
    }
    Ok(())
}
