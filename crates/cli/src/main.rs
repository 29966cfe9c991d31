//! Printfuse CLI - Database migrations and reference data.
//!
//! # Usage
//!
//! ```bash
//! # Run catalog database migrations
//! printfuse migrate
//!
//! # Seed the default product types (Food, Apparel, Electronics)
//! printfuse seed
//!
//! # Seed product types from a YAML file
//! printfuse seed --file types.yaml
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Create reference product types, skipping existing names

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "printfuse")]
#[command(author, version, about = "Printfuse CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run catalog database migrations
    Migrate,
    /// Create reference product types
    Seed {
        /// YAML list of `{name, supportsAddons}` entries (default: built-in set)
        #[arg(short, long)]
        file: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::catalog().await?,
        Commands::Seed { file } => commands::seed::product_types(file.as_deref()).await?,
    }
    Ok(())
}
