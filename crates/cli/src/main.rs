//! DABOT CLI - store search and brand catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # List every store from the configured backend
//! dabot-cli stores list
//!
//! # Search stores
//! dabot-cli stores search --area 関西 --brand POLAR --sort year-desc
//!
//! # Show a brand (case-insensitive)
//! dabot-cli brands show ftc
//!
//! # Check store records for brands missing from the catalog
//! dabot-cli audit --file stores.yaml
//! ```
//!
//! # Commands
//!
//! - `stores` - List and search store records
//! - `brands` - List and show catalog brands
//! - `audit` - Report brand references with no catalog entry
//!
//! The store backend is selected with the same environment variables as the
//! directory site (`DABOT_DATA_SOURCE`, ...).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "dabot-cli")]
#[command(author, version, about = "DABOT directory CLI tools")]
struct Cli {
    /// Print JSON instead of a plain listing
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List and search store records
    Stores {
        #[command(subcommand)]
        action: StoresAction,
    },
    /// List and show catalog brands
    Brands {
        #[command(subcommand)]
        action: BrandsAction,
    },
    /// Report store brand references that are not exact catalog names
    Audit {
        /// Store records to check (`.yaml`, `.yml` or `.json`); defaults to
        /// the configured backend
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum StoresAction {
    /// List every store
    List,
    /// Search stores
    Search {
        /// Case-insensitive substring matched against names, location and description
        #[arg(short, long)]
        keyword: Option<String>,

        /// Area, or `all`
        #[arg(short, long)]
        area: Option<String>,

        /// Prefecture
        #[arg(short, long)]
        prefecture: Option<String>,

        /// Brand carried by the store (repeatable, any match)
        #[arg(short, long = "brand")]
        brands: Vec<String>,

        /// Sort order (`name-asc`, `name-desc`, `area`, `brands-desc`, `year-desc`)
        #[arg(short, long, default_value = "name-asc")]
        sort: String,
    },
}

#[derive(Subcommand)]
enum BrandsAction {
    /// List catalog brands
    List,
    /// Show one brand
    Show {
        /// Brand identifier or name
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dabot_cli=info,dabot_storefront=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let output = commands::Output::new(cli.json);
    match cli.command {
        Commands::Stores { action } => match action {
            StoresAction::List => commands::stores::list(output).await?,
            StoresAction::Search {
                keyword,
                area,
                prefecture,
                brands,
                sort,
            } => {
                let query = dabot_core::StoreQuery {
                    keyword,
                    area,
                    prefecture,
                    brands,
                    sort: dabot_core::StoreSort::parse(&sort),
                };
                commands::stores::search(output, &query).await?;
            }
        },
        Commands::Brands { action } => match action {
            BrandsAction::List => commands::brands::list(output)?,
            BrandsAction::Show { id } => commands::brands::show(output, &id)?,
        },
        Commands::Audit { file } => commands::audit::run(output, file.as_deref()).await?,
    }
    Ok(())
}
