//! GoMarketplace CLI - Inspect and edit the cart stored on this device.
//!
//! # Usage
//!
//! ```bash
//! gm-cli list
//! gm-cli add --id p1 --title "Pineapple" --image-url https://img/p1.png --price 10
//! gm-cli increment p1
//! gm-cli decrement p1
//!
//! # Use another storage directory
//! gm-cli --storage-dir /tmp/device list
//! ```
//!
//! Each invocation is one cart session: the stored cart is loaded, the
//! command is applied, and the session is shut down so the change is written
//! before the process exits. The resulting cart is printed to stdout; logs go
//! to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use go_marketplace_cart::{CartConfig, LogFormat};
use go_marketplace_core::{NewLineItem, Price};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::cart::{CartAction, CliError};

#[derive(Parser)]
#[command(name = "gm-cli")]
#[command(author, version, about = "GoMarketplace cart tools")]
struct Cli {
    /// Override the device storage directory
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart
    List,
    /// Add a product to the cart
    Add {
        /// Product ID
        #[arg(long)]
        id: String,

        /// Product title
        #[arg(long)]
        title: String,

        /// Product image URL
        #[arg(long)]
        image_url: String,

        /// Unit price (e.g. 19.99)
        #[arg(long)]
        price: Price,
    },
    /// Add one unit of a product already in the cart
    Increment {
        /// Product ID
        id: String,
    },
    /// Remove one unit of a product (never below one)
    Decrement {
        /// Product ID
        id: String,
    },
}

impl From<Commands> for CartAction {
    fn from(command: Commands) -> Self {
        match command {
            Commands::List => Self::List,
            Commands::Add {
                id,
                title,
                image_url,
                price,
            } => Self::Add(NewLineItem::new(id, title, image_url, price)),
            Commands::Increment { id } => Self::Increment(id),
            Commands::Decrement { id } => Self::Decrement(id),
        }
    }
}

/// Install the tracing subscriber, writing to stderr.
fn init_tracing(format: LogFormat) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "go_marketplace_cart=info,gm_cli=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = CartConfig::from_env();
    init_tracing(config.as_ref().map_or_else(|_| LogFormat::default(), |c| c.log_format));

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(CliError::from(e)),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

#[allow(clippy::print_stdout)]
async fn run(cli: Cli, mut config: CartConfig) -> Result<(), CliError> {
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = dir;
    }
    tracing::debug!(?config, "Loaded configuration");

    let cart = commands::cart::execute(&config, cli.command.into()).await?;
    print!("{}", commands::cart::render(&cart));
    Ok(())
}
