//! Orderain CLI - Cart, catalog, and checkout from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! orderain products list --search iphone --sort price --desc
//! orderain products show iphone-15
//!
//! # Manage the local cart
//! orderain cart add iphone-15 --variant 42 --quantity 2
//! orderain cart set 17 --variant 42 3
//! orderain cart show
//!
//! # Place a cash-on-delivery order
//! orderain checkout --first-name Ada --last-name Lovelace --email ada@example.com \
//!     --phone 123 --country 1 --state 10 --city 100 --address "1 Main St" --postal-code 54000
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and change the persisted cart
//! - `products` / `categories` - Browse the catalog
//! - `locations` - List shipping countries, states, and cities
//! - `checkout` - Place an order for the current cart
//!
//! Configuration is read from the environment (see `orderain_storefront::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use orderain_storefront::config::StorefrontConfig;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod commands;

use commands::cart::CartAction;
use commands::catalog::ProductsAction;
use commands::checkout::CheckoutArgs;
use commands::locations::LocationsAction;

#[derive(Parser)]
#[command(name = "orderain")]
#[command(author, version, about = "Orderain storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// List product categories
    Categories,
    /// List shipping destinations
    Locations {
        #[command(subcommand)]
        action: LocationsAction,
    },
    /// Place an order for the current cart
    Checkout(Box<CheckoutArgs>),
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "orderain_storefront=info,orderain_cli=info".into());

    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    if let Err(e) = run(cli, config).await {
        if let app::CliError::Storefront(inner) = &e
            && inner.is_internal()
        {
            sentry::capture_error(inner);
        }
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), app::CliError> {
    let app = app::App::new(config)?;

    match cli.command {
        Commands::Cart { action } => commands::cart::run(&app, action).await?,
        Commands::Products { action } => commands::catalog::products(&app, action).await?,
        Commands::Categories => commands::catalog::categories(&app).await,
        Commands::Locations { action } => commands::locations::run(&app, action).await,
        Commands::Checkout(args) => commands::checkout::run(app, *args).await?,
    }
    Ok(())
}
