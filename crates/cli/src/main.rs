//! Cart upsells CLI - render the widget against a live storefront.
//!
//! # Usage
//!
//! ```bash
//! # Render the upsells for a saved cart page
//! upsells render --page cart.html
//!
//! # Override the host element's attributes
//! upsells render --page cart.html --item-id 123 --endpoint /recommendations/products
//!
//! # Print a JSON summary instead of the markup
//! upsells render --page cart.html --json
//!
//! # Print the request key for a set of parameters
//! upsells key --item-id 123 --endpoint /recommendations/products
//! upsells key --item-id 123 --endpoint /recommendations/products --intent related
//! ```
//!
//! # Commands
//!
//! - `render` - Activate the widget and print the carousel (exits 1 when hidden)
//! - `key` - Print the cache key / request URL

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use cart_upsells::UpsellConfig;
use cart_upsells_core::RecommendationIntent;
use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "upsells")]
#[command(author, version, about = "Cart upsells CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the upsells carousel for a cart page
    Render {
        /// Cart page markup containing a `<cart-upsells>` element
        #[arg(short, long)]
        page: PathBuf,

        /// Anchor item (overrides `data-product-id`)
        #[arg(short, long)]
        item_id: Option<String>,

        /// Recommendations endpoint (overrides `data-url`)
        #[arg(short, long)]
        endpoint: Option<String>,

        /// Maximum number of products (overrides `data-max-products`)
        #[arg(short, long)]
        max_products: Option<usize>,

        /// Section key (overrides `data-section-key`)
        #[arg(short, long)]
        section: Option<String>,

        /// Print a JSON summary instead of the markup
        #[arg(long)]
        json: bool,
    },
    /// Print the request key for a set of parameters
    Key {
        /// Anchor item
        #[arg(short, long)]
        item_id: String,

        /// Recommendations endpoint
        #[arg(short, long)]
        endpoint: String,

        /// Section key
        #[arg(short, long)]
        section: Option<String>,

        /// Recommendation intent (`complementary` or `related`)
        #[arg(long, default_value_t = RecommendationIntent::Complementary)]
        intent: RecommendationIntent,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &UpsellConfig) -> Option<sentry::ClientInitGuard> {
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

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration is needed before tracing for Sentry init
    let config = UpsellConfig::from_env();
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cart_upsells=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if sentry_guard.is_some() {
        tracing::info!("Sentry initialized");
    }

    let result = match config {
        Ok(config) => run(cli, &config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        // Flush pending Sentry events before exiting
        drop(sentry_guard);
        std::process::exit(1);
    }
}

#[allow(clippy::print_stdout)]
async fn run(cli: Cli, config: &UpsellConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Render {
            page,
            item_id,
            endpoint,
            max_products,
            section,
            json,
        } => {
            let overrides = commands::render::Overrides {
                item_id,
                endpoint_url: endpoint,
                max_products,
                section_key: section,
            };
            commands::render::render(config, &page, overrides, json).await?;
        }
        Commands::Key {
            item_id,
            endpoint,
            section,
            intent,
        } => {
            println!(
                "{}",
                commands::key::request_key(&item_id, &endpoint, section, intent)
            );
        }
    }
    Ok(())
}
