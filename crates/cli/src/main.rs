//! Pocket Shop CLI - browse the catalog and manage the cart.
//!
//! # Usage
//!
//! ```bash
//! # List phones under $500, cheapest first
//! shop catalog --query phone --max-price 500 --sort price-asc
//!
//! # Add two of product 3 and show the cart
//! shop cart add 3 --quantity 2
//! shop cart show
//!
//! # Add a product that is not in the catalog
//! shop cart add-json '{"id": "gift-wrap", "name": "Gift wrap", "price": 4}'
//!
//! # Show the markup rendered for each cart surface
//! shop cart show --html
//!
//! # Adjust, remove, empty
//! shop cart qty 3 -1
//! shop cart remove 3
//! shop cart clear
//! ```
//!
//! Configuration comes from the environment; see
//! `pocket_shop_storefront::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use pocket_shop_storefront::catalog::SortOrder;
use pocket_shop_storefront::config::StorefrontConfig;
use pocket_shop_storefront::error::AppError;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "shop")]
#[command(author, version, about = "Pocket Shop command-line storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search and list catalog products
    Catalog(CatalogArgs),
    /// Inspect and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(clap::Args)]
struct CatalogArgs {
    /// Free-text search terms
    #[arg(short, long)]
    query: Option<String>,

    /// Only products in this category
    #[arg(long)]
    category: Option<String>,

    /// Only products from this brand
    #[arg(long)]
    brand: Option<String>,

    /// Minimum display price
    #[arg(long)]
    min_price: Option<u64>,

    /// Maximum display price
    #[arg(long)]
    max_price: Option<u64>,

    /// Result order (`featured`, `price-asc`, `price-desc`, `name`)
    #[arg(long, default_value = "featured")]
    sort: SortOrder,
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart contents
    Show {
        /// Print the rendered markup of each cart surface instead
        #[arg(long)]
        html: bool,
    },
    /// Add a catalog product to the cart
    Add {
        /// Product ID
        id: String,

        /// Units to add
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: Option<u32>,
    },
    /// Add a product described by a JSON object, without a catalog lookup
    AddJson {
        /// Object with `id` and optional `name`, `price`, `image`, `quantity`
        json: String,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        id: String,
    },
    /// Change a product's quantity by a signed amount
    Qty {
        /// Product ID
        id: String,

        /// Amount to add; negative values decrease
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Empty the cart
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(with_sentry: bool) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pocket_shop_storefront=info,pocket_shop_cli=info".into());

    let sentry_layer =
        with_sentry.then(|| sentry_tracing::layer().event_filter(sentry_event_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_layer)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(false);
            fail(&AppError::from(e), None);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let sentry_guard = init_sentry(&config);
    init_tracing(sentry_guard.is_some());

    if let Err(e) = run(cli, &config).await {
        fail(&e, sentry_guard);
    }
}

/// Report `error`, flush Sentry, print the user-facing message, and exit.
#[allow(clippy::print_stderr)]
fn fail(error: &AppError, sentry_guard: Option<sentry::ClientInitGuard>) -> ! {
    error.report();
    drop(sentry_guard);
    eprintln!("{}", error.user_message());
    std::process::exit(1);
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), AppError> {
    match cli.command {
        Commands::Catalog(args) => commands::catalog::list(config, args.into()).await,
        Commands::Cart { action } => match action {
            CartAction::Show { html } => {
                commands::cart::show(config, html);
                Ok(())
            }
            CartAction::Add { id, quantity } => commands::cart::add(config, &id, quantity).await,
            CartAction::AddJson { json } => commands::cart::add_json(config, &json),
            CartAction::Remove { id } => commands::cart::remove(config, &id),
            CartAction::Qty { id, delta } => commands::cart::change_quantity(config, &id, delta),
            CartAction::Clear => {
                commands::cart::clear(config);
                Ok(())
            }
        },
    }
}

impl From<CatalogArgs> for pocket_shop_storefront::catalog::ProductQuery {
    fn from(args: CatalogArgs) -> Self {
        Self {
            text: args.query,
            category: args.category,
            brand: args.brand,
            min_price: args.min_price,
            max_price: args.max_price,
            sort: args.sort,
        }
    }
}
