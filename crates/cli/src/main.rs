//! Lesson Shop CLI - browse lessons, fill a cart and place orders from the
//! terminal.
//!
//! # Usage
//!
//! ```bash
//! # List lessons, optionally searched and sorted
//! lesson-shop lessons --query math --sort price --desc
//!
//! # Place an order in one go
//! lesson-shop order --name "Jane Doe" --phone 5551234 --lesson 65a1:2 --lesson 65a2
//!
//! # Interactive session with live search and a cart
//! lesson-shop shop
//!
//! # Remember a different backend
//! lesson-shop config set-api-base http://localhost:3000
//! ```
//!
//! # Commands
//!
//! - `lessons` - Print the catalog
//! - `order` - Reserve lessons and submit an order
//! - `shop` - Interactive storefront
//! - `config` - Show or change stored preferences

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lesson_shop_storefront::{ConfigError, Result, ShopConfig, SortDirection, SortKey, SortOrder};

mod commands;
mod render;

use commands::order::LessonRequest;

#[derive(Parser)]
#[command(name = "lesson-shop")]
#[command(author, version, about = "Browse lessons and place orders")]
struct Cli {
    /// Lessons backend base URL (overrides `LESSON_SHOP_API_BASE` and the
    /// stored preference)
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the lesson catalog
    Lessons {
        /// Search text, matched by the backend
        #[arg(short, long)]
        query: Option<String>,

        /// Sort key (`subject`, `location`, `price`, `spaces`)
        #[arg(short, long, default_value = "subject")]
        sort: SortKey,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Reserve lessons and submit an order
    Order {
        /// Customer name (letters and spaces)
        #[arg(short, long)]
        name: String,

        /// Phone number (digits only)
        #[arg(short, long)]
        phone: String,

        /// Lesson to order as `ID` or `ID:QUANTITY`; repeatable
        #[arg(short, long = "lesson", required = true)]
        lessons: Vec<LessonRequest>,
    },
    /// Interactive storefront with live search and a cart
    Shop,
    /// Show or change stored preferences
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the resolved configuration
    Show,
    /// Store the backend base URL
    SetApiBase {
        /// Base URL, e.g. `http://localhost:3000`
        url: String,
    },
    /// Forget the stored backend base URL
    ClearApiBase,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ShopConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
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

/// Logs go to stderr so they never mix with command output.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lesson_shop=info,lesson_shop_storefront=info".into());
    let json = std::env::var("LESSON_SHOP_LOG_FORMAT").is_ok_and(|format| format == "json");

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Loaded before tracing so Sentry can be initialized first
    let config = ShopConfig::from_env(cli.api_base.as_deref());
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    init_tracing();

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            render::error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: std::result::Result<ShopConfig, ConfigError>) -> Result<()> {
    match cli.command {
        Commands::Lessons {
            query,
            sort,
            desc,
            json,
        } => {
            let direction = if desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            let order = SortOrder::new(sort, direction);
            commands::lessons::list(&config?, query.as_deref(), order, json).await?;
        }
        Commands::Order {
            name,
            phone,
            lessons,
        } => commands::order::place(&config?, &name, &phone, &lessons).await?,
        Commands::Shop => commands::shop::run(&config?).await?,
        // Works without a loaded config so a broken stored preference can be fixed
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(cli.api_base.as_deref()),
            ConfigAction::SetApiBase { url } => commands::config::set_api_base(&url)?,
            ConfigAction::ClearApiBase => commands::config::clear_api_base()?,
        },
    }
    Ok(())
}
