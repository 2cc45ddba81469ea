mod filters;
mod render;
mod theme;
mod watch;

use std::time::Duration;

use carfeed_client::{load_featured, load_listings, load_stats, FallbackPolicy, FeedClient};
use carfeed_core::{apply_filters, load_catalog, AppConfig, Catalog, FacetCounts};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::filters::FilterArgs;
use crate::theme::ThemeCommands;

#[derive(Debug, Parser)]
#[command(name = "carfeed")]
#[command(about = "Live feed of used-car deals")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Poll the deals service and print the feed whenever it changes
    Watch {
        #[command(flatten)]
        filter: FilterArgs,
        /// Poll interval in seconds (defaults to `CARFEED_POLL_INTERVAL_SECS`)
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Fetch the feed once and print the filtered listings
    Deals {
        #[command(flatten)]
        filter: FilterArgs,
        /// Print the filtered listings as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print summary statistics
    Stats,
    /// Print the featured deals panel
    Top,
    /// Print brand and region counts over the unfiltered feed
    Facets,
    /// Show or change the persisted colour theme
    Theme {
        #[command(subcommand)]
        command: ThemeCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = carfeed_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(?config, "carfeed: configuration loaded");

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Watch { filter, interval }) => {
            let catalog = configured_catalog(&config)?;
            let interval = Duration::from_secs(interval.unwrap_or(config.poll_interval_secs));
            watch::run_watch(&config, &catalog, filter.resolve(&catalog)?, interval).await?;
        }
        Some(Commands::Deals { filter, json }) => {
            let catalog = configured_catalog(&config)?;
            run_deals(&config, &filter, &catalog, json).await?;
        }
        Some(Commands::Stats) => run_stats(&config).await?,
        Some(Commands::Top) => run_top(&config).await?,
        Some(Commands::Facets) => {
            let catalog = configured_catalog(&config)?;
            run_facets(&config, &catalog).await?;
        }
        Some(Commands::Theme { command }) => theme::run_theme(&config, &command)?,
        None => println!("carfeed: no command given; try `carfeed watch` or `carfeed --help`"),
    }

    Ok(())
}

fn configured_catalog(config: &AppConfig) -> anyhow::Result<Catalog> {
    match &config.catalog_path {
        Some(path) => Ok(load_catalog(path)?),
        None => Ok(Catalog::default()),
    }
}

async fn run_deals(
    config: &AppConfig,
    filter: &FilterArgs,
    catalog: &Catalog,
    json: bool,
) -> anyhow::Result<()> {
    let filter = filter.resolve(catalog)?;
    let client = FeedClient::from_config(config)?;
    let resolved = load_listings(
        &client,
        FallbackPolicy::from(config.fallback),
        filter.remote_verdict().as_ref(),
    )
    .await;

    let visible = apply_filters(&resolved.data.deals, &filter);
    if json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    print!("{}", render::origin_banner(resolved.origin));
    if visible.is_empty() {
        let view = carfeed_core::project(false, &resolved.data.deals, &filter);
        print!("{}", render::render_view(&view, Utc::now()));
    } else {
        print!("{}", render::render_table(&visible, Utc::now()));
        println!(
            "{} of {} listings (server total {})",
            visible.len(),
            resolved.data.deals.len(),
            resolved.data.total
        );
    }
    Ok(())
}

async fn run_stats(config: &AppConfig) -> anyhow::Result<()> {
    let client = FeedClient::from_config(config)?;
    let resolved = load_stats(&client, FallbackPolicy::from(config.fallback)).await;
    print!("{}", render::origin_banner(resolved.origin));
    print!("{}", render::render_stats(&resolved.data));
    Ok(())
}

async fn run_top(config: &AppConfig) -> anyhow::Result<()> {
    let client = FeedClient::from_config(config)?;
    let resolved = load_featured(&client, FallbackPolicy::from(config.fallback)).await;
    print!("{}", render::origin_banner(resolved.origin));
    print!("{}", render::render_featured(&resolved.data));
    Ok(())
}

async fn run_facets(config: &AppConfig, catalog: &Catalog) -> anyhow::Result<()> {
    let client = FeedClient::from_config(config)?;
    let resolved = load_listings(&client, FallbackPolicy::from(config.fallback), None).await;
    let counts = FacetCounts::compute(&resolved.data.deals, &catalog.brands);
    print!("{}", render::origin_banner(resolved.origin));
    print!("{}", render::render_facets(&counts, catalog));
    Ok(())
}

#[cfg(test)]
mod tests;
