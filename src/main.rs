use clap::Parser;
use lb_coin_catalog::persistent::Persistent;
use lb_coin_catalog::scrape::{run_scrape, MemoryStore, RunSummary};
use lb_coin_catalog::HttpFetcher;
use tokio::time::Duration;
use tracing::{info, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;

/// Scrape Lithuanian collector and commemorative coins from lb.lt.
#[derive(Parser)]
struct Args {
    /// Limit the number of coins to scrape (useful for testing)
    #[arg(short, long)]
    limit: Option<u32>,

    /// Sqlite database file
    #[arg(long, default_value = "coins.sqlite3")]
    db: String,

    /// Minimum interval between requests to the source site, in milliseconds
    #[arg(long, default_value_t = 200)]
    delay_ms: u64,

    /// Collect into memory and print instead of persisting
    #[arg(long)]
    dry_run: bool,

    /// Print the scraped catalog as json
    #[arg(long)]
    json: bool,
}

fn report(summary: &RunSummary) {
    for failure in &summary.failures {
        warn!("Failed to scrape {}: {}", failure.name, failure.reason);
    }
    info!(
        "Done! Discovered: {}, Created: {}, Skipped (already exist): {}",
        summary.discovered, summary.created, summary.skipped
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| {
                "info,html5ever=error,selectors=error,hyper=warn,reqwest=info,sqlx=warn".into()
            }),
        )
        .with(ErrorLayer::default())
        .init();

    let args = Args::parse();
    let fetcher = HttpFetcher::new(Duration::from_millis(args.delay_ms));

    if args.dry_run {
        let store = MemoryStore::default();
        let summary = run_scrape(&fetcher, &store, args.limit).await?;
        report(&summary);

        let coins = store.into_coins();
        if args.json {
            println!("{}", serde_json::to_string_pretty(&coins)?);
        } else {
            for coin in &coins {
                println!("{}", coin);
            }
        }
    } else {
        let store = Persistent::new(&args.db).await?;
        let summary = run_scrape(&fetcher, &store, args.limit).await?;
        report(&summary);
        info!("Catalog now holds {} coins", store.count().await?);

        if args.json {
            println!("{}", serde_json::to_string_pretty(&store.all().await?)?);
        }
    }

    Ok(())
}
