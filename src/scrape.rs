use crate::{
    error::ScrapeError,
    fetch::Fetcher,
    lb::{extract_detail, Coin, CoinDetail, ListingWalker},
};
use scraper::Html;
use tracing::{info, warn};

/// The persistence boundary: lookup by external id decides dedup before a
/// detail page is ever fetched, insert receives records in listing order.
#[async_trait::async_trait]
pub trait CoinStore: Send + Sync {
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<Coin>, ScrapeError>;
    async fn insert(&self, coin: &Coin) -> Result<(), ScrapeError>;
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ItemFailure {
    pub name: String,
    pub reason: String,
}

/// What one run reports back: discovered / created / skipped counters plus
/// a warning per failed item. Item failures never abort the run.
#[derive(Debug, Default, serde::Serialize)]
pub struct RunSummary {
    pub discovered: u32,
    pub created: u32,
    pub skipped: u32,
    pub failures: Vec<ItemFailure>,
}

/// Fetch one detail page and extract its attributes. Extraction itself
/// never fails; only the fetch can.
pub async fn scrape_detail<F: Fetcher + ?Sized>(
    fetcher: &F,
    url: &str,
) -> Result<CoinDetail, ScrapeError> {
    let html = fetcher.fetch(url).await?;
    let detail = {
        let doc = Html::parse_document(&html);
        extract_detail(&doc)
    };
    Ok(detail)
}

/// Walk the whole listing, scraping and storing each unknown coin.
///
/// The listing is drained completely before any detail page is touched, so
/// a listing-level fetch failure aborts the run with nothing stored. Items
/// already present in the store are skipped without touching their detail
/// page. A failed detail fetch is recorded and the run moves on; listing
/// fetch and store errors are terminal. `limit` bounds how many listing
/// entries are processed and is checked before every detail fetch.
pub async fn run_scrape<F, S>(
    fetcher: &F,
    store: &S,
    limit: Option<u32>,
) -> Result<RunSummary, ScrapeError>
where
    F: Fetcher + ?Sized,
    S: CoinStore,
{
    let listings = ListingWalker::new(fetcher).collect_all().await?;
    info!("Found {} coins in listings", listings.len());

    let mut summary = RunSummary::default();

    for listing in listings {
        if let Some(limit) = limit {
            if summary.discovered >= limit {
                break;
            }
        }
        summary.discovered += 1;

        if store.find_by_external_id(&listing.url).await?.is_some() {
            summary.skipped += 1;
            continue;
        }

        match scrape_detail(fetcher, &listing.url).await {
            Ok(detail) => {
                let coin = Coin::from_parts(listing, detail);
                store.insert(&coin).await?;
                summary.created += 1;
                info!("[{}] {}", summary.created, coin.name);
            }
            Err(e) => {
                warn!("Failed to scrape {}: {}", listing.name, e);
                summary.failures.push(ItemFailure {
                    name: listing.name,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(summary)
}

/// In-memory [`CoinStore`], for tests and dry runs.
#[derive(Default)]
pub struct MemoryStore {
    coins: std::sync::Mutex<Vec<Coin>>,
}

impl MemoryStore {
    pub fn into_coins(self) -> Vec<Coin> {
        self.coins.into_inner().unwrap()
    }
}

#[async_trait::async_trait]
impl CoinStore for MemoryStore {
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<Coin>, ScrapeError> {
        Ok(self
            .coins
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.external_id == external_id)
            .cloned())
    }

    async fn insert(&self, coin: &Coin) -> Result<(), ScrapeError> {
        self.coins.lock().unwrap().push(coin.clone());
        Ok(())
    }
}
