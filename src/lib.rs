pub mod error;
pub mod fetch;
pub mod lb;
pub mod parse;
pub mod persistent;
pub mod scrape;

pub use error::ScrapeError;
pub use fetch::{Fetcher, HttpFetcher};
pub use lb::{Coin, CoinDetail, CoinListing, ListingWalker};
pub use scrape::{run_scrape, CoinStore, ItemFailure, MemoryStore, RunSummary};
