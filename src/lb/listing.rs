use crate::{
    error::ScrapeError,
    fetch::Fetcher,
    lb::{CoinListing, BASE_URL, LIST_URL},
    parse::normalize_url,
};
use lazy_static::lazy_static;
use scraper::{Html, Selector};
use std::collections::VecDeque;
use tracing::debug;

const E: &str = "Invalid selector";
lazy_static! {
    static ref ITEM: Selector = Selector::parse(".item.coin_item").expect(E);
    static ref LINK: Selector = Selector::parse("a.full_window").expect(E);
    static ref THUMBNAIL: Selector = Selector::parse("img.coin_front").expect(E);
}

/// Walks the numbered listing pages, yielding entries lazily. The page
/// cursor is the only state; the walk ends on the first page with zero
/// coin items.
pub struct ListingWalker<'a, F: Fetcher + ?Sized> {
    fetcher: &'a F,
    page: u32,
    buffer: VecDeque<CoinListing>,
    done: bool,
}

impl<'a, F: Fetcher + ?Sized> ListingWalker<'a, F> {
    pub fn new(fetcher: &'a F) -> ListingWalker<'a, F> {
        ListingWalker {
            fetcher,
            page: 1,
            buffer: VecDeque::new(),
            done: false,
        }
    }

    /// Next listing entry, fetching the next page only when the current
    /// one is drained. Listing fetch failures are terminal for the run.
    pub async fn next_entry(&mut self) -> Result<Option<CoinListing>, ScrapeError> {
        loop {
            if let Some(entry) = self.buffer.pop_front() {
                return Ok(Some(entry));
            }
            if self.done {
                return Ok(None);
            }

            let url = if self.page > 1 {
                format!("{}?page={}", LIST_URL, self.page)
            } else {
                LIST_URL.to_string()
            };

            let html = self.fetcher.fetch(&url).await?;
            let entries = {
                let doc = Html::parse_document(&html);
                parse_listing_page(&doc, BASE_URL)
            };

            debug!("Listing page {}: {} items", self.page, entries.len());

            if entries.is_empty() {
                self.done = true;
            } else {
                self.page += 1;
                self.buffer.extend(entries);
            }
        }
    }

    pub async fn collect_all(mut self) -> Result<Vec<CoinListing>, ScrapeError> {
        let mut entries = vec![];
        while let Some(entry) = self.next_entry().await? {
            entries.push(entry);
        }
        Ok(entries)
    }
}

/// Extract the coin entries of one listing page. Items without a detail
/// link, or whose name/href is empty, are decorative and skipped.
pub(crate) fn parse_listing_page(doc: &Html, base: &str) -> Vec<CoinListing> {
    let mut entries = vec![];

    for item in doc.select(&ITEM) {
        let Some(link) = item.select(&LINK).next() else {
            continue;
        };

        let name = item.value().attr("title").unwrap_or("").trim();
        let href = link.value().attr("href").unwrap_or("");
        if name.is_empty() || href.is_empty() {
            continue;
        }

        let image_url = item
            .select(&THUMBNAIL)
            .next()
            .and_then(|img| img.value().attr("src"))
            .filter(|src| !src.is_empty())
            .map(|src| normalize_url(src, base));

        entries.push(CoinListing {
            name: name.to_string(),
            url: normalize_url(href, base),
            image_url,
        });
    }

    entries
}
