#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("database error")]
    Database(#[from] sqlx::error::Error),
}
