use thiserror::Error;

/// Failures that end a scrape run early
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("listing page unavailable: {0}")]
    ListingUnavailable(String),

    #[error(
        "the numbers of titles, urls and timestamps don't match \
         (titles: {titles}, urls: {urls}, timestamps: {timestamps})"
    )]
    StructuralMismatch {
        titles: usize,
        urls: usize,
        timestamps: usize,
    },

    #[error("invalid selector: {0}")]
    Selector(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}
