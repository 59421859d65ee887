pub mod config;
pub mod error;
pub mod fetch;
pub mod parsers;
pub mod records;
pub mod store;

// Re-export commonly used types for convenience
pub use config::{LinkOrder, ScrapeConfig};
pub use error::ScrapeError;
pub use records::OutageRecord;
pub use store::PersistReport;

use fetch::Fetcher;
use parsers::BlurbQueries;

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Records written to the index, in page order
    pub records: Vec<OutageRecord>,

    /// Per-file download results
    pub persisted: PersistReport,
}

/// Fetch the listing page, extract its notices, download new PDFs and rewrite the index.
///
/// Nothing is written to the storage directory when the listing can't be
/// fetched or its title/link/timestamp counts disagree.
pub async fn run(config: &ScrapeConfig) -> Result<RunReport, ScrapeError> {
    let queries = BlurbQueries::from_config(config)?;
    let fetcher = Fetcher::new(config)?;

    let response = fetcher
        .fetch(&config.listing_url)
        .await
        .ok_or_else(|| ScrapeError::ListingUnavailable(config.listing_url.clone()))?;
    // The document tree is not Send; keep it out of scope across later awaits
    let blurbs = {
        let doc = parsers::parse(&response);
        ::log::info!("Good response. All parsed and ready ....");
        parsers::extract(&doc, &queries, config.link_order)?
    };
    ::log::info!("{} URLs collected ....", blurbs.len());

    let records = records::build_records(blurbs);
    ::log::info!("Target objects created; starting the scrape ....");

    let persisted = store::persist(&fetcher, &records, config).await?;
    ::log::info!(
        "All done: {} downloaded, {} already stored, {} failed",
        persisted.downloaded.len(),
        persisted.skipped.len(),
        persisted.failed.len()
    );

    Ok(RunReport { records, persisted })
}
