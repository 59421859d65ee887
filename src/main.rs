use clap::Parser;

mod args;
use args::{Args, build_config};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            return;
        }
    };

    ::log::info!(
        "Scraping {} into {}",
        config.listing_url,
        config.storage_dir.display()
    );

    // Failures are reported, not turned into an exit code
    match outage_scrape::run(&config).await {
        Ok(report) => {
            ::log::info!("Indexed {} notices", report.records.len());
            if !report.persisted.failed.is_empty() {
                ::log::warn!(
                    "Could not download: {}",
                    report.persisted.failed.join(", ")
                );
            }
            if !report.persisted.unnamed.is_empty() {
                ::log::warn!(
                    "No filename in: {}",
                    report.persisted.unnamed.join(", ")
                );
            }
        }
        Err(e) => ::log::error!("Scrape aborted: {}", e),
    }
}
