use clap::{Parser, ValueEnum};
use outage_scrape::{LinkOrder, ScrapeConfig, ScrapeError};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "outage-scrape")]
#[command(about = "Collects outage notice PDFs and their timestamps from a listing page")]
#[command(version)]
pub struct Args {
    /// Listing page URL (defaults to the configured or built-in listing)
    pub url: Option<String>,

    /// Directory for downloaded PDFs and the JSON index
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// How duplicate links are removed before pairing
    #[arg(long, value_enum)]
    pub link_order: Option<LinkOrderArg>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LinkOrderArg {
    FirstSeen,
    Unordered,
}

impl From<LinkOrderArg> for LinkOrder {
    fn from(arg: LinkOrderArg) -> Self {
        match arg {
            LinkOrderArg::FirstSeen => LinkOrder::FirstSeen,
            LinkOrderArg::Unordered => LinkOrder::Unordered,
        }
    }
}

/// Build the run configuration: defaults, then the config file, then flags
pub fn build_config(args: &Args) -> Result<ScrapeConfig, ScrapeError> {
    let mut config = match &args.config {
        Some(path) => ScrapeConfig::from_file(path)?,
        None => ScrapeConfig::default(),
    };

    if let Some(url) = &args.url {
        config.listing_url = url.clone();
    }
    if let Some(dir) = &args.dir {
        config.storage_dir = dir.clone();
    }
    if let Some(order) = args.link_order {
        config.link_order = order.into();
    }
    if let Some(secs) = args.timeout {
        config.request_timeout_secs = Some(secs);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "outage-scrape",
            "http://localhost:8080/outages",
            "--dir",
            "/tmp/outages",
            "--link-order",
            "unordered",
            "--timeout",
            "30",
        ]);
        let config = build_config(&args).unwrap();

        assert_eq!(config.listing_url, "http://localhost:8080/outages");
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/outages"));
        assert_eq!(config.link_order, LinkOrder::Unordered);
        assert_eq!(config.request_timeout_secs, Some(30));
    }

    #[test]
    fn test_no_flags_uses_defaults() {
        let args = Args::parse_from(["outage-scrape"]);
        let config = build_config(&args).unwrap();

        assert_eq!(config.listing_url, ScrapeConfig::default().listing_url);
        assert_eq!(config.link_order, LinkOrder::FirstSeen);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outages.json");
        std::fs::write(
            &path,
            r#"{"listing_url": "http://from-file/outages", "storage_dir": "from-file"}"#,
        )
        .unwrap();

        let args = Args::parse_from([
            "outage-scrape",
            "--config",
            path.to_str().unwrap(),
            "--dir",
            "from-flag",
        ]);
        let config = build_config(&args).unwrap();

        assert_eq!(config.listing_url, "http://from-file/outages");
        assert_eq!(config.storage_dir, PathBuf::from("from-flag"));
    }
}
