use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::ScrapeError;

/// How duplicate link targets are removed before pairing with titles and timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkOrder {
    /// Keep the first occurrence of each link, in document order
    #[default]
    FirstSeen,

    /// Collect links into a hash set and pair them in the set's iteration order.
    ///
    /// The pairing order is arbitrary, so a link can end up next to the wrong
    /// title and timestamp whenever there is more than one notice on the page.
    Unordered,
}

/// Configuration for a single scrape of the outage listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Listing page to fetch
    #[serde(default = "default_listing_url")]
    pub listing_url: String,

    /// Directory holding downloaded PDFs and the index file
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    /// Name of the JSON index written into the storage directory
    #[serde(default = "default_index_filename")]
    pub index_filename: String,

    /// Class attribute of the elements holding notice titles
    #[serde(default = "default_title_class")]
    pub title_class: String,

    /// Class attribute of the elements holding the PDF links
    #[serde(default = "default_description_class")]
    pub description_class: String,

    /// Class attribute of the elements holding timestamps
    #[serde(default = "default_stamp_class")]
    pub stamp_class: String,

    /// Deduplication order for link targets
    #[serde(default)]
    pub link_order: LinkOrder,

    /// Per-request timeout; the HTTP client default applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

fn default_listing_url() -> String {
    "http://www.pgh2o.com/outages".to_string()
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from("pdfs/")
}

fn default_index_filename() -> String {
    "timestamp_mapping.json".to_string()
}

fn default_title_class() -> String {
    "blurbTitle".to_string()
}

fn default_description_class() -> String {
    "blurbDescription".to_string()
}

fn default_stamp_class() -> String {
    "blurbStamp".to_string()
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self::new(&default_listing_url())
    }
}

impl ScrapeConfig {
    /// Create a new configuration for the given listing URL with default values
    pub fn new(listing_url: &str) -> Self {
        Self {
            listing_url: listing_url.to_string(),
            storage_dir: default_storage_dir(),
            index_filename: default_index_filename(),
            title_class: default_title_class(),
            description_class: default_description_class(),
            stamp_class: default_stamp_class(),
            link_order: LinkOrder::default(),
            request_timeout_secs: None,
        }
    }

    /// Use a different storage directory
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScrapeError> {
        let path = path.as_ref();
        let mut file = File::open(path)
            .map_err(|e| ScrapeError::Config(format!("{}: {}", path.display(), e)))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ScrapeError> {
        serde_json::from_str(json).map_err(|e| ScrapeError::Config(e.to_string()))
    }

    /// Full path of the JSON index
    pub fn index_path(&self) -> PathBuf {
        self.storage_dir.join(&self.index_filename)
    }
}
