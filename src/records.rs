use serde::{Deserialize, Serialize};

use crate::parsers::Blurb;

/// A scraped outage notice as stored in the JSON index.
///
/// Fields are declared in alphabetical order so the serialized keys come out sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutageRecord {
    /// Last path segment of `url`; the on-disk identity of the PDF
    pub filename: String,

    /// Timestamp text exactly as found on the page
    pub timestamp: String,

    /// Notice title
    pub title: String,

    /// Link target as found on the page, possibly relative
    pub url: String,
}

impl OutageRecord {
    /// Create a record from a blurb, deriving the filename from its URL
    pub fn from_blurb(blurb: Blurb) -> Self {
        Self {
            filename: filename_from_url(&blurb.url).to_string(),
            timestamp: blurb.timestamp,
            title: blurb.title,
            url: blurb.url,
        }
    }
}

/// Everything after the final `/`, or the whole string if there is none
pub fn filename_from_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Turn extracted blurbs into records, one per blurb, order preserved
pub fn build_records(blurbs: Vec<Blurb>) -> Vec<OutageRecord> {
    blurbs.into_iter().map(OutageRecord::from_blurb).collect()
}
