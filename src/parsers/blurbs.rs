//! Extraction of outage notices ("blurbs") from the listing page.
//!
//! Each notice is spread over three sibling regions identified by their class
//! attribute: a title, a description holding the PDF link and a timestamp.
//! The three regions are queried independently and paired up by position.

use std::collections::HashSet;

use scraper::{Html, Selector};

use crate::config::{LinkOrder, ScrapeConfig};
use crate::error::ScrapeError;

/// One notice as found on the page, before a filename is derived
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blurb {
    pub title: String,
    pub url: String,
    pub timestamp: String,
}

/// Compiled selectors for the three blurb regions
#[derive(Debug)]
pub struct BlurbQueries {
    title: Selector,
    link: Selector,
    stamp: Selector,
}

impl BlurbQueries {
    /// Build selectors matching elements whose class attribute equals the configured names
    pub fn from_config(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        let title = class_selector(&config.title_class, "")?;
        let link = class_selector(&config.description_class, " a[href]")?;
        let stamp = class_selector(&config.stamp_class, "")?;

        Ok(Self { title, link, stamp })
    }

    /// Every text node below the title regions, in document order
    pub fn titles(&self, doc: &Html) -> Vec<String> {
        text_nodes(doc, &self.title)
    }

    /// Every text node below the timestamp regions, in document order
    pub fn timestamps(&self, doc: &Html) -> Vec<String> {
        text_nodes(doc, &self.stamp)
    }

    /// Raw link targets below the description regions, duplicates included
    pub fn links(&self, doc: &Html) -> Vec<String> {
        doc.select(&self.link)
            .filter_map(|e| e.value().attr("href"))
            .map(|s| s.to_string())
            .collect()
    }
}

/// Exact match on the whole class attribute, not on a single class token
fn class_selector(class: &str, suffix: &str) -> Result<Selector, ScrapeError> {
    let escaped = class.replace('\\', "\\\\").replace('"', "\\\"");
    let css = format!("[class=\"{}\"]{}", escaped, suffix);
    Selector::parse(&css).map_err(|e| ScrapeError::Selector(format!("{}: {:?}", css, e)))
}

/// Text nodes under the matched elements, each node once even when matched elements nest
fn text_nodes(doc: &Html, selector: &Selector) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut texts = Vec::new();
    for element in doc.select(selector) {
        for node in element.descendants() {
            if let Some(text) = node.value().as_text() {
                if seen.insert(node.id()) {
                    texts.push(String::from(&**text));
                }
            }
        }
    }
    texts
}

/// Remove duplicate link targets
pub fn dedupe_links(links: Vec<String>, order: LinkOrder) -> Vec<String> {
    match order {
        LinkOrder::FirstSeen => {
            let mut seen = HashSet::new();
            links
                .into_iter()
                .filter(|link| seen.insert(link.clone()))
                .collect()
        }
        LinkOrder::Unordered => links
            .into_iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect(),
    }
}

/// Query titles, links and timestamps and pair them up by position.
///
/// Fails with [`ScrapeError::StructuralMismatch`] unless the number of titles,
/// deduplicated links and timestamps agree.
pub fn extract(
    doc: &Html,
    queries: &BlurbQueries,
    order: LinkOrder,
) -> Result<Vec<Blurb>, ScrapeError> {
    let titles = queries.titles(doc);
    let raw_links = queries.links(doc);
    let raw_count = raw_links.len();
    let urls = dedupe_links(raw_links, order);
    let timestamps = queries.timestamps(doc);

    if urls.len() < raw_count {
        ::log::debug!(
            "Dropped {} duplicate link(s) from {}",
            raw_count - urls.len(),
            raw_count
        );
    }

    if titles.len() != urls.len() || urls.len() != timestamps.len() {
        ::log::error!(
            "The numbers of titles, urls and timestamps don't match. titles: {}, urls: {}, timestamps: {}",
            titles.len(),
            urls.len(),
            timestamps.len()
        );
        return Err(ScrapeError::StructuralMismatch {
            titles: titles.len(),
            urls: urls.len(),
            timestamps: timestamps.len(),
        });
    }

    Ok(titles
        .into_iter()
        .zip(urls)
        .zip(timestamps)
        .map(|((title, url), timestamp)| Blurb {
            title,
            url,
            timestamp,
        })
        .collect())
}
