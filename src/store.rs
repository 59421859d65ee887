//! Storage directory handling: PDF downloads and the JSON index.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use url::Url;

use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use crate::fetch::Fetcher;
use crate::records::OutageRecord;

/// What happened to each record's PDF during a persist pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistReport {
    /// Filenames newly written to the storage directory
    pub downloaded: Vec<String>,

    /// Filenames already present, not fetched again
    pub skipped: Vec<String>,

    /// Filenames whose download failed; their records are still indexed
    pub failed: Vec<String>,

    /// URLs with nothing after the final `/`, so no file to store them in
    pub unnamed: Vec<String>,
}

/// Names of the files currently in `dir`
pub fn list_filenames(dir: &Path) -> Result<HashSet<String>, ScrapeError> {
    let mut names = HashSet::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if let Some(name) = entry.file_name().to_str() {
            names.insert(name.to_string());
        }
    }
    Ok(names)
}

/// Resolve a link found on the listing page against the listing URL.
///
/// Absolute links come back unchanged; if either side fails to parse the raw
/// link is returned and the request will fail on its own.
pub fn resolve_url(base: &str, link: &str) -> String {
    match Url::parse(base).and_then(|b| b.join(link)) {
        Ok(url) => url.to_string(),
        Err(e) => {
            ::log::debug!("Could not resolve {} against {}: {}", link, base, e);
            link.to_string()
        }
    }
}

/// Download every record's PDF that isn't stored yet, then rewrite the index.
///
/// The storage directory is listed once; files written during the pass are
/// added to that listing, so a filename repeated across records is fetched once.
pub async fn persist(
    fetcher: &Fetcher,
    records: &[OutageRecord],
    config: &ScrapeConfig,
) -> Result<PersistReport, ScrapeError> {
    let dir = config.storage_dir.as_path();
    fs::create_dir_all(dir)?;

    let mut known = list_filenames(dir)?;
    let mut report = PersistReport::default();

    for record in records {
        if record.filename.is_empty() {
            ::log::warn!("No filename in {}, not downloading", record.url);
            report.unnamed.push(record.url.clone());
            continue;
        }

        if known.contains(&record.filename) {
            ::log::debug!("Already have {}, skipping", record.filename);
            report.skipped.push(record.filename.clone());
            continue;
        }

        ::log::info!("Scraping {} ....", record.filename);
        let target = resolve_url(&config.listing_url, &record.url);
        match fetcher.fetch(&target).await {
            Some(pdf) => {
                fs::write(dir.join(&record.filename), &pdf.body)?;
                known.insert(record.filename.clone());
                report.downloaded.push(record.filename.clone());
            }
            None => report.failed.push(record.filename.clone()),
        }
    }

    write_index(records, &config.index_path())?;

    Ok(report)
}

/// Overwrite `path` with the records as a 4-space indented JSON array.
///
/// Non-ASCII text is written as UTF-8, not as `\uXXXX` escapes.
pub fn write_index(records: &[OutageRecord], path: &Path) -> Result<(), ScrapeError> {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    records.serialize(&mut ser)?;
    buf.push(b'\n');

    fs::write(path, buf)?;
    ::log::info!("Wrote {} record(s) to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, url: &str, timestamp: &str) -> OutageRecord {
        OutageRecord {
            filename: crate::records::filename_from_url(url).to_string(),
            timestamp: timestamp.to_string(),
            title: title.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_resolve_url() {
        let base = "http://www.pgh2o.com/outages";
        assert_eq!(
            resolve_url(base, "/docs/a.pdf"),
            "http://www.pgh2o.com/docs/a.pdf"
        );
        assert_eq!(
            resolve_url(base, "files/b.pdf"),
            "http://www.pgh2o.com/files/b.pdf"
        );
        assert_eq!(
            resolve_url(base, "https://cdn.example.com/c.pdf"),
            "https://cdn.example.com/c.pdf"
        );
        assert_eq!(resolve_url("not a url", "/docs/a.pdf"), "/docs/a.pdf");
    }

    #[test]
    fn test_write_index_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timestamp_mapping.json");

        write_index(&[record("Notice A", "/docs/a.pdf", "2023-01-01")], &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let expected = "[\n    {\n        \"filename\": \"a.pdf\",\n        \"timestamp\": \"2023-01-01\",\n        \"title\": \"Notice A\",\n        \"url\": \"/docs/a.pdf\"\n    }\n]\n";
        assert_eq!(written, expected);
    }

    #[test]
    fn test_write_index_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        fs::write(&path, "stale content that is longer than the new index").unwrap();

        write_index(&[], &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[]\n");
    }

    #[test]
    fn test_list_filenames() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.pdf"), b"%PDF").unwrap();
        fs::write(dir.path().join("timestamp_mapping.json"), b"[]").unwrap();

        let names = list_filenames(dir.path()).unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.contains("a.pdf"));
    }

    #[tokio::test]
    async fn test_persist_skips_existing_without_network() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.pdf"), b"old").unwrap();

        // Unroutable listing URL: any attempted download would be a failure
        let config =
            ScrapeConfig::new("http://127.0.0.1:9/outages").with_storage_dir(dir.path());
        let fetcher = Fetcher::new(&config).unwrap();
        let records = vec![record("Notice A", "/docs/a.pdf", "2023-01-01")];

        let report = persist(&fetcher, &records, &config).await.unwrap();

        assert_eq!(report.skipped, vec!["a.pdf"]);
        assert!(report.downloaded.is_empty());
        assert!(report.failed.is_empty());
        assert_eq!(fs::read(dir.path().join("a.pdf")).unwrap(), b"old");
        assert!(config.index_path().exists());
    }

    #[tokio::test]
    async fn test_persist_url_without_filename() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            ScrapeConfig::new("http://127.0.0.1:9/outages").with_storage_dir(dir.path());
        let fetcher = Fetcher::new(&config).unwrap();
        let records = vec![record("Notice A", "http://example.com/docs/", "2023-01-01")];

        let report = persist(&fetcher, &records, &config).await.unwrap();

        assert_eq!(report.unnamed, vec!["http://example.com/docs/"]);
        assert!(report.failed.is_empty());
        assert!(report.downloaded.is_empty());
        assert_eq!(read_index_len(&config), 1);
    }

    fn read_index_len(config: &ScrapeConfig) -> usize {
        let json = fs::read_to_string(config.index_path()).unwrap();
        serde_json::from_str::<Vec<OutageRecord>>(&json).unwrap().len()
    }

    #[test]
    fn test_write_index_keeps_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");

        write_index(&[record("Caf\u{e9}", "/docs/a.pdf", "")], &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"title\": \"Caf\u{e9}\""));
    }

    #[tokio::test]
    async fn test_persist_creates_storage_dir() {
        let root = tempfile::tempdir().unwrap();
        let config = ScrapeConfig::new("http://127.0.0.1:9/outages")
            .with_storage_dir(root.path().join("nested").join("pdfs"));
        let fetcher = Fetcher::new(&config).unwrap();

        let report = persist(&fetcher, &[], &config).await.unwrap();

        assert_eq!(report, PersistReport::default());
        assert_eq!(fs::read_to_string(config.index_path()).unwrap(), "[]\n");
    }
}
