use crate::fetch::FetchedResponse;
use scraper::Html;

/// Parses a fetched listing page into a queryable document tree.
///
/// The html5ever tree builder recovers from malformed markup the way browsers
/// do, so this never fails; unclosed or misnested tags are repaired.
pub fn parse(response: &FetchedResponse) -> Html {
    parse_str(&response.text())
}

/// Parses raw HTML text into a document tree
pub fn parse_str(html: &str) -> Html {
    let doc = Html::parse_document(html);

    if !doc.errors.is_empty() {
        ::log::debug!(
            "HTML parser recovered from {} markup errors",
            doc.errors.len()
        );
    }

    doc
}
