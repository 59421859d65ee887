use std::borrow::Cow;
use std::time::Duration;

use encoding_rs::{Encoding, UTF_8};

use crate::config::ScrapeConfig;
use crate::error::ScrapeError;

/// A successful (HTTP 200) response
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    /// URL that was requested
    pub url: String,

    /// HTTP status code
    pub status: u16,

    /// Charset label from the Content-Type header, if one was declared
    pub charset: Option<String>,

    /// Raw response body
    pub body: Vec<u8>,
}

impl FetchedResponse {
    /// Body decoded with the declared charset, UTF-8 when none is declared or
    /// the label is unknown. Invalid sequences become U+FFFD.
    pub fn text(&self) -> Cow<'_, str> {
        let encoding = self
            .charset
            .as_deref()
            .and_then(|label| Encoding::for_label(label.as_bytes()))
            .unwrap_or(UTF_8);

        let (text, used, had_errors) = encoding.decode(&self.body);
        if had_errors {
            ::log::debug!(
                "Replaced invalid {} sequences in {}",
                used.name(),
                self.url
            );
        }
        text
    }
}

/// The `charset` parameter of a Content-Type value, unquoted
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"').to_string())
        } else {
            None
        }
    })
}

/// Issues plain GET requests; one client is shared by every request in a run
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// Build a fetcher honouring the configured request timeout
    pub fn new(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// GET `url`, returning `None` on a non-200 status or a transport error
    pub async fn fetch(&self, url: &str) -> Option<FetchedResponse> {
        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                ::log::warn!("Request to {} failed: {}", url, e);
                return None;
            }
        };

        let status = response.status().as_u16();
        if status != 200 {
            ::log::warn!("Got status {} for {}", status, url);
            return None;
        }

        let charset = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(charset_from_content_type);

        match response.bytes().await {
            Ok(body) => {
                ::log::debug!("Fetched {} bytes from {}", body.len(), url);
                Some(FetchedResponse {
                    url: url.to_string(),
                    status,
                    charset,
                    body: body.to_vec(),
                })
            }
            Err(e) => {
                ::log::warn!("Failed to read body of {}: {}", url, e);
                None
            }
        }
    }
}
