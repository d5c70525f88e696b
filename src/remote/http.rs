//! Contact source backed by the paginated JSON API.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::contact::{Contact, ContactPage};
use crate::remote::{ContactSource, FetchError, Scope};

/// How much of a malformed response body ends up in the log.
const BODY_SNIPPET_CHARS: usize = 200;

/// HTTP client for the contacts API.
///
/// The API serves `{base}/contacts/?page=N` for the unscoped collection
/// and `{base}/country-contacts/{country}/?page=N` for a single country,
/// both wrapped in a `results` envelope.
pub struct HttpContactSource {
    client: Client,
    base_url: Url,
}

impl HttpContactSource {
    /// Create a new source from the configured base URL and timeout.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            bail!("base_url must be an absolute http(s) URL: {base_url}");
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, base_url })
    }

    /// Build the URL for one page of a scope.
    ///
    /// Country names go through path-segment encoding, so "United States"
    /// lands on the wire as `United%20States`.
    fn page_url(&self, scope: &Scope, page: u32) -> Url {
        let mut url = self.base_url.clone();
        // Guaranteed by the constructor check to be a base URL
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            match scope {
                Scope::All => {
                    segments.push("contacts");
                }
                Scope::Country(name) => {
                    segments.push("country-contacts");
                    segments.push(name);
                }
            }
            segments.push("");
        }
        url.set_query(Some(&format!("page={page}")));
        url
    }
}

#[async_trait]
impl ContactSource for HttpContactSource {
    async fn fetch_page(&self, scope: &Scope, page: u32) -> Result<Vec<Contact>, FetchError> {
        let url = self.page_url(scope, page);
        debug!(%url, "fetching contact page");

        let response = self.client.get(url.clone()).send().await?.error_for_status()?;

        // Parse from text rather than Response::json so a malformed body
        // can be quoted in the log
        let body = response.text().await?;
        let parsed: ContactPage = serde_json::from_str(&body).map_err(|err| {
            warn!(%url, body = snippet(&body), "contacts API returned an unparseable body");
            err
        })?;

        debug!(%url, count = parsed.results.len(), "fetched contact page");
        Ok(parsed.results)
    }
}

fn snippet(body: &str) -> &str {
    match body.char_indices().nth(BODY_SNIPPET_CHARS) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
