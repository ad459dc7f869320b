//! Plain HTTP page session for pages that render their tables server-side.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use super::PageSession;
use crate::{Result, ScrapeError};

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Fetches each page once; the fetched body stands in for the DOM.
pub struct HttpSession {
    client: Client,
    source: Option<String>,
}

impl HttpSession {
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            source: None,
        })
    }

    fn current(&self) -> Result<&str> {
        self.source.as_deref().ok_or(ScrapeError::NoTables)
    }
}

/// Whether `html` contains an opening `<tag` element.
pub fn contains_tag(html: &str, tag: &str) -> bool {
    let needle = format!("<{}", tag.to_ascii_lowercase());
    let lower = html.to_ascii_lowercase();
    lower.match_indices(&needle).any(|(i, _)| {
        matches!(
            lower[i + needle.len()..].chars().next(),
            Some(c) if c == '>' || c == '/' || c.is_whitespace()
        )
    })
}

impl PageSession for HttpSession {
    async fn open(&mut self, url: &str) -> Result<()> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        debug!(url, bytes = body.len(), "Fetched page");
        self.source = Some(body);
        Ok(())
    }

    /// The body never changes after the fetch, so this only checks presence.
    async fn wait_for_tag(&mut self, tag: &str, timeout: Duration) -> Result<()> {
        if contains_tag(self.current()?, tag) {
            Ok(())
        } else {
            Err(ScrapeError::ElementTimeout {
                tag: tag.to_string(),
                seconds: timeout.as_secs(),
            })
        }
    }

    async fn page_source(&mut self) -> Result<String> {
        Ok(self.current()?.to_string())
    }

    async fn quit(&mut self) {
        self.source = None;
    }
}
