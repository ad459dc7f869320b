//! Page sessions: the browser (or plain HTTP fetch) a scrape job drives.
//!
//! Every job follows the same shape: open a session, navigate, sleep a
//! fixed settle period so client-side rendering can finish, read the DOM,
//! and release the session. `Session` dispatches to a WebDriver browser
//! when an endpoint is configured and to a plain HTTP fetch otherwise.

pub mod http;
pub mod webdriver;

use std::time::Duration;

use tracing::info;

use crate::{cli::SessionArgs, Result};

pub use http::HttpSession;
pub use webdriver::WebDriverSession;

/// Operations a scrape job needs from a page session.
#[allow(async_fn_in_trait)]
pub trait PageSession {
    /// Navigate to `url`.
    async fn open(&mut self, url: &str) -> Result<()>;

    /// Wait until at least one `<tag>` element exists, or fail after `timeout`.
    async fn wait_for_tag(&mut self, tag: &str, timeout: Duration) -> Result<()>;

    /// Current DOM serialised as HTML.
    async fn page_source(&mut self) -> Result<String>;

    /// Release the session. Errors are reported, never propagated.
    async fn quit(&mut self);

    /// Sleep for a fixed render delay.
    async fn settle(&mut self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Session chosen from command line options.
pub enum Session {
    Browser(WebDriverSession),
    Http(HttpSession),
}

impl Session {
    /// Start a browser session when a WebDriver endpoint is configured,
    /// otherwise fall back to plain HTTP fetches.
    pub async fn connect(args: &SessionArgs) -> Result<Self> {
        match &args.webdriver {
            Some(endpoint) => {
                let session = WebDriverSession::start(endpoint, args.headless).await?;
                info!(endpoint = %endpoint, "Chrome WebDriver session started");
                Ok(Session::Browser(session))
            }
            None => {
                info!("No WebDriver endpoint configured, fetching pages over HTTP");
                Ok(Session::Http(HttpSession::new()?))
            }
        }
    }
}

impl PageSession for Session {
    async fn open(&mut self, url: &str) -> Result<()> {
        match self {
            Session::Browser(s) => s.open(url).await,
            Session::Http(s) => s.open(url).await,
        }
    }

    async fn wait_for_tag(&mut self, tag: &str, timeout: Duration) -> Result<()> {
        match self {
            Session::Browser(s) => s.wait_for_tag(tag, timeout).await,
            Session::Http(s) => s.wait_for_tag(tag, timeout).await,
        }
    }

    async fn page_source(&mut self) -> Result<String> {
        match self {
            Session::Browser(s) => s.page_source().await,
            Session::Http(s) => s.page_source().await,
        }
    }

    async fn quit(&mut self) {
        match self {
            Session::Browser(s) => s.quit().await,
            Session::Http(s) => s.quit().await,
        }
    }
}
