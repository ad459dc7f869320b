//! Minimal W3C WebDriver client (chromedriver) over `reqwest`.

use std::time::{Duration, Instant};

use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::PageSession;
use crate::{Result, ScrapeError};

/// Poll interval for `wait_for_tag`.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Chrome flags the scrape jobs always launch with.
const CHROME_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--window-size=1920,1080",
];

/// Every WebDriver response wraps its payload in `{"value": ...}`.
#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    value: Value,
}

#[derive(Debug, Deserialize)]
struct NewSession {
    #[serde(rename = "sessionId")]
    session_id: String,
}

/// A live browser session.
pub struct WebDriverSession {
    client: Client,
    base_url: String,
    session_id: Option<String>,
}

/// Capabilities payload for `POST /session`.
pub fn chrome_capabilities(headless: bool) -> Value {
    let mut args: Vec<&str> = CHROME_ARGS.to_vec();
    if headless {
        args.push("--headless");
    }
    json!({
        "capabilities": {
            "alwaysMatch": {
                "browserName": "chrome",
                "goog:chromeOptions": { "args": args }
            }
        }
    })
}

/// Unwrap a WebDriver reply, turning error payloads into `ScrapeError::WebDriver`.
pub fn parse_wire_response(status: StatusCode, body: &str) -> Result<Value> {
    let wire: WireResponse = serde_json::from_str(body)?;
    if status.is_success() {
        return Ok(wire.value);
    }

    let field = |name: &str| {
        wire.value
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    Err(ScrapeError::WebDriver {
        error: field("error").unwrap_or_else(|| status.to_string()),
        message: field("message").unwrap_or_default(),
    })
}

impl WebDriverSession {
    /// Create a Chrome session on the WebDriver server at `endpoint`.
    pub async fn start(endpoint: &str, headless: bool) -> Result<Self> {
        let mut session = Self {
            client: Client::new(),
            base_url: endpoint.trim_end_matches('/').to_string(),
            session_id: None,
        };

        let value = session
            .command(Method::POST, "session", Some(chrome_capabilities(headless)))
            .await?;
        let created: NewSession = serde_json::from_value(value)?;
        debug!(session_id = %created.session_id, "WebDriver session created");
        session.session_id = Some(created.session_id);
        Ok(session)
    }

    fn session_path(&self, suffix: &str) -> Result<String> {
        let id = self.session_id.as_ref().ok_or_else(|| ScrapeError::WebDriver {
            error: "invalid session id".to_string(),
            message: "session already closed".to_string(),
        })?;
        if suffix.is_empty() {
            Ok(format!("session/{}", id))
        } else {
            Ok(format!("session/{}/{}", id, suffix))
        }
    }

    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, path);
        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        parse_wire_response(status, &text)
    }
}

impl PageSession for WebDriverSession {
    async fn open(&mut self, url: &str) -> Result<()> {
        let path = self.session_path("url")?;
        self.command(Method::POST, &path, Some(json!({ "url": url })))
            .await?;
        Ok(())
    }

    async fn wait_for_tag(&mut self, tag: &str, timeout: Duration) -> Result<()> {
        let path = self.session_path("element")?;
        let started = Instant::now();
        let query = json!({ "using": "tag name", "value": tag });

        loop {
            match self.command(Method::POST, &path, Some(query.clone())).await {
                Ok(_) => return Ok(()),
                Err(ScrapeError::WebDriver { error, .. }) if error == "no such element" => {}
                Err(e) => return Err(e),
            }
            if started.elapsed() >= timeout {
                return Err(ScrapeError::ElementTimeout {
                    tag: tag.to_string(),
                    seconds: timeout.as_secs(),
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn page_source(&mut self) -> Result<String> {
        let path = self.session_path("source")?;
        match self.command(Method::GET, &path, None).await? {
            Value::String(html) => Ok(html),
            other => Err(ScrapeError::WebDriver {
                error: "unexpected response".to_string(),
                message: format!("page source was not a string: {}", other),
            }),
        }
    }

    async fn quit(&mut self) {
        let path = match self.session_path("") {
            Ok(path) => path,
            Err(_) => return,
        };
        match self.command(Method::DELETE, &path, None).await {
            Ok(_) => debug!("WebDriver session closed"),
            Err(e) => warn!("Error during WebDriver cleanup: {}", e),
        }
        self.session_id = None;
    }
}
