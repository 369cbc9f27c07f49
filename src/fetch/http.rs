// src/fetch/http.rs
// =============================================================================
// A thin wrapper around one reqwest Client.
//
// Key functionality:
// - GET a page and return its HTML text
// - GET an image and return its bytes plus the declared Content-Length
// - Turn every failure into a FetchError so callers can skip and move on
//
// Rust concepts:
// - async/await: network calls yield instead of blocking the thread
// - Result<T, E>: each call either succeeds or says why it failed
// =============================================================================

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use crate::config::FetchConfig;
use crate::error::FetchError;

/// The body of an image response.
#[derive(Debug, Clone)]
pub struct FetchedBytes {
    pub bytes: Vec<u8>,
    /// Size announced by the server, if it sent a Content-Length header
    pub declared_len: Option<u64>,
}

/// HTTP client shared by the crawler and the downloader.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    // Builds the client once; reqwest reuses connections between requests
    pub fn new(config: &FetchConfig) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }

    /// Fetch a page and return its HTML as text.
    pub async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get(url).await?;
        response
            .text()
            .await
            .map_err(|e| categorize_error(url, e))
    }

    /// Fetch an image (or any binary resource).
    pub async fn fetch_bytes(&self, url: &str) -> Result<FetchedBytes, FetchError> {
        let response = self.get(url).await?;
        let declared_len = response.content_length();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| categorize_error(url, e))?;

        Ok(FetchedBytes {
            bytes: bytes.to_vec(),
            declared_len,
        })
    }

    async fn get(&self, url: &str) -> Result<Response, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| categorize_error(url, e))?;

        check_status(url, response.status())?;
        Ok(response)
    }
}

// Only 2xx counts as success. 404 and 410 are reported separately from the
// other codes so callers can tell "missing" from "broken".
fn check_status(url: &str, status: StatusCode) -> Result<(), FetchError> {
    if status.is_success() {
        return Ok(());
    }

    let url = url.to_string();
    let status_code = status.as_u16();
    if matches!(status, StatusCode::NOT_FOUND | StatusCode::GONE) {
        Err(FetchError::NotFound {
            url,
            status: status_code,
        })
    } else {
        Err(FetchError::Status {
            url,
            status: status_code,
        })
    }
}

// Categorizes reqwest errors: timeouts get their own variant, everything
// else (DNS, connect, TLS, redirect loops, body reads) is a transport error
fn categorize_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        return FetchError::Timeout {
            url: url.to_string(),
        };
    }

    let message = if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_connect() {
        format!("connection failed: {error}")
    } else {
        error.to_string()
    };

    FetchError::Transport {
        url: url.to_string(),
        message,
    }
}
