use std::error::Error;
use std::fmt;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Response, StatusCode};
use serde::Deserialize;

pub const ENDPOINT: &str = "https://icanhazdadjoke.com/";

/// A single joke as served by icanhazdadjoke.
///
/// Fields are read-only; a newer joke replaces the record instead of mutating it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JokeRecord {
    id: String,
    #[serde(rename = "joke")]
    text: String,
    #[serde(rename = "status")]
    status_code: i64,
}

impl JokeRecord {
    pub fn new(id: impl Into<String>, text: impl Into<String>, status_code: i64) -> Self {
        Self { id: id.into(), text: text.into(), status_code }
    }

    pub fn from_json(body: &[u8]) -> Result<Self, FetchFailed> {
        let value = serde_json::from_slice::<serde_json::Value>(body)?;
        if !value.is_object() {
            return Err(FetchFailed::Decode(serde::de::Error::custom("expected a JSON object")));
        }

        Ok(Self::deserialize(value)?)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Status echoed inside the payload, not the HTTP status of the response.
    pub const fn status_code(&self) -> i64 {
        self.status_code
    }
}

/// Getting a joke failed. The variant carries the underlying cause.
#[derive(Debug)]
pub enum FetchFailed {
    Request(reqwest::Error),
    Server(StatusCode),
    Decode(serde_json::Error),
}

impl fmt::Display for FetchFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(err) => {
                write!(f, "request failed: {err}")?;
                if let Some(source) = err.source() {
                    write!(f, ": {source}")?;
                }
                Ok(())
            }
            Self::Server(status_code) => write!(f, "joke service is offline ({status_code})"),
            Self::Decode(err) => write!(f, "unexpected response body: {err}"),
        }
    }
}

impl Error for FetchFailed {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Request(err) => Some(err),
            Self::Server(_) => None,
            Self::Decode(err) => Some(err),
        }
    }
}

impl From<reqwest::Error> for FetchFailed {
    fn from(value: reqwest::Error) -> Self {
        Self::Request(value.without_url())
    }
}

impl From<serde_json::Error> for FetchFailed {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

pub async fn random_joke(
    http_client: &reqwest::Client,
    endpoint: &str,
) -> Result<JokeRecord, FetchFailed> {
    let response = http_client.get(endpoint).header(ACCEPT, "application/json").send().await?;

    log::debug!("joke service responded with {}", response.status());
    if is_outage_page(&response) {
        return Err(FetchFailed::Server(response.status()));
    }

    JokeRecord::from_json(&response.bytes().await?)
}

/// A 5xx HTML page from the proxy in front of the API; no point in decoding it.
fn is_outage_page(response: &Response) -> bool {
    response.status().is_server_error()
        && response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|header| header.to_str().ok())
            .is_some_and(|content_type| content_type.starts_with("text/html"))
}
