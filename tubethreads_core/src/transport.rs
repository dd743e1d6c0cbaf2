use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::TubeError;

const API_KEY_HEADER: &str = "X-Goog-Api-Key";

/// Status code and parsed body of one GET request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON body. A body that is not JSON is kept as a string value so
    /// error pages can still be logged.
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Body rendered for log lines, capped at 500 characters.
    pub fn body_excerpt(&self) -> String {
        let text = match &self.body {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        text.chars().take(500).collect()
    }
}

/// The single capability the fetchers need from the network: perform a GET
/// against a named endpoint with query parameters.
///
/// The API key is not passed here; a transport carries its own credentials.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<ApiResponse, TubeError>;
}

/// `reqwest`-backed transport for the YouTube Data API.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl HttpTransport {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, TubeError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            "tubethreads/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
            api_key: api_key.into(),
        })
    }
}

/// Parse the API base, forcing a trailing slash so endpoint joins append
/// rather than replace the last path segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, TubeError> {
    let normalized = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };
    Url::parse(&normalized)
        .map_err(|e| TubeError::Config(format!("Invalid API base URL '{}': {}", base_url, e)))
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<ApiResponse, TubeError> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| TubeError::Config(format!("Invalid endpoint '{}': {}", endpoint, e)))?;

        debug!(%url, ?params, "GET");

        // Key stays out of the URL; reqwest errors print the URL.
        let response = self
            .client
            .get(url)
            .query(params)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .send()
            .await
            .map_err(|e| TubeError::HttpRequest(e.without_url()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| TubeError::HttpRequest(e.without_url()))?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        Ok(ApiResponse { status, body })
    }
}
