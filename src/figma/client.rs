//! Figma API client for fetching node styling data.

use reqwest::header::RETRY_AFTER;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::api_types::{FigmaNodeData, FigmaNodesResponse};
use crate::{Result, TpcError};

pub const DEFAULT_BASE_URL: &str = "https://api.figma.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub enum FigmaAuth {
    PersonalAccessToken(String),
    OAuthToken(String),
}

impl FigmaAuth {
    pub fn from_env() -> Option<Self> {
        if let Ok(token) = std::env::var("FIGMA_TOKEN") {
            if !token.is_empty() {
                return Some(Self::PersonalAccessToken(token));
            }
        }

        if let Ok(token) = std::env::var("FIGMA_OAUTH_TOKEN") {
            if !token.is_empty() {
                return Some(Self::OAuthToken(token));
            }
        }

        None
    }

    fn token(&self) -> &str {
        match self {
            FigmaAuth::PersonalAccessToken(token) | FigmaAuth::OAuthToken(token) => token,
        }
    }

    fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            FigmaAuth::PersonalAccessToken(token) => builder.header("X-FIGMA-TOKEN", token),
            FigmaAuth::OAuthToken(token) => builder.bearer_auth(token),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FigmaClient {
    http: Client,
    auth: FigmaAuth,
    base_url: Url,
}

impl FigmaClient {
    pub fn new(auth: FigmaAuth) -> Result<Self> {
        Self::with_base_url_and_timeout(auth, DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Build a client from `FIGMA_TOKEN` / `FIGMA_OAUTH_TOKEN`.
    pub fn from_env(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let auth = FigmaAuth::from_env().ok_or_else(|| {
            TpcError::Config(
                "Missing Figma token; set FIGMA_TOKEN or FIGMA_OAUTH_TOKEN".to_string(),
            )
        })?;
        Self::with_base_url_and_timeout(auth, base_url, timeout)
    }

    pub fn with_base_url(auth: FigmaAuth, base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_base_url_and_timeout(auth, base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_base_url_and_timeout(
        auth: FigmaAuth,
        base_url: impl AsRef<str>,
        timeout: Duration,
    ) -> Result<Self> {
        if auth.token().trim().is_empty() {
            return Err(TpcError::Config(
                "Missing Figma token; set FIGMA_TOKEN or FIGMA_OAUTH_TOKEN".to_string(),
            ));
        }

        let base_url = Url::parse(base_url.as_ref())?;

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TpcError::Network)?;

        Ok(Self {
            http,
            auth,
            base_url,
        })
    }

    /// Fetch a single node's document from `/v1/files/{key}/nodes`.
    pub async fn fetch_node(&self, file_key: &str, node_id: &str) -> Result<FigmaNodeData> {
        if file_key.trim().is_empty() {
            return Err(TpcError::Config(
                "Figma file key is required to extract a design style".to_string(),
            ));
        }
        if node_id.trim().is_empty() {
            return Err(TpcError::Config(
                "Figma node id is required to extract a design style".to_string(),
            ));
        }

        let node_id = normalize_node_id(node_id);
        let mut url = self.endpoint(&format!("/v1/files/{file_key}/nodes"))?;
        url.query_pairs_mut().append_pair("ids", &node_id);

        debug!(file_key, node_id = %node_id, "fetching Figma node");
        let req = self.auth.apply(self.http.get(url));
        let mut response: FigmaNodesResponse = self.send_json(req).await?;

        response
            .nodes
            .remove(&node_id)
            .flatten()
            .map(|wrapper| wrapper.document)
            .ok_or_else(|| {
                TpcError::figma_api(
                    None,
                    format!("Node {node_id} not found in Figma response"),
                )
            })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(TpcError::InvalidUrl)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(TpcError::Network)?;
        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let body = response.text().await.map_err(TpcError::Network)?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(TpcError::Serialization);
        }

        Err(TpcError::figma_api(
            Some(status),
            error_message(status, &body, retry_after.as_deref()),
        ))
    }
}

/// Node ids appear as `1-2` in share URLs and `1:2` in the API.
pub fn normalize_node_id(node_id: &str) -> String {
    node_id.trim().replace('-', ":")
}

fn error_message(status: StatusCode, body: &str, retry_after: Option<&str>) -> String {
    let fallback = format!("Figma API returned status {}", status.as_u16());
    let parsed = serde_json::from_str::<Value>(body).ok();
    let from_body = parsed
        .as_ref()
        .and_then(|value| value.get("err").or_else(|| value.get("error")))
        .and_then(Value::as_str)
        .map(str::to_owned);

    match (status, retry_after, from_body) {
        (StatusCode::TOO_MANY_REQUESTS, Some(retry), Some(msg)) => {
            format!("{msg} (rate limited, retry after {retry}s)")
        }
        (StatusCode::TOO_MANY_REQUESTS, Some(retry), None) => {
            format!("rate limited by Figma API, retry after {retry}s")
        }
        (_, _, Some(msg)) => msg,
        _ => fallback,
    }
}
