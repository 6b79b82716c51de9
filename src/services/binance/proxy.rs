//! Signing proxy: attaches timestamp, receive window and signature to a
//! request and forwards it to Binance with the API key header.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use super::signing::{timestamp_ms, RequestSigner, API_KEY_HEADER};

/// Body of `POST /api/proxy`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub query_params: Map<String, Value>,
}

impl ProxyRequest {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            query_params: Map::new(),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query_params.insert(key.into(), value.into());
        self
    }

    /// Query parameters rendered as strings.
    pub fn params(&self) -> Vec<(String, String)> {
        self.query_params
            .iter()
            .map(|(key, value)| (key.clone(), query_value(value)))
            .collect()
    }
}

/// Upstream status and JSON body, forwarded verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: u16,
    pub body: Value,
}

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Endpoint is required")]
    MissingEndpoint,

    #[error("Endpoint must start with '/': {0}")]
    InvalidEndpoint(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("API credentials not configured")]
    MissingCredentials,

    #[error("Request failed with status code {status}")]
    Upstream { status: u16, details: Value },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl ProxyError {
    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::MissingEndpoint
            | ProxyError::InvalidEndpoint(_)
            | ProxyError::InvalidBody(_) => 400,
            ProxyError::MissingCredentials | ProxyError::Transport(_) => 500,
            ProxyError::Upstream { status, .. } => *status,
        }
    }

    /// `{error}` for request validation failures, `{error, details}` for
    /// failures talking to Binance.
    pub fn body(&self) -> Value {
        match self {
            ProxyError::Upstream { details, .. } => json!({
                "error": self.to_string(),
                "details": details,
            }),
            ProxyError::Transport(_) => json!({
                "error": self.to_string(),
                "details": "Unknown error",
            }),
            _ => json!({ "error": self.to_string() }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SigningProxy {
    client: reqwest::Client,
    api_base: String,
    signer: Option<RequestSigner>,
}

impl SigningProxy {
    pub fn new(client: reqwest::Client, api_base: impl Into<String>, signer: Option<RequestSigner>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            signer,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.signer.is_some()
    }

    /// Validate a proxy request body and forward it.
    pub async fn handle(&self, request: &ProxyRequest) -> Result<ProxyResponse, ProxyError> {
        let endpoint = request
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
            .ok_or(ProxyError::MissingEndpoint)?;
        self.forward(endpoint, &request.params()).await
    }

    /// Sign and send `GET {api_base}{endpoint}?{query}&signature=...`.
    pub async fn forward(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<ProxyResponse, ProxyError> {
        if !endpoint.starts_with('/') {
            return Err(ProxyError::InvalidEndpoint(endpoint.to_string()));
        }
        let signer = self.signer.as_ref().ok_or(ProxyError::MissingCredentials)?;

        let query = signer.signed_query(params, timestamp_ms());
        let url = format!("{}{}?{}", self.api_base, endpoint, query);
        debug!(endpoint = %endpoint, "forwarding signed request");

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, signer.api_key())
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = serde_json::from_str::<Value>(&text).unwrap_or_else(|_| Value::String(text));

        if !(200..300).contains(&status) {
            warn!(endpoint = %endpoint, status, "signed request rejected upstream");
            return Err(ProxyError::Upstream {
                status,
                details: body,
            });
        }

        Ok(ProxyResponse { status, body })
    }
}

/// Render a JSON query value the way it appears in a URL: strings unquoted,
/// arrays comma-joined.
pub fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(query_value).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}
