//! HMAC-SHA256 signing for authenticated Binance requests

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::form_urlencoded;

use crate::config::Credentials;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the API key on signed requests.
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: Credentials,
    recv_window_ms: u64,
}

impl RequestSigner {
    pub fn new(credentials: Credentials, recv_window_ms: u64) -> Self {
        Self {
            credentials,
            recv_window_ms,
        }
    }

    pub fn api_key(&self) -> &str {
        &self.credentials.api_key
    }

    pub fn recv_window_ms(&self) -> u64 {
        self.recv_window_ms
    }

    /// Hex-encoded HMAC-SHA256 of `payload` keyed by the API secret.
    pub fn sign(&self, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.credentials.api_secret().as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Caller parameters in order, then `timestamp` and `recvWindow`,
    /// form-url-encoded. This is the exact string that gets signed.
    pub fn canonical_query(&self, params: &[(String, String)], timestamp_ms: i64) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        for (key, value) in params {
            query.append_pair(key, value);
        }
        query.append_pair("timestamp", &timestamp_ms.to_string());
        query.append_pair("recvWindow", &self.recv_window_ms.to_string());
        query.finish()
    }

    /// Canonical query with `&signature=<hex>` appended.
    pub fn signed_query(&self, params: &[(String, String)], timestamp_ms: i64) -> String {
        let query = self.canonical_query(params, timestamp_ms);
        let signature = self.sign(&query);
        format!("{}&signature={}", query, signature)
    }
}

/// Milliseconds since the Unix epoch.
pub fn timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}
