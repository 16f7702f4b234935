// src/api/mod.rs
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub mod client;

pub use client::ApiClient;

/// How a call to the analysis service failed. The session reacts differently
/// to connectivity loss than to a failure the server itself reported.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No usable answer from the server at all
    #[error("Cannot reach analysis server: {0}")]
    Unreachable(String),
    /// The server answered and reported a failure
    #[error("{0}")]
    Server(String),
    /// The request could not be assembled locally
    #[error("Failed to build request: {0}")]
    Request(String),
}

/// Response body of POST /api/analyze. The service speaks camelCase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub match_score: Option<i64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub analyzed_at: Option<DateTime<Utc>>,
}

/// The service has shipped `analyzedAt` both as RFC 3339 strings and as epoch
/// milliseconds. Accept either; anything else degrades to None instead of
/// failing the whole body.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        serde_json::Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }))
}
