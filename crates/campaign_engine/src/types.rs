use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// One row of `GET /api/campaigns`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub total_urls: u64,
    #[serde(default)]
    pub indexed_count: u64,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditsResponse {
    #[serde(deserialize_with = "credits_from_number")]
    pub remaining_credits: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CampaignsResponse {
    #[serde(default)]
    pub campaigns: Vec<CampaignRecord>,
}

/// Body of `POST /api/submit`. An empty `client_token` asks for a fresh one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPayload {
    pub campaign_name: String,
    pub urls: Vec<String>,
    pub client_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    #[serde(deserialize_with = "credits_from_number")]
    pub remaining_credits: i64,
    #[serde(default)]
    pub new_campaign_token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The service reports credits as a JSON number, which may carry a fraction.
fn credits_from_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    number
        .as_i64()
        .or_else(|| number.as_f64().map(|value| value.round() as i64))
        .ok_or_else(|| serde::de::Error::custom(format!("credits out of range: {number}")))
}

/// Results flowing back from the engine thread. Reads are tagged with the
/// token they were issued for.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    CreditsFetched {
        token: String,
        result: Result<i64, ApiError>,
    },
    CampaignsFetched {
        token: String,
        result: Result<Vec<CampaignRecord>, ApiError>,
    },
    SubmitFinished {
        result: Result<SubmitResponse, ApiError>,
    },
    PollDue {
        token: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
    /// User-facing text from the service's error body, when it sent one.
    pub server_message: Option<String>,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            server_message: None,
        }
    }

    pub(crate) fn with_server_message(mut self, server_message: Option<String>) -> Self {
        self.server_message = server_message;
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
        }
    }
}
