use std::time::Duration;

use crate::SessionToken;

/// Side effects requested by [`crate::update`]; executed by the platform layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replace any running poll timer with one for `token`.
    SchedulePolling { token: SessionToken, period: Duration },
    /// Stop the poll timer, if any.
    CancelPolling,
    FetchCredits { token: SessionToken },
    FetchCampaigns { token: SessionToken },
    Submit(SubmitRequest),
    /// Write the current token (or its absence) to the token store.
    PersistToken { token: Option<SessionToken> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub campaign_name: String,
    pub urls: Vec<String>,
    /// `None` asks the service to issue a fresh token.
    pub client_token: Option<SessionToken>,
}
