use std::fmt;
use std::time::Duration;

use crate::submission::SubmissionMachine;
use crate::validate;
use crate::view_model::{AppViewModel, CampaignRowView};

/// How often credits and campaigns are refreshed while a token is set.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

pub const POLL_ERROR_MESSAGE: &str =
    "Failed to fetch data. Check your token and network connection.";

/// Opaque session identifier issued by the campaign service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Returns `None` for empty or whitespace-only input; the token is otherwise
    /// kept verbatim (minus surrounding whitespace) and never interpreted.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Credits {
    /// No token; nothing to ask the service about.
    #[default]
    Uninitialized,
    /// Token present but no balance reported yet.
    Loading,
    Known(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CampaignStatus {
    Pending,
    Processing,
    Complete,
    Failed,
    Other(String),
}

impl CampaignStatus {
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" | "queued" => CampaignStatus::Pending,
            "processing" | "in_progress" | "in progress" | "running" => {
                CampaignStatus::Processing
            }
            "complete" | "completed" | "done" => CampaignStatus::Complete,
            "failed" | "error" => CampaignStatus::Failed,
            _ => CampaignStatus::Other(raw.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CampaignStatus::Pending => "Pending",
            CampaignStatus::Processing => "Processing",
            CampaignStatus::Complete => "Complete",
            CampaignStatus::Failed => "Failed",
            CampaignStatus::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub total_urls: u64,
    pub indexed_count: u64,
    pub status: CampaignStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Draft {
    pub campaign_name: String,
    pub urls_text: String,
}

pub type NotificationId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub level: NotificationLevel,
    pub text: String,
}

/// Which operation raised the visible error banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSource {
    Credits,
    Campaigns,
    Submission,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleError {
    pub source: ErrorSource,
    pub message: String,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    mounted: bool,
    token: Option<SessionToken>,
    credits: Credits,
    campaigns: Vec<Campaign>,
    draft: Draft,
    candidate_count: usize,
    invalid_urls: Vec<String>,
    submission: SubmissionMachine,
    error: Option<VisibleError>,
    notifications: Vec<Notification>,
    next_notification_id: NotificationId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            mounted: self.mounted,
            token: self.token.as_ref().map(|token| token.as_str().to_string()),
            credits: self.credits,
            error: self.error.clone(),
            campaign_name: self.draft.campaign_name.clone(),
            urls_text: self.draft.urls_text.clone(),
            candidate_count: self.candidate_count,
            invalid_urls: self.invalid_urls.clone(),
            phase: self.submission.phase(),
            submit_enabled: !self.submission.is_busy(),
            campaigns: self
                .campaigns
                .iter()
                .map(CampaignRowView::from_campaign)
                .collect(),
            notifications: self.notifications.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn credits(&self) -> Credits {
        self.credits
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_mounted(&mut self, mounted: bool) {
        self.mounted = mounted;
        self.mark_dirty();
    }

    pub(crate) fn set_token(&mut self, token: Option<SessionToken>) {
        self.token = token;
        self.mark_dirty();
    }

    /// True when a response tagged with `token` belongs to the live session.
    pub(crate) fn is_current_token(&self, token: &SessionToken) -> bool {
        self.token.as_ref() == Some(token)
    }

    pub(crate) fn set_credits(&mut self, credits: Credits) {
        self.credits = credits;
        self.mark_dirty();
    }

    pub(crate) fn set_campaigns(&mut self, campaigns: Vec<Campaign>) {
        self.campaigns = campaigns;
        self.mark_dirty();
    }

    pub(crate) fn set_campaign_name(&mut self, name: String) {
        self.draft.campaign_name = name;
        self.mark_dirty();
    }

    /// Stores the URL text and recomputes the derived invalid set.
    pub(crate) fn set_urls_text(&mut self, text: String) {
        self.candidate_count = validate::candidate_urls(&text).len();
        self.invalid_urls = validate::invalid_urls(&text);
        self.draft.urls_text = text;
        self.mark_dirty();
    }

    pub(crate) fn clear_draft(&mut self) {
        self.draft = Draft::default();
        self.candidate_count = 0;
        self.invalid_urls.clear();
        self.mark_dirty();
    }

    pub(crate) fn submission_mut(&mut self) -> &mut SubmissionMachine {
        self.dirty = true;
        &mut self.submission
    }

    pub(crate) fn is_submitting(&self) -> bool {
        self.submission.is_busy()
    }

    pub(crate) fn set_error(
        &mut self,
        source: ErrorSource,
        message: String,
        detail: Option<String>,
    ) {
        self.error = Some(VisibleError {
            source,
            message,
            detail,
        });
        self.mark_dirty();
    }

    /// A successful read clears the banner, unless the banner belongs to the
    /// other read request, which has not recovered yet.
    pub(crate) fn clear_error_after_poll(&mut self, source: ErrorSource) {
        let sibling = match source {
            ErrorSource::Credits => ErrorSource::Campaigns,
            ErrorSource::Campaigns => ErrorSource::Credits,
            ErrorSource::Submission => return,
        };
        if self
            .error
            .as_ref()
            .is_some_and(|error| error.source != sibling)
        {
            self.error = None;
            self.mark_dirty();
        }
    }

    pub(crate) fn clear_error_from(&mut self, source: ErrorSource) {
        if self
            .error
            .as_ref()
            .is_some_and(|error| error.source == source)
        {
            self.error = None;
            self.mark_dirty();
        }
    }

    pub(crate) fn notify(&mut self, level: NotificationLevel, text: impl Into<String>) {
        self.next_notification_id += 1;
        self.notifications.push(Notification {
            id: self.next_notification_id,
            level,
            text: text.into(),
        });
        self.mark_dirty();
    }

    pub(crate) fn has_notification(&self, level: NotificationLevel, text: &str) -> bool {
        self.notifications
            .iter()
            .any(|notification| notification.level == level && notification.text == text)
    }

    pub(crate) fn dismiss_notification(&mut self, id: NotificationId) {
        let before = self.notifications.len();
        self.notifications.retain(|notification| notification.id != id);
        if self.notifications.len() != before {
            self.mark_dirty();
        }
    }
}
