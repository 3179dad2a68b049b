use crate::{Campaign, NotificationId, SessionToken, SubmitFailure, SubmitReceipt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The tool was opened; carries whatever the token store had saved.
    Mounted { stored_token: Option<String> },
    /// The tool is being torn down.
    Unmounted,
    /// User committed a new value in the token field.
    TokenChanged(String),
    /// User edited the campaign name.
    CampaignNameChanged(String),
    /// User edited the URL box.
    UrlsChanged(String),
    /// User clicked Submit.
    SubmitClicked,
    /// The poll timer for `token` fired.
    PollDue { token: SessionToken },
    /// Credits read finished for `token`. The error carries a diagnostic detail.
    CreditsLoaded {
        token: SessionToken,
        result: Result<i64, String>,
    },
    /// Campaign list read finished for `token`.
    CampaignsLoaded {
        token: SessionToken,
        result: Result<Vec<Campaign>, String>,
    },
    /// The submission request finished.
    SubmitCompleted {
        result: Result<SubmitReceipt, SubmitFailure>,
    },
    /// A transient notification reached its time-to-live.
    DismissNotification { id: NotificationId },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
