//! Campaign tool core: pure state machine, input validation and view-model helpers.
mod effect;
mod msg;
mod state;
mod submission;
mod update;
mod validate;
mod view_model;

pub use effect::{Effect, SubmitRequest};
pub use msg::Msg;
pub use state::{
    AppState, Campaign, CampaignStatus, Credits, Draft, ErrorSource, Notification,
    NotificationId, NotificationLevel, SessionToken, VisibleError, POLL_ERROR_MESSAGE,
    POLL_INTERVAL,
};
pub use submission::{
    BeginOutcome, SubmissionMachine, SubmissionPhase, SubmitFailure, SubmitReceipt,
    GENERIC_SUBMIT_ERROR, SUBMIT_SUCCESS_MESSAGE,
};
pub use update::update;
pub use validate::{
    candidate_urls, invalid_urls, is_valid_url, validate_batch, ValidationError,
    MAX_URLS_PER_CAMPAIGN, MIN_URLS_PER_CAMPAIGN,
};
pub use view_model::{AppViewModel, CampaignRowView};
