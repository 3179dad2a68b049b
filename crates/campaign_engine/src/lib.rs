//! Campaign tool engine: HTTP client, poll timer, token persistence and effect execution.
mod api;
mod config;
mod engine;
mod persist;
mod scheduler;
mod token_store;
mod types;

pub use api::{CampaignApi, ReqwestCampaignApi};
pub use config::{ApiSettings, Environment, LOCAL_ORIGIN, PRODUCTION_ORIGIN};
pub use engine::EngineHandle;
pub use persist::{ensure_state_dir, AtomicFileWriter, PersistError};
pub use scheduler::PollScheduler;
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_FILENAME};
pub use types::{
    ApiError, CampaignRecord, CampaignsResponse, CreditsResponse, EngineEvent, FailureKind,
    SubmitPayload, SubmitResponse,
};
