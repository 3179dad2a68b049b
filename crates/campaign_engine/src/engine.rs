use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use campaign_logging::{campaign_debug, campaign_info, campaign_warn};

use crate::{
    ApiError, ApiSettings, CampaignApi, EngineEvent, PollScheduler, ReqwestCampaignApi,
    SubmitPayload,
};

enum EngineCommand {
    FetchCredits { token: String },
    FetchCampaigns { token: String },
    Submit { payload: SubmitPayload },
    SchedulePolling { token: String, period: Duration },
    CancelPolling,
    Shutdown,
}

/// Runs requests and the poll timer on a background tokio runtime.
/// Results are picked up with [`EngineHandle::try_recv`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let api = ReqwestCampaignApi::new(settings)?;
        campaign_info!("Campaign service at {}", api.base_url());
        Ok(Self::with_api(Arc::new(api)))
    }

    pub fn with_api(api: Arc<dyn CampaignApi>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let mut scheduler = PollScheduler::new();
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::SchedulePolling { token, period } => {
                        campaign_debug!("Polling every {:?}", period);
                        let _guard = runtime.enter();
                        let event_tx = event_tx.clone();
                        scheduler.schedule(period, move || {
                            let _ = event_tx.send(EngineEvent::PollDue {
                                token: token.clone(),
                            });
                        });
                    }
                    EngineCommand::CancelPolling => {
                        if scheduler.is_active() {
                            campaign_debug!("Polling cancelled");
                        }
                        scheduler.cancel();
                    }
                    EngineCommand::Shutdown => break,
                    request => {
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            handle_request(api.as_ref(), request, event_tx).await;
                        });
                    }
                }
            }
            scheduler.cancel();
            campaign_info!("Engine stopped");
        });

        Self { cmd_tx, event_rx }
    }

    pub fn fetch_credits(&self, token: impl Into<String>) {
        self.send(EngineCommand::FetchCredits {
            token: token.into(),
        });
    }

    pub fn fetch_campaigns(&self, token: impl Into<String>) {
        self.send(EngineCommand::FetchCampaigns {
            token: token.into(),
        });
    }

    pub fn submit(&self, payload: SubmitPayload) {
        self.send(EngineCommand::Submit { payload });
    }

    /// Replaces any running poll timer.
    pub fn schedule_polling(&self, token: impl Into<String>, period: Duration) {
        self.send(EngineCommand::SchedulePolling {
            token: token.into(),
            period,
        });
    }

    pub fn cancel_polling(&self) {
        self.send(EngineCommand::CancelPolling);
    }

    pub fn shutdown(&self) {
        self.send(EngineCommand::Shutdown);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            campaign_warn!("Engine thread is gone; command dropped");
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
    }
}

async fn handle_request(
    api: &dyn CampaignApi,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::FetchCredits { token } => {
            let result = api.credits(&token).await;
            if let Err(err) = &result {
                campaign_warn!("Credits fetch failed: {}", err);
            }
            EngineEvent::CreditsFetched { token, result }
        }
        EngineCommand::FetchCampaigns { token } => {
            let result = api.campaigns(&token).await;
            match &result {
                Ok(campaigns) => campaign_debug!("Fetched {} campaigns", campaigns.len()),
                Err(err) => campaign_warn!("Campaign fetch failed: {}", err),
            }
            EngineEvent::CampaignsFetched { token, result }
        }
        EngineCommand::Submit { payload } => {
            let result = api.submit(&payload).await;
            if result.is_ok() {
                campaign_info!("Submitted campaign with {} urls", payload.urls.len());
            }
            EngineEvent::SubmitFinished { result }
        }
        EngineCommand::SchedulePolling { .. }
        | EngineCommand::CancelPolling
        | EngineCommand::Shutdown => return,
    };
    let _ = event_tx.send(event);
}
