use std::sync::Arc;

use campaign_core::{
    Campaign, CampaignStatus, Effect, Msg, SessionToken, SubmitFailure, SubmitReceipt,
    SubmitRequest,
};
use campaign_engine::{
    ApiError, CampaignRecord, EngineEvent, EngineHandle, SubmitPayload, SubmitResponse,
    TokenStore,
};
use campaign_logging::{campaign_debug, campaign_error, campaign_info};

/// Executes core effects against the engine and the token store, and turns
/// engine events back into core messages.
pub struct EffectRunner {
    engine: EngineHandle,
    store: Arc<dyn TokenStore>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, store: Arc<dyn TokenStore>) -> Self {
        Self { engine, store }
    }

    pub fn stored_token(&self) -> Option<String> {
        self.store.load()
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SchedulePolling { token, period } => {
                    self.engine.schedule_polling(token.as_str(), period);
                }
                Effect::CancelPolling => self.engine.cancel_polling(),
                Effect::FetchCredits { token } => self.engine.fetch_credits(token.as_str()),
                Effect::FetchCampaigns { token } => self.engine.fetch_campaigns(token.as_str()),
                Effect::Submit(request) => {
                    campaign_info!(
                        "Submit campaign name_len={} urls={}",
                        request.campaign_name.len(),
                        request.urls.len()
                    );
                    self.engine.submit(to_payload(request));
                }
                Effect::PersistToken { token } => {
                    let token = token.as_ref().map(SessionToken::as_str);
                    match self.store.save(token) {
                        Ok(()) => campaign_debug!("Session token saved (present={})", token.is_some()),
                        Err(err) => campaign_error!("Failed to save session token: {}", err),
                    }
                }
            }
        }
    }

    /// Drains every finished engine event without blocking.
    pub fn poll_messages(&self) -> Vec<Msg> {
        let mut messages = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            if let Some(msg) = map_event(event) {
                messages.push(msg);
            }
        }
        messages
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }
}

fn to_payload(request: SubmitRequest) -> SubmitPayload {
    SubmitPayload {
        campaign_name: request.campaign_name,
        urls: request.urls,
        client_token: request
            .client_token
            .map(|token| token.as_str().to_string())
            .unwrap_or_default(),
    }
}

/// Events tagged with an empty token cannot belong to any session and are dropped.
pub(crate) fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::PollDue { token } => {
            SessionToken::parse(&token).map(|token| Msg::PollDue { token })
        }
        EngineEvent::CreditsFetched { token, result } => {
            SessionToken::parse(&token).map(|token| Msg::CreditsLoaded {
                token,
                result: result.map_err(|err| err.to_string()),
            })
        }
        EngineEvent::CampaignsFetched { token, result } => {
            SessionToken::parse(&token).map(|token| Msg::CampaignsLoaded {
                token,
                result: result
                    .map(|records| records.into_iter().map(map_campaign).collect())
                    .map_err(|err| err.to_string()),
            })
        }
        EngineEvent::SubmitFinished { result } => Some(Msg::SubmitCompleted {
            result: result.map(map_receipt).map_err(map_failure),
        }),
    }
}

fn map_campaign(record: CampaignRecord) -> Campaign {
    Campaign {
        id: record.id,
        name: record.name,
        total_urls: record.total_urls,
        indexed_count: record.indexed_count,
        status: CampaignStatus::from_wire(&record.status),
    }
}

fn map_receipt(response: SubmitResponse) -> SubmitReceipt {
    SubmitReceipt {
        remaining_credits: response.remaining_credits,
        new_token: response.new_campaign_token,
        message: response.message,
    }
}

fn map_failure(err: ApiError) -> SubmitFailure {
    SubmitFailure {
        message: err.server_message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_engine::FailureKind;

    fn api_error(server_message: Option<&str>) -> ApiError {
        ApiError {
            kind: FailureKind::HttpStatus(400),
            message: "400 Bad Request".to_string(),
            server_message: server_message.map(ToOwned::to_owned),
        }
    }

    #[test]
    fn submit_failure_keeps_only_server_text() {
        let msg = map_event(EngineEvent::SubmitFinished {
            result: Err(api_error(Some("Campaign name required"))),
        });

        assert_eq!(
            msg,
            Some(Msg::SubmitCompleted {
                result: Err(SubmitFailure {
                    message: Some("Campaign name required".to_string()),
                }),
            })
        );
    }

    #[test]
    fn campaigns_map_wire_status() {
        let msg = map_event(EngineEvent::CampaignsFetched {
            token: "T1".to_string(),
            result: Ok(vec![CampaignRecord {
                id: "c1".to_string(),
                name: "One".to_string(),
                total_urls: 4,
                indexed_count: 4,
                status: "completed".to_string(),
            }]),
        });

        match msg {
            Some(Msg::CampaignsLoaded {
                token,
                result: Ok(campaigns),
            }) => {
                assert_eq!(token.as_str(), "T1");
                assert_eq!(campaigns[0].status, CampaignStatus::Complete);
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn events_for_empty_token_are_dropped() {
        assert_eq!(
            map_event(EngineEvent::PollDue {
                token: String::new()
            }),
            None
        );
    }

    #[test]
    fn missing_token_is_sent_as_empty_string() {
        let payload = to_payload(SubmitRequest {
            campaign_name: "New".to_string(),
            urls: vec!["https://a.com".to_string()],
            client_token: None,
        });

        assert_eq!(payload.client_token, "");
    }
}
