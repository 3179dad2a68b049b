use crate::submission::BeginOutcome;
use crate::{
    AppState, Credits, Effect, ErrorSource, Msg, NotificationLevel, SessionToken, SubmitRequest,
    POLL_ERROR_MESSAGE, POLL_INTERVAL, SUBMIT_SUCCESS_MESSAGE,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Mounted { stored_token } => {
            state.set_mounted(true);
            state.set_token(stored_token.as_deref().and_then(SessionToken::parse));
            subscribe_polling(&mut state)
        }
        Msg::Unmounted => {
            if !state.is_mounted() {
                return (state, Vec::new());
            }
            state.set_mounted(false);
            vec![Effect::CancelPolling]
        }
        Msg::TokenChanged(raw) => {
            let token = SessionToken::parse(&raw);
            if state.token() == token.as_ref() {
                return (state, Vec::new());
            }
            state.set_token(token.clone());
            // The previous balance belongs to the old session.
            state.set_credits(if token.is_some() {
                Credits::Loading
            } else {
                Credits::Uninitialized
            });
            let mut effects = vec![Effect::PersistToken { token }];
            if state.is_mounted() {
                effects.extend(subscribe_polling(&mut state));
            }
            effects
        }
        Msg::CampaignNameChanged(name) => {
            state.set_campaign_name(name);
            Vec::new()
        }
        Msg::UrlsChanged(text) => {
            state.set_urls_text(text);
            Vec::new()
        }
        Msg::SubmitClicked => {
            let urls_text = state.draft().urls_text.clone();
            match state.submission_mut().begin(&urls_text) {
                BeginOutcome::Busy => Vec::new(),
                BeginOutcome::Rejected(err) => {
                    let message = err.to_string();
                    state.set_error(ErrorSource::Submission, message.clone(), None);
                    state.notify(NotificationLevel::Failure, message);
                    Vec::new()
                }
                BeginOutcome::Accepted(urls) => {
                    state.clear_error_from(ErrorSource::Submission);
                    vec![Effect::Submit(SubmitRequest {
                        campaign_name: state.draft().campaign_name.trim().to_string(),
                        urls,
                        client_token: state.token().cloned(),
                    })]
                }
            }
        }
        Msg::SubmitCompleted { result } => {
            if !state.is_submitting() {
                return (state, Vec::new());
            }
            match result {
                Ok(receipt) => {
                    state.submission_mut().finish(true);
                    state.clear_draft();
                    state.clear_error_from(ErrorSource::Submission);

                    let rotated = receipt
                        .new_token
                        .as_deref()
                        .and_then(SessionToken::parse)
                        .filter(|token| state.token() != Some(token));
                    if let Some(token) = &rotated {
                        state.set_token(Some(token.clone()));
                    }
                    // Without a session there is no balance to show.
                    if state.token().is_some() {
                        state.set_credits(Credits::Known(receipt.remaining_credits));
                    }

                    let mut effects = Vec::new();
                    match rotated {
                        Some(token) => {
                            effects.push(Effect::PersistToken { token: Some(token) });
                            if state.is_mounted() {
                                effects.extend(subscribe_polling(&mut state));
                            }
                        }
                        None => effects.extend(refresh_now(&state)),
                    }

                    let text = receipt
                        .message
                        .filter(|message| !message.trim().is_empty())
                        .unwrap_or_else(|| SUBMIT_SUCCESS_MESSAGE.to_string());
                    state.notify(NotificationLevel::Success, text);
                    state.submission_mut().settle();
                    effects
                }
                Err(failure) => {
                    state.submission_mut().finish(false);
                    let message = failure.user_message();
                    state.set_error(ErrorSource::Submission, message.clone(), None);
                    state.notify(NotificationLevel::Failure, message);
                    state.submission_mut().settle();
                    Vec::new()
                }
            }
        }
        Msg::PollDue { token } => {
            if state.is_mounted() && state.is_current_token(&token) {
                fetch_both(token)
            } else {
                Vec::new()
            }
        }
        Msg::CreditsLoaded { token, result } => {
            if !state.is_current_token(&token) {
                return (state, Vec::new());
            }
            match result {
                Ok(remaining) => {
                    state.set_credits(Credits::Known(remaining));
                    state.clear_error_after_poll(ErrorSource::Credits);
                }
                Err(detail) => poll_failed(&mut state, ErrorSource::Credits, detail),
            }
            Vec::new()
        }
        Msg::CampaignsLoaded { token, result } => {
            if !state.is_current_token(&token) {
                return (state, Vec::new());
            }
            match result {
                Ok(campaigns) => {
                    state.set_campaigns(campaigns);
                    state.clear_error_after_poll(ErrorSource::Campaigns);
                }
                Err(detail) => poll_failed(&mut state, ErrorSource::Campaigns, detail),
            }
            Vec::new()
        }
        Msg::DismissNotification { id } => {
            state.dismiss_notification(id);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Cancel-and-reschedule for the current token, polling immediately when one is set.
fn subscribe_polling(state: &mut AppState) -> Vec<Effect> {
    match state.token().cloned() {
        None => {
            state.set_credits(Credits::Uninitialized);
            vec![Effect::CancelPolling]
        }
        Some(token) => {
            if state.credits() == Credits::Uninitialized {
                state.set_credits(Credits::Loading);
            }
            let mut effects = vec![Effect::SchedulePolling {
                token: token.clone(),
                period: POLL_INTERVAL,
            }];
            effects.extend(fetch_both(token));
            effects
        }
    }
}

fn refresh_now(state: &AppState) -> Vec<Effect> {
    match state.token() {
        Some(token) if state.is_mounted() => fetch_both(token.clone()),
        _ => Vec::new(),
    }
}

fn fetch_both(token: SessionToken) -> Vec<Effect> {
    vec![
        Effect::FetchCredits {
            token: token.clone(),
        },
        Effect::FetchCampaigns { token },
    ]
}

fn poll_failed(state: &mut AppState, source: ErrorSource, detail: String) {
    state.set_error(source, POLL_ERROR_MESSAGE.to_string(), Some(detail));
    if !state.has_notification(NotificationLevel::Failure, POLL_ERROR_MESSAGE) {
        state.notify(NotificationLevel::Failure, POLL_ERROR_MESSAGE);
    }
}
