use std::sync::Once;

use campaign_core::{
    update, AppState, Campaign, CampaignStatus, Credits, Effect, ErrorSource, Msg, SessionToken,
    POLL_ERROR_MESSAGE, POLL_INTERVAL,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(campaign_logging::initialize_for_tests);
}

fn token(raw: &str) -> SessionToken {
    SessionToken::parse(raw).expect("non-empty token")
}

fn campaign(id: &str, indexed: u64) -> Campaign {
    Campaign {
        id: id.to_string(),
        name: format!("Campaign {id}"),
        total_urls: 10,
        indexed_count: indexed,
        status: CampaignStatus::Processing,
    }
}

fn mount(stored_token: Option<&str>) -> (AppState, Vec<Effect>) {
    update(
        AppState::new(),
        Msg::Mounted {
            stored_token: stored_token.map(ToOwned::to_owned),
        },
    )
}

#[test]
fn mount_without_token_makes_no_requests() {
    init_logging();
    let (state, effects) = mount(None);

    assert_eq!(effects, vec![Effect::CancelPolling]);
    assert_eq!(state.view().credits, Credits::Uninitialized);
    assert!(state.view().mounted);
}

#[test]
fn blank_stored_token_counts_as_absent() {
    init_logging();
    let (state, effects) = mount(Some("   "));

    assert_eq!(effects, vec![Effect::CancelPolling]);
    assert_eq!(state.token(), None);
}

#[test]
fn mount_with_token_schedules_and_polls_immediately() {
    init_logging();
    let (state, effects) = mount(Some("T1"));

    assert_eq!(
        effects,
        vec![
            Effect::SchedulePolling {
                token: token("T1"),
                period: POLL_INTERVAL
            },
            Effect::FetchCredits { token: token("T1") },
            Effect::FetchCampaigns { token: token("T1") },
        ]
    );
    assert_eq!(state.view().credits, Credits::Loading);
}

#[test]
fn poll_due_fetches_both_reads() {
    init_logging();
    let (state, _) = mount(Some("T1"));

    let (_state, effects) = update(state, Msg::PollDue { token: token("T1") });

    assert_eq!(
        effects,
        vec![
            Effect::FetchCredits { token: token("T1") },
            Effect::FetchCampaigns { token: token("T1") },
        ]
    );
}

#[test]
fn successful_reads_overwrite_state_independently() {
    init_logging();
    let (state, _) = mount(Some("T1"));

    let (state, _) = update(
        state,
        Msg::CampaignsLoaded {
            token: token("T1"),
            result: Ok(vec![campaign("a", 3)]),
        },
    );
    let (state, _) = update(
        state,
        Msg::CreditsLoaded {
            token: token("T1"),
            result: Err("connection refused".to_string()),
        },
    );
    let view = state.view();

    assert_eq!(view.campaigns.len(), 1);
    assert_eq!(view.campaigns[0].progress_percent, 30);
    assert_eq!(view.credits, Credits::Loading);
    let error = view.error.expect("credits failure shown");
    assert_eq!(error.source, ErrorSource::Credits);
    assert_eq!(error.message, POLL_ERROR_MESSAGE);
    assert_eq!(error.detail.as_deref(), Some("connection refused"));
}

#[test]
fn poll_failure_keeps_previous_campaigns() {
    init_logging();
    let (state, _) = mount(Some("T1"));
    let (state, _) = update(
        state,
        Msg::CampaignsLoaded {
            token: token("T1"),
            result: Ok(vec![campaign("a", 3), campaign("b", 10)]),
        },
    );
    let before = state.view().campaigns;

    let (state, effects) = update(
        state,
        Msg::CampaignsLoaded {
            token: token("T1"),
            result: Err("network error".to_string()),
        },
    );
    let view = state.view();

    assert!(effects.is_empty());
    assert_eq!(view.campaigns, before);
    assert!(view.error.is_some());
    assert_eq!(view.notifications.len(), 1);
}

#[test]
fn one_read_success_does_not_mask_the_other_failure() {
    init_logging();
    let (state, _) = mount(Some("T1"));
    let (state, _) = update(
        state,
        Msg::CampaignsLoaded {
            token: token("T1"),
            result: Err("timeout".to_string()),
        },
    );

    let (state, _) = update(
        state,
        Msg::CreditsLoaded {
            token: token("T1"),
            result: Ok(12),
        },
    );
    assert_eq!(
        state.view().error.map(|error| error.source),
        Some(ErrorSource::Campaigns)
    );

    let (state, _) = update(
        state,
        Msg::CampaignsLoaded {
            token: token("T1"),
            result: Ok(Vec::new()),
        },
    );
    assert_eq!(state.view().error, None);
    assert_eq!(state.view().credits, Credits::Known(12));
}

#[test]
fn token_change_reschedules_and_persists() {
    init_logging();
    let (state, _) = mount(Some("T1"));
    let (state, _) = update(
        state,
        Msg::CreditsLoaded {
            token: token("T1"),
            result: Ok(500),
        },
    );

    let (state, effects) = update(state, Msg::TokenChanged(" T2 ".to_string()));

    assert_eq!(state.token(), Some(&token("T2")));
    assert_eq!(state.view().credits, Credits::Loading);
    assert_eq!(
        effects,
        vec![
            Effect::PersistToken {
                token: Some(token("T2"))
            },
            Effect::SchedulePolling {
                token: token("T2"),
                period: POLL_INTERVAL
            },
            Effect::FetchCredits { token: token("T2") },
            Effect::FetchCampaigns { token: token("T2") },
        ]
    );
}

#[test]
fn unchanged_token_does_not_resubscribe() {
    init_logging();
    let (state, _) = mount(Some("T1"));

    let (_state, effects) = update(state, Msg::TokenChanged("T1".to_string()));

    assert!(effects.is_empty());
}

#[test]
fn clearing_token_cancels_polling() {
    init_logging();
    let (state, _) = mount(Some("T1"));
    let (state, _) = update(
        state,
        Msg::CreditsLoaded {
            token: token("T1"),
            result: Ok(5),
        },
    );

    let (state, effects) = update(state, Msg::TokenChanged(String::new()));

    assert_eq!(
        effects,
        vec![Effect::PersistToken { token: None }, Effect::CancelPolling]
    );
    assert_eq!(state.view().credits, Credits::Uninitialized);
}

#[test]
fn responses_for_superseded_token_are_discarded() {
    init_logging();
    let (state, _) = mount(Some("T1"));
    let (state, _) = update(state, Msg::TokenChanged("T2".to_string()));

    let (state, _) = update(
        state,
        Msg::CreditsLoaded {
            token: token("T1"),
            result: Ok(1000),
        },
    );
    let (state, _) = update(
        state,
        Msg::CampaignsLoaded {
            token: token("T1"),
            result: Ok(vec![campaign("old", 1)]),
        },
    );
    let (state, _) = update(
        state,
        Msg::CreditsLoaded {
            token: token("T1"),
            result: Err("late failure".to_string()),
        },
    );
    let view = state.view();

    assert_eq!(view.credits, Credits::Loading);
    assert!(view.campaigns.is_empty());
    assert_eq!(view.error, None);
}

#[test]
fn stale_timer_tick_is_ignored() {
    init_logging();
    let (state, _) = mount(Some("T1"));
    let (state, _) = update(state, Msg::TokenChanged("T2".to_string()));

    let (_state, effects) = update(state, Msg::PollDue { token: token("T1") });

    assert!(effects.is_empty());
}

#[test]
fn unmount_cancels_and_silences_polling() {
    init_logging();
    let (state, _) = mount(Some("T1"));

    let (state, effects) = update(state, Msg::Unmounted);
    assert_eq!(effects, vec![Effect::CancelPolling]);

    let (state, effects) = update(state, Msg::PollDue { token: token("T1") });
    assert!(effects.is_empty());

    let (_state, effects) = update(state, Msg::Unmounted);
    assert!(effects.is_empty());
}

#[test]
fn failed_read_after_token_change_does_not_show_old_balance() {
    init_logging();
    let (state, _) = mount(Some("T1"));
    let (state, _) = update(
        state,
        Msg::CreditsLoaded {
            token: token("T1"),
            result: Ok(500),
        },
    );
    let (state, _) = update(state, Msg::TokenChanged("T2".to_string()));

    let (state, _) = update(
        state,
        Msg::CreditsLoaded {
            token: token("T2"),
            result: Err("401 Unauthorized".to_string()),
        },
    );

    assert_eq!(state.view().credits, Credits::Loading);
}

#[test]
fn repeated_poll_failures_share_one_toast() {
    init_logging();
    let (state, _) = mount(Some("T1"));

    let (state, _) = update(
        state,
        Msg::CreditsLoaded {
            token: token("T1"),
            result: Err("timeout".to_string()),
        },
    );
    let (state, _) = update(
        state,
        Msg::CampaignsLoaded {
            token: token("T1"),
            result: Err("timeout".to_string()),
        },
    );
    let (state, _) = update(state, Msg::PollDue { token: token("T1") });
    let (state, _) = update(
        state,
        Msg::CreditsLoaded {
            token: token("T1"),
            result: Err("timeout".to_string()),
        },
    );
    let view = state.view();

    assert_eq!(view.notifications.len(), 1);
    assert_eq!(view.notifications[0].text, POLL_ERROR_MESSAGE);

    let id = view.notifications[0].id;
    let (state, _) = update(state, Msg::DismissNotification { id });
    let (state, _) = update(
        state,
        Msg::CampaignsLoaded {
            token: token("T1"),
            result: Err("timeout".to_string()),
        },
    );
    assert_eq!(state.view().notifications.len(), 1);
}
