use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context as _;
use campaign_core::{update, AppState, Msg, NotificationId};
use campaign_engine::{ApiSettings, EngineHandle};
use campaign_logging::{campaign_info, LogDestination};
use chrono::Local;

use super::effects::EffectRunner;
use super::persistence;
use super::ui;
use super::ui::constants::{REPAINT_INTERVAL, TOAST_TTL, WINDOW_SIZE, WINDOW_TITLE};

pub fn run_app() -> anyhow::Result<()> {
    campaign_logging::initialize(LogDestination::Both, log::LevelFilter::Info);

    let engine =
        EngineHandle::new(ApiSettings::default()).context("campaign service setup failed")?;
    let store = Arc::new(persistence::open_token_store());
    let runner = EffectRunner::new(engine, store);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(WINDOW_SIZE),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(CampaignToolApp::new(runner)))),
    )
    .map_err(|err| anyhow::anyhow!("{err}"))
    .context("campaign tool window failed")
}

struct CampaignToolApp {
    state: AppState,
    runner: EffectRunner,
    token_input: String,
    synced_token: Option<String>,
    toast_seen: HashMap<NotificationId, Instant>,
    last_refreshed: Option<String>,
}

impl CampaignToolApp {
    fn new(runner: EffectRunner) -> Self {
        let stored_token = runner.stored_token();
        let mut app = Self {
            state: AppState::new(),
            runner,
            token_input: String::new(),
            synced_token: None,
            toast_seen: HashMap::new(),
            last_refreshed: None,
        };
        app.dispatch(Msg::Mounted { stored_token });
        app
    }

    fn dispatch(&mut self, msg: Msg) {
        let refreshed = matches!(
            msg,
            Msg::CreditsLoaded { result: Ok(_), .. } | Msg::CampaignsLoaded { result: Ok(_), .. }
        );
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects);
        if refreshed {
            self.last_refreshed = Some(Local::now().format("%H:%M:%S").to_string());
        }
    }

    fn process_pending_messages(&mut self) {
        for msg in self.runner.poll_messages() {
            self.dispatch(msg);
        }
    }

    /// Keeps the token field in step with token rotations from the service.
    fn sync_token_input(&mut self) {
        let current = self.state.token().map(|token| token.as_str().to_string());
        if current != self.synced_token {
            self.token_input = current.clone().unwrap_or_default();
            self.synced_token = current;
        }
    }

    fn expire_toasts(&mut self) {
        let now = Instant::now();
        let live: Vec<NotificationId> = self
            .state
            .view()
            .notifications
            .iter()
            .map(|notification| notification.id)
            .collect();
        self.toast_seen.retain(|id, _| live.contains(id));

        let mut expired = Vec::new();
        for id in live {
            let first_seen = *self.toast_seen.entry(id).or_insert(now);
            if now.duration_since(first_seen) >= TOAST_TTL {
                expired.push(id);
            }
        }
        for id in expired {
            self.dispatch(Msg::DismissNotification { id });
        }
    }
}

impl eframe::App for CampaignToolApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_pending_messages();
        self.expire_toasts();
        self.sync_token_input();

        self.state.consume_dirty();
        let view = self.state.view();
        let msgs = ui::render::render(
            ctx,
            &view,
            &mut self.token_input,
            self.last_refreshed.as_deref(),
        );
        for msg in msgs {
            self.dispatch(msg);
        }

        if self.state.consume_dirty() {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(REPAINT_INTERVAL);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        campaign_info!("Campaign tool closing");
        self.dispatch(Msg::Unmounted);
        self.runner.shutdown();
    }
}
