use campaign_core::{
    AppViewModel, CampaignRowView, CampaignStatus, Credits, Msg, NotificationLevel,
    SubmissionPhase, MAX_URLS_PER_CAMPAIGN,
};
use egui::{Color32, RichText};

use super::constants::*;

const ERROR_COLOR: Color32 = Color32::from_rgb(220, 80, 80);
const SUCCESS_COLOR: Color32 = Color32::from_rgb(80, 180, 110);
const MUTED_COLOR: Color32 = Color32::from_rgb(150, 150, 150);

/// Draws one frame of the tool and returns the messages the user triggered.
pub fn render(
    ctx: &egui::Context,
    view: &AppViewModel,
    token_input: &mut String,
    last_refreshed: Option<&str>,
) -> Vec<Msg> {
    let mut msgs = Vec::new();

    egui::TopBottomPanel::top("header").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading(WINDOW_TITLE);
            ui.separator();
            ui.label(RichText::new(format_credits(view.credits)).strong());
            if let Some(updated) = last_refreshed {
                ui.label(RichText::new(format!("updated {updated}")).color(MUTED_COLOR));
            }
        });
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(token_input)
                    .id(egui::Id::new(TOKEN_INPUT_ID))
                    .hint_text(HINT_TOKEN)
                    .desired_width(420.0),
            );
            let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let clicked = ui.button(USE_TOKEN_LABEL).clicked();
            if entered || clicked {
                msgs.push(Msg::TokenChanged(token_input.clone()));
            }
        });
        ui.add_space(4.0);
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        if let Some(error) = &view.error {
            render_error_banner(ui, &error.message, error.detail.as_deref());
            ui.add_space(6.0);
        }

        render_form(ui, view, &mut msgs);
        ui.add_space(12.0);
        ui.separator();
        render_campaigns(ui, &view.campaigns);
    });

    render_toasts(ctx, view);
    msgs
}

fn render_error_banner(ui: &mut egui::Ui, message: &str, detail: Option<&str>) {
    egui::Frame::group(ui.style())
        .stroke(egui::Stroke::new(1.0, ERROR_COLOR))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(message).color(ERROR_COLOR));
            if let Some(detail) = detail {
                ui.label(RichText::new(detail).small().color(MUTED_COLOR));
            }
        });
}

fn render_form(ui: &mut egui::Ui, view: &AppViewModel, msgs: &mut Vec<Msg>) {
    ui.label(RichText::new("New campaign").strong());

    let mut name = view.campaign_name.clone();
    let response = ui.add(
        egui::TextEdit::singleline(&mut name)
            .hint_text(HINT_CAMPAIGN_NAME)
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        msgs.push(Msg::CampaignNameChanged(name));
    }

    let mut urls = view.urls_text.clone();
    let response = ui.add(
        egui::TextEdit::multiline(&mut urls)
            .hint_text(HINT_URLS)
            .desired_rows(URL_BOX_ROWS)
            .desired_width(f32::INFINITY)
            .code_editor(),
    );
    if response.changed() {
        msgs.push(Msg::UrlsChanged(urls));
    }

    ui.horizontal(|ui| {
        let count_text = format!("{} / {} URLs", view.candidate_count, MAX_URLS_PER_CAMPAIGN);
        let count_color = if view.candidate_count > MAX_URLS_PER_CAMPAIGN {
            ERROR_COLOR
        } else {
            MUTED_COLOR
        };
        ui.label(RichText::new(count_text).color(count_color));

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let label = if view.phase == SubmissionPhase::Submitting {
                "Submitting..."
            } else {
                "Submit"
            };
            if ui
                .add_enabled(view.submit_enabled, egui::Button::new(label))
                .clicked()
            {
                msgs.push(Msg::SubmitClicked);
            }
            if view.phase == SubmissionPhase::Submitting {
                ui.spinner();
            }
        });
    });

    if !view.invalid_urls.is_empty() {
        ui.label(
            RichText::new(format!("Invalid URLs ({}):", view.invalid_urls.len()))
                .color(ERROR_COLOR),
        );
        egui::ScrollArea::vertical()
            .id_salt("invalid_urls")
            .max_height(INVALID_LIST_HEIGHT)
            .show(ui, |ui| {
                for url in &view.invalid_urls {
                    ui.label(RichText::new(url).monospace().color(ERROR_COLOR));
                }
            });
    }
}

fn render_campaigns(ui: &mut egui::Ui, campaigns: &[CampaignRowView]) {
    ui.label(RichText::new("Campaign history").strong());
    if campaigns.is_empty() {
        ui.label(RichText::new("No campaigns yet.").color(MUTED_COLOR));
        return;
    }

    egui::ScrollArea::vertical()
        .id_salt("campaigns")
        .show(ui, |ui| {
            egui::Grid::new("campaign_table")
                .num_columns(3)
                .striped(true)
                .spacing([16.0, 6.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Name").strong());
                    ui.label(RichText::new("Status").strong());
                    ui.label(RichText::new("Indexed").strong());
                    ui.end_row();

                    for row in campaigns {
                        ui.label(display_name(row));
                        ui.label(RichText::new(row.status.label()).color(status_color(&row.status)));
                        ui.add(
                            egui::ProgressBar::new(f32::from(row.progress_percent) / 100.0)
                                .desired_width(PROGRESS_BAR_WIDTH)
                                .text(row.progress_label()),
                        );
                        ui.end_row();
                    }
                });
        });
}

fn render_toasts(ctx: &egui::Context, view: &AppViewModel) {
    if view.notifications.is_empty() {
        return;
    }
    egui::Area::new(egui::Id::new("toasts"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
        .show(ctx, |ui| {
            for notification in &view.notifications {
                let color = match notification.level {
                    NotificationLevel::Success => SUCCESS_COLOR,
                    NotificationLevel::Failure => ERROR_COLOR,
                };
                egui::Frame::popup(ui.style())
                    .stroke(egui::Stroke::new(1.0, color))
                    .show(ui, |ui| {
                        ui.label(RichText::new(&notification.text).color(color));
                    });
                ui.add_space(4.0);
            }
        });
}

pub(crate) fn format_credits(credits: Credits) -> String {
    match credits {
        Credits::Uninitialized => "Credits: —".to_string(),
        Credits::Loading => "Credits: …".to_string(),
        Credits::Known(value) => format!("Credits: {}", format_with_commas(value)),
    }
}

fn display_name(row: &CampaignRowView) -> String {
    if row.name.trim().is_empty() {
        format!("(unnamed {})", row.id)
    } else {
        row.name.clone()
    }
}

fn status_color(status: &CampaignStatus) -> Color32 {
    match status {
        CampaignStatus::Complete => SUCCESS_COLOR,
        CampaignStatus::Failed => ERROR_COLOR,
        CampaignStatus::Pending | CampaignStatus::Processing | CampaignStatus::Other(_) => {
            MUTED_COLOR
        }
    }
}

fn format_with_commas(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0 {
        out.push('-');
    }
    out.chars().rev().collect()
}
