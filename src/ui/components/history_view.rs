//! Request history view

use crate::ui::components::{card, show_notice};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText};

pub struct HistoryView<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> HistoryView<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(RichText::new("History").color(self.theme.text_primary));
            if ui
                .add_enabled(!self.state.history.busy, egui::Button::new("⟳ Refresh"))
                .clicked()
            {
                self.state.fetch_history();
            }
        });
        ui.add_space(self.theme.spacing);

        if let Some(notice) = self.state.history.notice.clone() {
            show_notice(ui, self.theme, &notice);
            ui.add_space(self.theme.spacing_sm);
        }

        if self.state.history.busy {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new("Loading history...").color(self.theme.text_muted));
            });
            return;
        }

        if self.state.history.entries.is_empty() {
            ui.label(
                RichText::new("No requests yet. Try comparing faces or generating speech.")
                    .color(self.theme.text_muted),
            );
            return;
        }

        let theme = self.theme.clone();
        let entries = self.state.history.entries.clone();
        egui::ScrollArea::vertical().show(ui, |ui| {
            for entry in &entries {
                card(&theme).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(service_label(&entry.service_type))
                                .color(theme.accent)
                                .strong(),
                        );
                        ui.label(
                            RichText::new(&entry.timestamp)
                                .color(theme.text_muted)
                                .small(),
                        );
                    });

                    if let Some(summary) = summarize(&entry.result_data) {
                        ui.label(RichText::new(summary).color(theme.text_secondary).small());
                    }
                });
                ui.add_space(theme.spacing_sm);
            }
        });
    }
}

fn service_label(service_type: &str) -> &str {
    match service_type {
        "face_detection" => "Face Comparison",
        "tts" => "Text to Speech",
        "voice_clone" => "Voice Cloning",
        other => other,
    }
}

/// Render a short line from whatever the backend stored for this entry
fn summarize(data: &serde_json::Value) -> Option<String> {
    let object = data.as_object()?;
    if object.is_empty() {
        return None;
    }

    if let Some(matched) = object.get("match").and_then(|v| v.as_bool()) {
        return Some(if matched {
            "Result: same person".to_string()
        } else {
            "Result: different people".to_string()
        });
    }

    if let Some(text) = object.get("text").and_then(|v| v.as_str()) {
        let mut short: String = text.chars().take(80).collect();
        if text.chars().count() > 80 {
            short.push_str("...");
        }
        return Some(format!("\"{}\"", short));
    }

    None
}
