//! Voice cloning view
//!
//! Takes a reference recording and text, returns speech in the
//! reference voice.

use crate::ui::components::{card, playback_controls, show_notice};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};

pub struct VoiceCloneView<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> VoiceCloneView<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ui.heading(RichText::new("Voice Cloning").color(self.theme.text_primary));
        ui.label(
            RichText::new("Provide a reference recording, then type what it should say.")
                .color(self.theme.text_secondary),
        );
        ui.add_space(self.theme.spacing);

        let theme = self.theme.clone();
        let state = self.state;

        card(&theme).show(ui, |ui| {
            ui.label(RichText::new("Reference audio").color(theme.text_secondary));
            ui.horizontal(|ui| {
                let has_path = !state.voice_clone.reference_path.trim().is_empty();
                let edit = egui::TextEdit::singleline(&mut state.voice_clone.reference_path)
                    .hint_text("Path to audio file")
                    .desired_width(ui.available_width() - 70.0);
                let changed =
                    ui.add_enabled(!state.voice_clone.busy, edit).lost_focus() && has_path;

                if ui.button("Load").clicked() || changed {
                    state.load_reference_audio();
                }
            });

            match &state.voice_clone.reference {
                Some(payload) => {
                    ui.label(
                        RichText::new(format!(
                            "{} ({} KB)",
                            payload.file_name,
                            payload.bytes.len() / 1024
                        ))
                        .color(theme.success)
                        .small(),
                    );
                }
                None => {
                    ui.label(
                        RichText::new("No reference loaded")
                            .color(theme.text_muted)
                            .small(),
                    );
                }
            }

            ui.add_space(theme.spacing);

            ui.add_enabled(
                !state.voice_clone.busy,
                egui::TextEdit::multiline(&mut state.voice_clone.text)
                    .hint_text("Enter text to speak in the cloned voice...")
                    .desired_width(ui.available_width())
                    .desired_rows(4),
            );

            ui.add_space(theme.spacing);

            if let Some(notice) = state.voice_clone.notice.clone() {
                show_notice(ui, &theme, &notice);
                ui.add_space(theme.spacing_sm);
            }

            ui.horizontal(|ui| {
                let busy = state.voice_clone.busy;
                let label = if busy { "Cloning..." } else { "Clone Voice" };
                let button = egui::Button::new(RichText::new(label).color(egui::Color32::WHITE))
                    .min_size(Vec2::new(160.0, 36.0))
                    .rounding(theme.button_rounding)
                    .fill(theme.accent);

                if ui.add_enabled(!busy, button).clicked() {
                    state.clone_voice();
                }

                ui.add_space(theme.spacing_sm);
                playback_controls(ui, &theme, state);
            });
        });
    }
}
