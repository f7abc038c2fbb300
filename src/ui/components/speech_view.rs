//! Text-to-speech view

use crate::capability::speech::VOICES;
use crate::ui::components::{card, playback_controls, show_notice};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};

pub struct SpeechView<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> SpeechView<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ui.heading(RichText::new("Text to Speech").color(self.theme.text_primary));
        ui.label(
            RichText::new("Type some text and listen to it spoken aloud.")
                .color(self.theme.text_secondary),
        );
        ui.add_space(self.theme.spacing);

        let theme = self.theme.clone();
        let state = self.state;

        card(&theme).show(ui, |ui| {
            ui.add_enabled(
                !state.speech.busy,
                egui::TextEdit::multiline(&mut state.speech.text)
                    .hint_text("Enter text to convert to speech...")
                    .desired_width(ui.available_width())
                    .desired_rows(5),
            );

            ui.add_space(theme.spacing_sm);

            ui.horizontal(|ui| {
                ui.label(RichText::new("Voice:").color(theme.text_secondary));
                let selected_label = VOICES
                    .iter()
                    .find(|(id, _)| *id == state.speech.voice)
                    .map(|(_, label)| *label)
                    .unwrap_or(state.speech.voice.as_str());

                egui::ComboBox::from_id_salt("tts_voice")
                    .selected_text(selected_label)
                    .show_ui(ui, |ui| {
                        for (id, label) in VOICES {
                            ui.selectable_value(
                                &mut state.speech.voice,
                                id.to_string(),
                                *label,
                            );
                        }
                    });
            });

            ui.add_space(theme.spacing);

            if let Some(notice) = state.speech.notice.clone() {
                show_notice(ui, &theme, &notice);
                ui.add_space(theme.spacing_sm);
            }

            ui.horizontal(|ui| {
                let busy = state.speech.busy;
                let label = if busy { "Generating..." } else { "Generate Speech" };
                let button = egui::Button::new(RichText::new(label).color(egui::Color32::WHITE))
                    .min_size(Vec2::new(160.0, 36.0))
                    .rounding(theme.button_rounding)
                    .fill(theme.accent);

                if ui.add_enabled(!busy, button).clicked() {
                    state.synthesize();
                }

                ui.add_space(theme.spacing_sm);
                playback_controls(ui, &theme, state);
            });
        });
    }
}
