//! Face comparison view
//!
//! Two image slots, a compare button, and the verdict with both
//! distance scores.

use crate::capability::face::similarity_percent;
use crate::pipeline::MediaResult;
use crate::ui::components::{card, show_notice};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};

pub struct FaceCompareView<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> FaceCompareView<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        ui.heading(RichText::new("Face Comparison").color(self.theme.text_primary));
        ui.label(
            RichText::new("Select two images to check whether they show the same person.")
                .color(self.theme.text_secondary),
        );
        ui.add_space(self.theme.spacing);

        let half = (ui.available_width() - self.theme.spacing) / 2.0;
        ui.horizontal(|ui| {
            self.show_slot(ui, 0, half);
            ui.add_space(self.theme.spacing);
            self.show_slot(ui, 1, half);
        });

        ui.add_space(self.theme.spacing);

        if let Some(notice) = self.state.face.notice.clone() {
            show_notice(ui, self.theme, &notice);
            ui.add_space(self.theme.spacing_sm);
        }

        self.show_compare_button(ui);

        if let Some(result) = self.state.face.result.clone() {
            ui.add_space(self.theme.spacing);
            self.show_result(ui, &result);
        }
    }

    fn show_slot(&mut self, ui: &mut egui::Ui, slot: usize, width: f32) {
        let theme = self.theme.clone();
        card(&theme).show(ui, |ui| {
            ui.set_width(width);
            ui.vertical(|ui| {
                ui.label(
                    RichText::new(format!("Image {}", slot + 1)).color(theme.text_secondary),
                );
                ui.add_space(theme.spacing_sm);

                let path = if slot == 0 {
                    &mut self.state.face.image1.path
                } else {
                    &mut self.state.face.image2.path
                };
                let has_path = !path.trim().is_empty();
                let edit = egui::TextEdit::singleline(path)
                    .hint_text("Path to image file")
                    .desired_width(ui.available_width());
                let changed = ui.add(edit).lost_focus() && has_path;

                let loaded = if slot == 0 {
                    &self.state.face.image1.payload
                } else {
                    &self.state.face.image2.payload
                };
                match loaded {
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
                        ui.label(RichText::new("No image loaded").color(theme.text_muted).small());
                    }
                }

                if ui.button("Load").clicked() || changed {
                    self.state.load_face_image(slot);
                }
            });
        });
    }

    fn show_compare_button(&mut self, ui: &mut egui::Ui) {
        let busy = self.state.face.busy;
        let label = if busy { "Comparing..." } else { "Compare Faces" };

        let button = egui::Button::new(RichText::new(label).color(egui::Color32::WHITE))
            .min_size(Vec2::new(160.0, 36.0))
            .rounding(self.theme.button_rounding)
            .fill(self.theme.accent);

        if ui.add_enabled(!busy, button).clicked() {
            self.state.compare_faces();
        }
    }

    fn show_result(&self, ui: &mut egui::Ui, result: &MediaResult) {
        let MediaResult::FaceCompare {
            matched,
            l2_score,
            cosine_score,
        } = result
        else {
            return;
        };

        card(self.theme).show(ui, |ui| {
            let (verdict, color) = if *matched {
                ("Same person", self.theme.success)
            } else {
                ("Different people", self.theme.error)
            };
            ui.heading(RichText::new(verdict).color(color));
            ui.add_space(self.theme.spacing_sm);

            ui.label(
                RichText::new(format!(
                    "Similarity: {}%",
                    similarity_percent(*cosine_score)
                ))
                .color(self.theme.text_primary),
            );
            ui.label(
                RichText::new(format!("L2 distance: {:.4}", l2_score))
                    .color(self.theme.text_secondary)
                    .small(),
            );
            ui.label(
                RichText::new(format!("Cosine similarity: {:.4}", cosine_score))
                    .color(self.theme.text_secondary)
                    .small(),
            );
        });
    }
}
