//! Contact form

use crate::ui::components::{card, show_notice};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};

pub struct ContactView<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> ContactView<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let theme = self.theme.clone();
        let state = self.state;

        ui.vertical_centered(|ui| {
            ui.set_max_width(420.0);
            ui.add_space(theme.spacing * 2.0);

            ui.heading(RichText::new("Contact Us").color(theme.text_primary));
            ui.label(
                RichText::new("Questions or feedback? Send us a message.")
                    .color(theme.text_secondary),
            );
            ui.add_space(theme.spacing);

            card(&theme).show(ui, |ui| {
                let busy = state.contact.busy;
                let width = ui.available_width();

                ui.add_enabled(
                    !busy,
                    egui::TextEdit::singleline(&mut state.contact.name)
                        .hint_text("Your name")
                        .desired_width(width),
                );
                ui.add_space(theme.spacing_sm);

                ui.add_enabled(
                    !busy,
                    egui::TextEdit::singleline(&mut state.contact.email)
                        .hint_text("Your email")
                        .desired_width(width),
                );
                ui.add_space(theme.spacing_sm);

                ui.add_enabled(
                    !busy,
                    egui::TextEdit::multiline(&mut state.contact.message)
                        .hint_text("Your message")
                        .desired_width(width)
                        .desired_rows(5),
                );

                ui.add_space(theme.spacing);

                if let Some(notice) = state.contact.notice.clone() {
                    show_notice(ui, &theme, &notice);
                    ui.add_space(theme.spacing_sm);
                }

                let label = if busy { "Sending..." } else { "Send Message" };
                let button = egui::Button::new(RichText::new(label).color(egui::Color32::WHITE))
                    .min_size(Vec2::new(ui.available_width(), 36.0))
                    .rounding(theme.button_rounding)
                    .fill(theme.accent);

                if ui.add_enabled(!busy, button).clicked() {
                    state.send_contact();
                }
            });
        });
    }
}
