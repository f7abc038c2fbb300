//! Login and signup form

use crate::ui::components::{card, show_notice};
use crate::ui::state::{AppState, AuthMode};
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};

pub struct AuthView<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> AuthView<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.set_max_width(360.0);
            ui.add_space(self.theme.spacing * 2.0);

            let title = match self.state.auth.mode {
                AuthMode::Login => "Sign In",
                AuthMode::Signup => "Create Account",
            };
            ui.heading(RichText::new(title).color(self.theme.text_primary));
            ui.add_space(self.theme.spacing);

            card(self.theme).show(ui, |ui| {
                self.show_fields(ui);

                ui.add_space(self.theme.spacing);

                if let Some(notice) = self.state.auth.notice.clone() {
                    show_notice(ui, self.theme, &notice);
                    ui.add_space(self.theme.spacing_sm);
                }

                self.show_submit(ui);
            });

            ui.add_space(self.theme.spacing);
            self.show_mode_switch(ui);
        });
    }

    fn show_fields(&mut self, ui: &mut egui::Ui) {
        let busy = self.state.auth.busy;
        let signup = self.state.auth.mode == AuthMode::Signup;
        let width = ui.available_width();

        ui.add_enabled(
            !busy,
            egui::TextEdit::singleline(&mut self.state.auth.username)
                .hint_text("Username")
                .desired_width(width),
        );
        ui.add_space(self.theme.spacing_sm);

        if signup {
            ui.add_enabled(
                !busy,
                egui::TextEdit::singleline(&mut self.state.auth.email)
                    .hint_text("Email")
                    .desired_width(width),
            );
            ui.add_space(self.theme.spacing_sm);
        }

        ui.add_enabled(
            !busy,
            egui::TextEdit::singleline(&mut self.state.auth.password)
                .hint_text("Password")
                .password(true)
                .desired_width(width),
        );

        if signup {
            ui.add_space(self.theme.spacing_sm);
            ui.add_enabled(
                !busy,
                egui::TextEdit::singleline(&mut self.state.auth.confirm_password)
                    .hint_text("Confirm password")
                    .password(true)
                    .desired_width(width),
            );
        }
    }

    fn show_submit(&mut self, ui: &mut egui::Ui) {
        let busy = self.state.auth.busy;
        let label = match (self.state.auth.mode, busy) {
            (AuthMode::Login, false) => "Sign In",
            (AuthMode::Login, true) => "Signing in...",
            (AuthMode::Signup, false) => "Sign Up",
            (AuthMode::Signup, true) => "Creating account...",
        };

        let button = egui::Button::new(RichText::new(label).color(egui::Color32::WHITE))
            .min_size(Vec2::new(ui.available_width(), 36.0))
            .rounding(self.theme.button_rounding)
            .fill(self.theme.accent);

        if ui.add_enabled(!busy, button).clicked() {
            let mode = self.state.auth.mode;
            self.state.submit_auth(mode);
        }
    }

    fn show_mode_switch(&mut self, ui: &mut egui::Ui) {
        let (prompt, link, target) = match self.state.auth.mode {
            AuthMode::Login => ("Don't have an account?", "Sign up", AuthMode::Signup),
            AuthMode::Signup => ("Already have an account?", "Sign in", AuthMode::Login),
        };

        ui.horizontal(|ui| {
            ui.label(RichText::new(prompt).color(self.theme.text_secondary));
            if ui
                .link(RichText::new(link).color(self.theme.accent))
                .clicked()
            {
                self.state.auth.notice = None;
                self.state.auth.mode = target;
            }
        });
    }
}
