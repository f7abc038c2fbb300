//! Visual theme
//!
//! Centralizes colors and spacing so the views stay consistent.

use egui::Color32;

#[derive(Clone)]
pub struct Theme {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_card: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,
    pub accent: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,
    pub card_rounding: f32,
    pub button_rounding: f32,
    pub spacing: f32,
    pub spacing_sm: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg_primary: Color32::from_rgb(18, 20, 25),
            bg_secondary: Color32::from_rgb(28, 31, 38),
            bg_card: Color32::from_rgb(36, 40, 48),
            text_primary: Color32::from_rgb(230, 232, 235),
            text_secondary: Color32::from_rgb(180, 185, 192),
            text_muted: Color32::from_rgb(120, 126, 136),
            accent: Color32::from_rgb(33, 150, 243),
            success: Color32::from_rgb(76, 175, 80),
            warning: Color32::from_rgb(255, 167, 38),
            error: Color32::from_rgb(239, 83, 80),
            card_rounding: 8.0,
            button_rounding: 6.0,
            spacing: 12.0,
            spacing_sm: 6.0,
        }
    }

    /// Apply the theme to the egui context
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_secondary;
        visuals.selection.bg_fill = self.accent.gamma_multiply(0.4);
        ctx.set_visuals(visuals);
    }
}
