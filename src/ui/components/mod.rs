//! UI components

pub mod auth_view;
pub mod clone_view;
pub mod contact_view;
pub mod face_view;
pub mod gate_overlay;
pub mod history_view;
pub mod speech_view;

pub use auth_view::AuthView;
pub use clone_view::VoiceCloneView;
pub use contact_view::ContactView;
pub use face_view::FaceCompareView;
pub use gate_overlay::GateOverlay;
pub use history_view::HistoryView;
pub use speech_view::SpeechView;

use crate::ui::state::{AppState, Notice};
use crate::ui::theme::Theme;
use egui::RichText;

/// Render a form notice in the right color
pub fn show_notice(ui: &mut egui::Ui, theme: &Theme, notice: &Notice) {
    let color = if notice.is_error {
        theme.error
    } else {
        theme.success
    };
    ui.label(RichText::new(&notice.message).color(color));
}

/// Standard card frame for a view section
pub fn card(theme: &Theme) -> egui::Frame {
    egui::Frame::none()
        .fill(theme.bg_card)
        .rounding(theme.card_rounding)
        .inner_margin(theme.spacing)
}

/// Play/pause and stop controls for the current audio clip.
/// Renders nothing while no clip is installed.
pub fn playback_controls(ui: &mut egui::Ui, theme: &Theme, state: &mut AppState) {
    if !state.playback.has_audio() {
        return;
    }

    let (icon, tooltip) = if state.playback.is_playing() {
        ("⏸", "Pause")
    } else {
        ("▶", "Play")
    };

    let button = egui::Button::new(RichText::new(icon).size(16.0))
        .min_size(egui::Vec2::splat(36.0))
        .rounding(theme.button_rounding);
    if ui.add(button).on_hover_text(tooltip).clicked() {
        if let Err(e) = state.playback.toggle_play() {
            state.add_log(format!("Playback failed: {}", e.user_message()));
        }
    }

    let stop = egui::Button::new(RichText::new("⏹").size(16.0))
        .min_size(egui::Vec2::splat(36.0))
        .rounding(theme.button_rounding);
    if ui.add(stop).on_hover_text("Stop").clicked() {
        state.playback.dispose();
    }
}
