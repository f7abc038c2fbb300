//! Access gate overlay
//!
//! Feature views render underneath; when the session is anonymous a
//! blocking prompt covers them, and while the session check is still
//! running a spinner is shown instead.

use crate::gate::GateDecision;
use crate::ui::state::View;
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};

pub struct GateOverlay<'a> {
    theme: &'a Theme,
    decision: GateDecision,
}

/// What the user clicked inside the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateAction {
    None,
    GoToAuth,
}

impl<'a> GateOverlay<'a> {
    pub fn new(theme: &'a Theme, decision: GateDecision) -> Self {
        Self { theme, decision }
    }

    /// Show the overlay on top of the given content area. Returns the
    /// navigation action, if any.
    pub fn show(self, ctx: &egui::Context, content_rect: egui::Rect) -> GateAction {
        match self.decision {
            GateDecision::Passthrough => GateAction::None,
            GateDecision::Loading => {
                self.show_scrim(ctx, content_rect, |ui, _theme| {
                    ui.spinner();
                });
                GateAction::None
            }
            GateDecision::PassthroughWithPrompt => {
                let mut action = GateAction::None;
                self.show_scrim(ctx, content_rect, |ui, theme| {
                    egui::Frame::none()
                        .fill(theme.bg_card)
                        .rounding(theme.card_rounding)
                        .inner_margin(theme.spacing * 2.0)
                        .show(ui, |ui| {
                            ui.set_max_width(320.0);
                            ui.vertical_centered(|ui| {
                                ui.heading(
                                    RichText::new("Login Required").color(theme.text_primary),
                                );
                                ui.add_space(theme.spacing_sm);
                                ui.label(
                                    RichText::new(
                                        "Please log in or sign up to access this feature.",
                                    )
                                    .color(theme.text_secondary),
                                );
                                ui.add_space(theme.spacing);

                                let button = egui::Button::new(
                                    RichText::new("Go to Login").color(egui::Color32::WHITE),
                                )
                                .min_size(Vec2::new(140.0, 32.0))
                                .rounding(theme.button_rounding)
                                .fill(theme.accent);

                                if ui.add(button).clicked() {
                                    action = GateAction::GoToAuth;
                                }
                            });
                        });
                });
                action
            }
        }
    }

    fn show_scrim(
        &self,
        ctx: &egui::Context,
        content_rect: egui::Rect,
        add_contents: impl FnOnce(&mut egui::Ui, &Theme),
    ) {
        egui::Area::new(egui::Id::new("access_gate"))
            .fixed_pos(content_rect.min)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                ui.set_min_size(content_rect.size());

                // Dim what is underneath and swallow its input
                ui.painter().rect_filled(
                    content_rect,
                    0.0,
                    egui::Color32::from_black_alpha(180),
                );
                ui.allocate_rect(content_rect, egui::Sense::click());

                let center = egui::Rect::from_center_size(
                    content_rect.center(),
                    Vec2::new(content_rect.width().min(360.0), 200.0),
                );
                let mut inner = ui.new_child(
                    egui::UiBuilder::new()
                        .max_rect(center)
                        .layout(egui::Layout::top_down(egui::Align::Center)),
                );
                add_contents(&mut inner, self.theme);
            });
    }
}

/// Whether a view sits behind the access gate
pub fn is_protected(view: View) -> bool {
    matches!(
        view,
        View::FaceCompare | View::TextToSpeech | View::VoiceClone | View::History
    )
}
