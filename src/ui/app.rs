//! Main application struct and eframe integration
//!
//! This module contains the main EchofaceApp that implements eframe::App.

use crate::config::ClientConfig;
use crate::gate::access_decision;
use crate::session::SessionStatus;
use crate::ui::components::{
    gate_overlay::{is_protected, GateAction},
    AuthView, ContactView, FaceCompareView, GateOverlay, HistoryView, SpeechView, VoiceCloneView,
};
use crate::ui::state::{AppState, View};
use crate::ui::theme::Theme;
use crate::worker::{ClientCommand, ClientWorker};
use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel};
use tracing::info;

/// Main Echoface application
pub struct EchofaceApp {
    /// Application state
    state: AppState,
    /// Visual theme
    theme: Theme,
    /// Whether the app has been initialized
    initialized: bool,
}

impl EchofaceApp {
    /// Create a new Echoface application
    pub fn new(cc: &eframe::CreationContext<'_>, config: ClientConfig) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        let mut state = AppState::new();

        let worker = ClientWorker::new(config);
        state.command_tx = Some(worker.command_sender());
        state.event_rx = Some(worker.event_receiver());
        state.health_rx = Some(worker.health_receiver());
        if let Err(e) = worker.start_worker() {
            tracing::error!("Failed to start client worker: {}", e);
            state.command_tx = None;
        }

        Self {
            state,
            theme,
            initialized: false,
        }
    }

    /// Kick off the session check and availability probe (first frame)
    fn initialize(&mut self) {
        if self.initialized {
            return;
        }

        info!("Echoface UI initialized");
        if let Some(tx) = &self.state.command_tx {
            let _ = tx.send(ClientCommand::Rehydrate);
            let _ = tx.send(ClientCommand::CheckHealth);
        }
        self.initialized = true;
    }

    /// Show the top header bar with navigation
    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Echoface")
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );
                    ui.add_space(self.theme.spacing);

                    self.nav_button(ui, View::FaceCompare, "Face Comparison");
                    self.nav_button(ui, View::TextToSpeech, "Text to Speech");
                    self.nav_button(ui, View::VoiceClone, "Voice Cloning");
                    self.nav_button(ui, View::History, "History");
                    self.nav_button(ui, View::Contact, "Contact");

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        self.show_session_controls(ui);
                        ui.add_space(self.theme.spacing_sm);
                        self.show_health_indicator(ui);

                        if ui
                            .button("🗒")
                            .on_hover_text("Toggle activity log")
                            .clicked()
                        {
                            self.state.show_log_panel = !self.state.show_log_panel;
                        }
                    });
                });
            });
    }

    fn nav_button(&mut self, ui: &mut egui::Ui, view: View, label: &str) {
        let active = self.state.view == view;
        let color = if active {
            self.theme.accent
        } else {
            self.theme.text_secondary
        };
        if ui
            .selectable_label(active, RichText::new(label).color(color))
            .clicked()
        {
            self.navigate(view);
        }
    }

    fn navigate(&mut self, view: View) {
        if self.state.view == view {
            return;
        }
        self.state.view = view;

        // History is fetched fresh each time the view opens
        if view == View::History && self.state.session.status == SessionStatus::Authenticated {
            self.state.fetch_history();
        }
    }

    fn show_session_controls(&mut self, ui: &mut egui::Ui) {
        match self.state.session.status {
            SessionStatus::Authenticated => {
                if ui.button("Logout").clicked() {
                    self.state.logout();
                }
                if let Some(identity) = &self.state.session.identity {
                    ui.label(
                        RichText::new(&identity.username).color(self.theme.text_primary),
                    );
                }
            }
            SessionStatus::Checking => {
                ui.spinner();
            }
            SessionStatus::Anonymous => {
                if ui.button("Login").clicked() {
                    self.navigate(View::Auth);
                }
            }
        }
    }

    fn show_health_indicator(&mut self, ui: &mut egui::Ui) {
        use crate::health::AvailabilityState;

        let (dot, text, color) = match self.state.health.state {
            AvailabilityState::Available => ("●", "Backend online", self.theme.success),
            AvailabilityState::Unavailable => ("●", "Backend offline", self.theme.error),
            AvailabilityState::Probing => ("●", "Checking backend...", self.theme.warning),
            AvailabilityState::Unknown => ("●", "Backend status unknown", self.theme.text_muted),
        };

        ui.label(RichText::new(dot).color(color)).on_hover_text(text);

        // Unavailable is worth a retry button
        if self.state.health.state == AvailabilityState::Unavailable
            && ui.small_button("Retry").clicked()
        {
            if let Some(tx) = &self.state.command_tx {
                let _ = tx.send(ClientCommand::CheckHealth);
            }
        }
    }

    /// Show the activity log on the side
    fn show_log_panel(&mut self, ctx: &egui::Context) {
        if !self.state.show_log_panel {
            return;
        }

        SidePanel::right("activity_log")
            .resizable(true)
            .default_width(280.0)
            .min_width(220.0)
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                ui.label(
                    RichText::new("Activity")
                        .strong()
                        .color(self.theme.text_primary),
                );
                ui.add_space(self.theme.spacing_sm);
                egui::ScrollArea::vertical().stick_to_bottom(true).show(ui, |ui| {
                    for line in &self.state.activity_log {
                        ui.label(
                            RichText::new(line)
                                .size(11.0)
                                .family(egui::FontFamily::Monospace)
                                .color(self.theme.text_secondary),
                        );
                    }
                });
            });
    }

    /// Show the main content area with the access gate on top of
    /// protected views
    fn show_content(&mut self, ctx: &egui::Context) {
        let content_rect = CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                let theme = self.theme.clone();
                match self.state.view {
                    View::FaceCompare => FaceCompareView::new(&mut self.state, &theme).show(ui),
                    View::TextToSpeech => SpeechView::new(&mut self.state, &theme).show(ui),
                    View::VoiceClone => VoiceCloneView::new(&mut self.state, &theme).show(ui),
                    View::History => HistoryView::new(&mut self.state, &theme).show(ui),
                    View::Contact => ContactView::new(&mut self.state, &theme).show(ui),
                    View::Auth => AuthView::new(&mut self.state, &theme).show(ui),
                }
                ui.max_rect()
            })
            .inner;

        if is_protected(self.state.view) {
            let decision = access_decision(self.state.session.status);
            let action = GateOverlay::new(&self.theme, decision).show(ctx, content_rect);
            if action == GateAction::GoToAuth {
                self.navigate(View::Auth);
            }
        }
    }
}

impl eframe::App for EchofaceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.initialize();

        // Poll worker events
        self.state.poll_events();

        self.show_header(ctx);
        self.show_log_panel(ctx);
        self.show_content(ctx);

        // Keep polling while anything is in flight
        let busy = self.state.auth.busy
            || self.state.face.busy
            || self.state.speech.busy
            || self.state.voice_clone.busy
            || self.state.history.busy
            || self.state.contact.busy
            || self.state.session.status == SessionStatus::Checking;
        if busy {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Echoface shutting down");
        if let Some(tx) = &self.state.command_tx {
            let _ = tx.send(ClientCommand::Shutdown);
        }
        self.state.playback.dispose();
    }
}
