//! Launcher window implemented with egui/eframe

use anyhow::{Result, anyhow};
use eframe::{NativeOptions, egui};
use tracing::info;

use super::components;
use super::components::characters::{CharacterAction, CharactersState};
use super::components::header::HeaderAction;
use super::components::settings::{SettingsAction, SettingsWindowState};
use super::state::LauncherState;
use crate::constants::gui::*;
use crate::launcher::Launcher;

struct LauncherApp {
    state: LauncherState,

    // UI-only state
    characters_state: CharactersState,
    settings_window: SettingsWindowState,
    // The startup check runs after the first frame so the window is visible
    startup_check_pending: bool,
    first_frame_shown: bool,
}

impl LauncherApp {
    fn new(_cc: &eframe::CreationContext<'_>, launcher: Launcher) -> Self {
        info!("Initializing launcher window");

        Self {
            state: LauncherState::new(launcher),
            characters_state: CharactersState::default(),
            settings_window: SettingsWindowState::default(),
            startup_check_pending: true,
            first_frame_shown: false,
        }
    }

    fn handle_header_action(&mut self, action: HeaderAction) {
        match action {
            HeaderAction::RetryCheck => self.state.run_check(),
            HeaderAction::AcceptUpdate => self.state.accept_update(),
            HeaderAction::DeclineUpdate => self.state.decline_update(),
            HeaderAction::OpenSettings => self.settings_window.open(&self.state.settings),
            HeaderAction::None => {}
        }
    }

    fn handle_character_action(&mut self, action: CharacterAction) {
        match action {
            CharacterAction::Select(idx) => self.state.selected_profile = Some(idx),
            CharacterAction::Add(profile) => self.state.add_profile(profile),
            CharacterAction::Delete(profile) => self.state.delete_profile(&profile),
            CharacterAction::None => {}
        }
    }
}

impl eframe::App for LauncherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.startup_check_pending && self.first_frame_shown {
            self.startup_check_pending = false;
            self.state.run_check();
        }

        // One download step per frame keeps the window responsive
        if self.state.poll_download() {
            ctx.request_repaint();
        }

        // Global Header Panel (Fixed at top)
        let mut header_action = HeaderAction::None;
        egui::TopBottomPanel::top("update_header").show(ctx, |ui| {
            ui.add_space(5.0);
            header_action = components::header::render(ctx, ui, &self.state);
        });
        self.handle_header_action(header_action);

        // Launch bar (Fixed at bottom)
        let mut launch_clicked = false;
        egui::TopBottomPanel::bottom("launch_bar").show(ctx, |ui| {
            ui.add_space(ITEM_SPACING);
            ui.horizontal(|ui| {
                if let Some(profile) = self.state.selected() {
                    ui.label(format!("{} @ {}", profile.username, profile.server));
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let button = egui::Button::new(egui::RichText::new("▶ Launch").strong())
                        .min_size(egui::vec2(100.0, 30.0));
                    launch_clicked = ui.add_enabled(self.state.can_launch(), button).clicked();
                });
            });
            ui.add_space(ITEM_SPACING);
        });

        if launch_clicked && self.state.launch_selected() {
            info!("Client launched, closing launcher");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        // Main Content Body
        let mut character_action = CharacterAction::None;
        egui::CentralPanel::default().show(ctx, |ui| {
            character_action = components::characters::ui(
                ui,
                &self.state.profiles,
                &self.state.servers,
                self.state.selected_profile,
                &mut self.characters_state,
            );
        });
        self.handle_character_action(character_action);

        if let SettingsAction::Save(settings) = components::settings::ui(ctx, &mut self.settings_window) {
            self.state.save_settings(settings);
        }

        if self.startup_check_pending {
            self.first_frame_shown = true;
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Launcher exiting");
    }
}

pub fn run_gui(launcher: Launcher) -> Result<()> {
    let viewport_builder = egui::ViewportBuilder::default()
        .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
        .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
        .with_title("Ugaris Launcher - v".to_string() + env!("CARGO_PKG_VERSION"));

    let options = NativeOptions {
        viewport: viewport_builder,
        ..Default::default()
    };

    eframe::run_native(
        &format!("Ugaris Launcher - v{}", env!("CARGO_PKG_VERSION")),
        options,
        Box::new(|cc| Ok(Box::new(LauncherApp::new(cc, launcher)))),
    )
    .map_err(|err| anyhow!("Failed to launch launcher window: {err}"))
}
