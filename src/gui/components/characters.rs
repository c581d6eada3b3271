//! Saved characters table with add and delete dialogs

use eframe::egui;

use crate::config::{Profile, ServerEntry};
use crate::constants::gui::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharacterAction {
    None,
    Select(usize),
    Add(Profile),
    Delete(Profile),
}

/// Dialog state for character management UI
#[derive(Default)]
pub struct CharactersState {
    show_add_dialog: bool,
    server_idx: usize,
    username: String,
    password: String,
    add_error: Option<String>,
    pending_delete: Option<Profile>,
}

impl CharactersState {
    fn open_add_dialog(&mut self) {
        self.show_add_dialog = true;
        self.server_idx = 0;
        self.username.clear();
        self.password.clear();
        self.add_error = None;
    }

    /// Validate the dialog input into a profile for the chosen server
    fn draft_profile(&self, servers: &[ServerEntry]) -> Result<Profile, &'static str> {
        let server = servers.get(self.server_idx).ok_or("Select a server")?;
        let username = self.username.trim();
        if username.is_empty() {
            return Err("Name is required");
        }
        if self.password.is_empty() {
            return Err("Password is required");
        }
        Ok(Profile::new(
            server.address.clone(),
            username,
            self.password.clone(),
        ))
    }
}

/// Renders the character table. Returns the requested change, if any.
pub fn ui(
    ui: &mut egui::Ui,
    profiles: &[Profile],
    servers: &[ServerEntry],
    selected: Option<usize>,
    state: &mut CharactersState,
) -> CharacterAction {
    let mut action = CharacterAction::None;

    ui.group(|ui| {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Characters").strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("➕ Add Character").clicked() {
                    state.open_add_dialog();
                }
            });
        });
        ui.add_space(ITEM_SPACING / 2.0);

        if profiles.is_empty() {
            ui.label(egui::RichText::new("No characters saved yet").weak());
            return;
        }

        egui::ScrollArea::vertical()
            .max_height(240.0)
            .show(ui, |ui| {
                egui::Grid::new("characters_table")
                    .num_columns(3)
                    .striped(true)
                    .spacing([ITEM_SPACING * 2.0, ITEM_SPACING / 2.0])
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new("Server").strong());
                        ui.label(egui::RichText::new("Name").strong());
                        ui.label("");
                        ui.end_row();

                        for (idx, profile) in profiles.iter().enumerate() {
                            let is_selected = selected == Some(idx);
                            if ui.selectable_label(is_selected, &profile.server).clicked() {
                                action = CharacterAction::Select(idx);
                            }
                            if ui.selectable_label(is_selected, &profile.username).clicked() {
                                action = CharacterAction::Select(idx);
                            }
                            if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                                state.pending_delete = Some(profile.clone());
                            }
                            ui.end_row();
                        }
                    });
            });
    });

    if state.show_add_dialog
        && let Some(profile) = render_add_dialog(ui.ctx(), servers, state)
    {
        action = CharacterAction::Add(profile);
    }

    if let Some(profile) = render_delete_confirmation(ui.ctx(), state) {
        action = CharacterAction::Delete(profile);
    }

    action
}

fn render_add_dialog(
    ctx: &egui::Context,
    servers: &[ServerEntry],
    state: &mut CharactersState,
) -> Option<Profile> {
    let mut added = None;
    let mut open = true;
    let mut close = false;

    egui::Window::new("Add Character")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.set_min_width(300.0);

            egui::Grid::new("add_character_form")
                .num_columns(2)
                .spacing([ITEM_SPACING, ITEM_SPACING])
                .show(ui, |ui| {
                    ui.label("Server:");
                    let selected_text = servers
                        .get(state.server_idx)
                        .map(|s| s.name.as_str())
                        .unwrap_or("None");
                    egui::ComboBox::from_id_salt("add_character_server")
                        .selected_text(selected_text)
                        .show_ui(ui, |ui| {
                            for (idx, server) in servers.iter().enumerate() {
                                ui.selectable_value(&mut state.server_idx, idx, &server.name)
                                    .on_hover_text(&server.address);
                            }
                        });
                    ui.end_row();

                    ui.label("Name:");
                    ui.add(egui::TextEdit::singleline(&mut state.username).hint_text("Character name"));
                    ui.end_row();

                    ui.label("Password:");
                    ui.add(egui::TextEdit::singleline(&mut state.password).password(true));
                    ui.end_row();
                });

            if let Some(message) = &state.add_error {
                ui.add_space(ITEM_SPACING / 2.0);
                ui.colored_label(COLOR_ERROR, message);
            }

            ui.add_space(ITEM_SPACING);
            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Add").clicked() {
                    match state.draft_profile(servers) {
                        Ok(profile) => {
                            added = Some(profile);
                            close = true;
                        }
                        Err(message) => state.add_error = Some(message.to_string()),
                    }
                }
                if ui.button("Cancel").clicked() {
                    close = true;
                }
            });
        });

    if !open || close {
        state.show_add_dialog = false;
        state.password.clear();
    }

    added
}

fn render_delete_confirmation(ctx: &egui::Context, state: &mut CharactersState) -> Option<Profile> {
    let profile = state.pending_delete.clone()?;
    let mut confirmed = None;

    egui::Window::new("Delete Character")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!(
                "Are you sure you want to delete {} on {}?",
                profile.username, profile.server
            ));
            ui.add_space(ITEM_SPACING);

            ui.horizontal(|ui| {
                if ui.button("Yes, Delete").clicked() {
                    confirmed = Some(profile.clone());
                    state.pending_delete = None;
                }
                if ui.button("Cancel").clicked() {
                    state.pending_delete = None;
                }
            });
        });

    confirmed
}
