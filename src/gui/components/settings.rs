//! Game settings window, rendered from the settings schema

use eframe::egui;
use tracing::warn;

use crate::config::settings::{SCHEMA, SettingField, SettingKind, keys};
use crate::config::{SettingValue, Settings};
use crate::constants::gui::*;

pub enum SettingsAction {
    None,
    Save(Settings),
}

/// Draft edited by the window; discarded on cancel
#[derive(Default)]
pub struct SettingsWindowState {
    draft: Option<Settings>,
    error: Option<String>,
}

impl SettingsWindowState {
    pub fn open(&mut self, current: &Settings) {
        self.draft = Some(current.clone());
        self.error = None;
    }

    /// Apply one edited value to the draft, keeping the rejection message
    fn apply(&mut self, key: &'static str, value: SettingValue) {
        let Some(draft) = self.draft.as_mut() else {
            return;
        };
        match draft.set(key, value) {
            Ok(()) => self.error = None,
            Err(err) => {
                warn!(key, error = %err, "Rejected setting change");
                self.error = Some(err.to_string());
            }
        }
    }
}

pub fn ui(ctx: &egui::Context, state: &mut SettingsWindowState) -> SettingsAction {
    let Some(draft) = state.draft.as_ref() else {
        return SettingsAction::None;
    };

    let mut action = SettingsAction::None;
    let mut open = true;
    let mut close = false;
    let mut change = None;

    egui::Window::new("Settings")
        .open(&mut open)
        .collapsible(false)
        .default_width(360.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .max_height(400.0)
                .show(ui, |ui| {
                    egui::Grid::new("settings_grid")
                        .num_columns(2)
                        .spacing([ITEM_SPACING * 2.0, ITEM_SPACING / 2.0])
                        .show(ui, |ui| {
                            for field in SCHEMA {
                                // Resolution only applies in windowed mode
                                if field.key == keys::RESOLUTION && draft.is_fullscreen() {
                                    continue;
                                }
                                if let Some(value) = render_field(ui, field, draft) {
                                    change = Some((field.key, value));
                                }
                                ui.end_row();
                            }
                        });
                });

            if let Some(message) = &state.error {
                ui.add_space(ITEM_SPACING);
                ui.colored_label(COLOR_ERROR, message);
            }

            ui.add_space(ITEM_SPACING);
            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("💾 Save").clicked() {
                    action = SettingsAction::Save(draft.clone());
                    close = true;
                }
                if ui.button("Cancel").clicked() {
                    close = true;
                }
            });
        });

    if let Some((key, value)) = change {
        state.apply(key, value);
    }

    if !open || close {
        state.draft = None;
        state.error = None;
    }

    action
}

/// Draw one schema row, returning the edited value if it changed
fn render_field(ui: &mut egui::Ui, field: &SettingField, draft: &Settings) -> Option<SettingValue> {
    match field.kind {
        SettingKind::Flag { .. } => {
            ui.label("");
            let mut enabled = draft.flag(field.key);
            ui.checkbox(&mut enabled, field.label)
                .changed()
                .then_some(SettingValue::Flag(enabled))
        }
        SettingKind::Integer { min, max, .. } => {
            ui.label(field.label);
            let mut value = draft.integer(field.key);
            ui.add(egui::DragValue::new(&mut value).range(min..=max))
                .changed()
                .then_some(SettingValue::Integer(value))
        }
        SettingKind::Choice { options, .. } => {
            ui.label(field.label);
            let mut selected = draft.text(field.key).to_string();
            let mut changed = false;
            egui::ComboBox::from_id_salt(field.key)
                .selected_text(&selected)
                .show_ui(ui, |ui| {
                    for option in options {
                        changed |= ui
                            .selectable_value(&mut selected, option.to_string(), *option)
                            .changed();
                    }
                });
            changed.then_some(SettingValue::Text(selected))
        }
        SettingKind::Text { .. } => {
            ui.label(field.label);
            let mut text = draft.text(field.key).to_string();
            ui.text_edit_singleline(&mut text)
                .changed()
                .then_some(SettingValue::Text(text))
        }
    }
}
