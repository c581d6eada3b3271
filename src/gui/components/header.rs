use eframe::egui;

use crate::constants::gui::*;
use crate::gui::state::{LauncherState, UpdateState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    None,
    RetryCheck,
    AcceptUpdate,
    DeclineUpdate,
    OpenSettings,
}

/// Renders the update status, release notes and download progress
pub fn render(ctx: &egui::Context, ui: &mut egui::Ui, state: &LauncherState) -> HeaderAction {
    let mut action = HeaderAction::None;

    // Row 0: Update Status (Left) | Actions (Right)
    ui.horizontal(|ui| {
        ui.colored_label(state.update_state.color(), state.update_state.label());
        if let Some(version) = state.installed_version() {
            ui.label(format!("(installed: {version})"));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.add_space(5.0);

            if ui.button("⚙ Settings").clicked() {
                action = HeaderAction::OpenSettings;
            }

            if matches!(state.update_state, UpdateState::Error(_))
                && ui.button("⟳ Retry").clicked()
            {
                action = HeaderAction::RetryCheck;
            }
        });
    });

    if let UpdateState::Installing { progress, .. } = &state.update_state {
        let bar = match progress.fraction() {
            Some(fraction) => egui::ProgressBar::new(fraction).show_percentage(),
            None => egui::ProgressBar::new(0.0).animate(true),
        };
        ui.add(bar);
    }

    if let Some(message) = &state.status_message {
        ui.colored_label(message.color, &message.text);
    }

    if let Some(notes) = state.release.as_ref().and_then(|r| r.notes.as_ref()) {
        ui.add_space(ITEM_SPACING / 2.0);
        egui::CollapsingHeader::new("Release notes")
            .default_open(false)
            .show(ui, |ui| {
                egui::ScrollArea::vertical()
                    .max_height(120.0)
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(notes).small());
                    });
            });
    }

    ui.add_space(5.0);

    // Update prompt (Context level)
    if let UpdateState::UpdateAvailable { version } = &state.update_state {
        egui::Window::new("Update Available")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!(
                    "A new version ({version}) is available. Do you want to update?"
                ));
                ui.add_space(ITEM_SPACING);

                ui.horizontal(|ui| {
                    if ui.button("Yes").clicked() {
                        action = HeaderAction::AcceptUpdate;
                    }
                    if ui.button("No").clicked() {
                        action = HeaderAction::DeclineUpdate;
                    }
                });
            });
    }

    action
}
