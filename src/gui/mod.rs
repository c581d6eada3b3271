//! Launcher window (egui/eframe)

mod app;
pub mod components;
pub mod state;

pub use app::run_gui;
