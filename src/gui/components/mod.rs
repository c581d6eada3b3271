pub mod characters;
pub mod header;
pub mod settings;
