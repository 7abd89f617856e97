//! Utility functions and helpers.

pub mod preflight;
pub mod settings;

pub use preflight::{check_git_repository, check_path_exists};
pub use settings::{Settings, COLOR_ENV, SETTINGS_DIR};
