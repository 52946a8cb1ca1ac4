//! Configuration handling for `~/.waypost/config.ini`.
//!
//! Settings structs live in [`settings`], loading and error types in
//! [`file`], INI key mapping in the private parser module.

mod file;
mod parser;
mod settings;

pub use file::{config_dir, config_file_path, ConfigFileError};
pub use settings::{
    ConfigFile, LoggingSettings, SleepSettings, SourceSettings, TrackingSettings,
};
