//! progressline command line interface
//!
//! Configuration, presets and terminal helpers behind the `progressline`
//! binary.

pub mod config;
pub mod presets;
pub mod terminal;

pub use config::{AppConfig, ConfigManager, get_config};
pub use presets::{Preset, PresetOptions};
