//! Configuration system for the Pokedex shell.
//!
//! Provides TOML-based configuration with:
//! - `[cache]`: expiry interval and whether the background reaper runs
//! - `[api]`: API root, request timeout, listing page size
//! - `[logging]`: console filter and file logging toggle
//! - Config file layering (XDG user config + project-local overrides)

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    ConfigSource, LoadedConfig, PROJECT_CONFIG_FILE, USER_CONFIG_FILE, load_config,
    load_config_file, load_config_with_options, save_config, xdg_config_dir, xdg_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;
