//! Finding the config files on disk and stacking them into one config.
//!
//! Two files are consulted, lowest precedence first:
//! - `config.toml` in the user config directory
//! - `pokedex.toml` in the project directory (the working directory by default)
//!
//! A section present in a later file replaces that whole section from an
//! earlier one. Command-line flags are applied by the binary afterwards, and
//! range checks run on the final result, not on the files.

use std::path::{Path, PathBuf};

use crate::{ConfigError, PokedexConfig, Result};

/// Name of the per-project file.
pub const PROJECT_CONFIG_FILE: &str = "pokedex.toml";

/// Name of the file inside the user config directory.
pub const USER_CONFIG_FILE: &str = "config.toml";

/// Subdirectory of the platform config root.
const APP_DIR: &str = "pokedex";

/// Points the user config directory somewhere else.
const CONFIG_DIR_ENV: &str = "POKEDEX_CONFIG_DIR";

/// One candidate file and whether it contributed to the result.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub loaded: bool,
}

/// Merged config plus a record of how it was assembled.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Every file layer merged together. Not yet range-checked.
    pub config: PokedexConfig,
    /// Candidate files, lowest precedence first.
    pub sources: Vec<ConfigSource>,
    /// Files that existed but could not be used.
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Paths of the files that were merged in.
    pub fn loaded_from(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter_map(|s| s.loaded.then_some(s.path.as_path()))
            .collect()
    }
}

/// Stack the user and project files, using the default user directory.
pub fn load_config(project_dir: Option<&Path>) -> Result<LoadedConfig> {
    load_config_with_options(project_dir, None)
}

/// Stack the user and project files.
///
/// `config_dir` replaces the user directory lookup entirely. Missing files
/// are skipped and broken ones end up in `warnings`, so this only fails on
/// conditions outside any single file. The result is not validated: callers
/// apply their overrides first and then call [`PokedexConfig::validate`].
pub fn load_config_with_options(
    project_dir: Option<&Path>,
    config_dir: Option<&Path>,
) -> Result<LoadedConfig> {
    let user_file = config_dir
        .map(|dir| dir.join(USER_CONFIG_FILE))
        .or_else(xdg_config_path);
    let project_file = project_dir.unwrap_or(Path::new(".")).join(PROJECT_CONFIG_FILE);

    let mut loaded = LoadedConfig {
        config: PokedexConfig::new(),
        sources: Vec::new(),
        warnings: Vec::new(),
    };

    for path in user_file.into_iter().chain(std::iter::once(project_file)) {
        let merged = merge_file(&mut loaded, &path);
        loaded.sources.push(ConfigSource {
            path,
            loaded: merged,
        });
    }

    Ok(loaded)
}

/// Read and parse one file.
pub fn load_config_file(path: &Path) -> Result<PokedexConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    PokedexConfig::from_toml(&text)
}

/// Write `config` to `path` as TOML, creating missing directories.
///
/// An existing file is only replaced when `overwrite` is set.
pub fn save_config(config: &PokedexConfig, path: &Path, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        return Err(ConfigError::AlreadyExists(path.display().to_string()));
    }

    let write_err = |path: &Path, source| ConfigError::WriteFile {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| write_err(parent, e))?;
    }
    std::fs::write(path, config.to_toml()?).map_err(|e| write_err(path, e))
}

/// `config.toml` inside [`xdg_config_dir`].
pub fn xdg_config_path() -> Option<PathBuf> {
    xdg_config_dir().map(|dir| dir.join(USER_CONFIG_FILE))
}

/// User config directory: `POKEDEX_CONFIG_DIR` when set and non-empty,
/// otherwise `pokedex/` under the platform config root.
pub fn xdg_config_dir() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::config_dir().map(|root| root.join(APP_DIR)),
    }
}

/// Merge `path` into `loaded.config`. Returns whether it was merged.
fn merge_file(loaded: &mut LoadedConfig, path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    match load_config_file(path) {
        Ok(layer) => {
            loaded.config.merge(layer);
            true
        }
        Err(e) => {
            loaded
                .warnings
                .push(format!("Failed to load {}: {}", path.display(), e));
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
