//! Config file loading and creation.
//!
//! The config lives at ~/.config/manual-sort/config.toml. Every field is optional,
//! command line flags override it.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

/// Where progress is kept when neither the flag nor the config name a file
pub const DEFAULT_STATE_FILE: &str = "manual-sort.state.json";

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub state_file: Option<PathBuf>,
    pub autosave: Option<bool>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# manual-sort configuration
# All values here can be overridden by command line flags.

# File holding the progress of an unfinished sort
# state_file = \"manual-sort.state.json\"

# Save after every decision
# autosave = true
";

impl Config {
    /// The state file: flag, then config, then [`DEFAULT_STATE_FILE`]
    pub fn state_file(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.state_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE))
    }

    /// Whether to save after every decision
    pub fn autosave(&self, disabled_by_flag: bool) -> bool {
        !disabled_by_flag && self.autosave.unwrap_or(true)
    }
}

/// Returns the default config path: ~/.config/manual-sort/config.toml
pub fn config_path() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("manual-sort")
        .join("config.toml"))
}

/// Load the config at `path`, all defaults if the file does not exist
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(e).with_context(|| format!("Failed to read config at {}", path.display())),
    }
}

/// Write the commented default config to `path`. Errors if it already exists.
pub fn create_default_config(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("Config file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write config to {}", path.display()))
}
