use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Environment variable pointing at an explicit user config file.
pub const CONFIG_ENV: &str = "FUGO_CONFIG";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub plugins: PluginConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    pub app_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
    pub file_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PluginConfig {
    pub dirs: Vec<String>,
    pub reserved_prefix: String,
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl AppConfig {
    /// Load configuration with layering: defaults → user config.
    pub fn load() -> Result<Self> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
            return Self::load_from(Some(Path::new(&explicit)));
        }

        let user_path = directories::ProjectDirs::from("", "", "fugo")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .filter(|path| path.exists());

        Self::load_from(user_path.as_deref())
    }

    pub fn load_from(user_path: Option<&Path>) -> Result<Self> {
        let user = user_path
            .map(|path| {
                fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))
            })
            .transpose()?;

        Self::from_layers(DEFAULT_CONFIG, user.as_deref())
    }

    /// Deep-merges `user` over `defaults`, table by table.
    pub fn from_layers(defaults: &str, user: Option<&str>) -> Result<Self> {
        let mut merged: toml::Table = defaults.parse().context("invalid default config")?;

        if let Some(user) = user {
            let overlay: toml::Table = user.parse().context("invalid user config")?;
            merge_tables(&mut merged, overlay);
        }

        toml::Value::Table(merged)
            .try_into()
            .map_err(|err| anyhow!("invalid config: {err}"))
    }

    pub fn defaults() -> Result<Self> {
        Self::from_layers(DEFAULT_CONFIG, None)
    }

    pub fn plugin_dirs(&self) -> Vec<PathBuf> {
        self.plugins
            .dirs
            .iter()
            .map(|dir| expand_tilde(Path::new(dir)))
            .collect()
    }
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(overlay_table) => {
                if let Some(toml::Value::Table(base_table)) = base.get_mut(&key) {
                    merge_tables(base_table, overlay_table);
                } else {
                    base.insert(key, toml::Value::Table(overlay_table));
                }
            }
            value => {
                base.insert(key, value);
            }
        }
    }
}

/// Resolves a leading `~` component against the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    match directories::BaseDirs::new() {
        Some(base_dirs) if rest.as_os_str().is_empty() => base_dirs.home_dir().to_path_buf(),
        Some(base_dirs) => base_dirs.home_dir().join(rest),
        None => path.to_path_buf(),
    }
}
