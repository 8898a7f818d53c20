use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

use crate::plugin::error::DiscoveryError;

pub const MANIFEST_FILE: &str = "plugin.toml";

/// Contents of `plugin.toml` inside a plugin directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginManifest {
    /// Catalog key of the module providing the plugin.
    pub module: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl PluginManifest {
    pub fn read(plugin_dir: &Path) -> Result<Self, DiscoveryError> {
        let manifest_path = plugin_dir.join(MANIFEST_FILE);
        let raw = fs::read_to_string(&manifest_path).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                DiscoveryError::MissingManifest(manifest_path.clone())
            } else {
                DiscoveryError::Io {
                    path: manifest_path.clone(),
                    source: err,
                }
            }
        })?;

        Self::parse(&raw).map_err(|message| DiscoveryError::InvalidManifest {
            path: manifest_path,
            message,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        let manifest = toml::from_str::<PluginManifest>(raw).map_err(|err| err.to_string())?;
        if manifest.module.trim().is_empty() {
            return Err("`module` must not be empty".to_string());
        }
        Ok(manifest)
    }
}
