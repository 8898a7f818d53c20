use std::path::PathBuf;

use thiserror::Error;

/// Failure raised by plugin code itself, from a constructor or a lifecycle hook.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("{0}")]
    Message(String),
    #[error("missing resource: {0}")]
    MissingResource(String),
}

impl PluginError {
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// Why a discovery candidate was skipped. Never fatal for the scan.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("missing manifest: {}", .0.display())]
    MissingManifest(PathBuf),
    #[error("invalid manifest {}: {message}", .path.display())]
    InvalidManifest { path: PathBuf, message: String },
    #[error("unknown module `{0}`")]
    UnknownModule(String),
    #[error("module `{0}` exports no plugin")]
    NoPluginExported(String),
    #[error("module `{0}` exports a plugin with a blank name")]
    BlankName(String),
    #[error("module `{module}` exports {count} plugins, expected exactly one")]
    AmbiguousExports { module: String, count: usize },
    #[error("duplicate plugin name `{name}` (first registered from {})", .first.display())]
    DuplicateName { name: String, first: PathBuf },
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why `try_get_or_create` could not hand out an instance.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("plugin not found: {0}")]
    NotFound(String),
    #[error("failed to construct plugin {name}: {source}")]
    Construct {
        name: String,
        #[source]
        source: PluginError,
    },
    #[error("plugin {expected} reports its name as `{actual}`")]
    NameMismatch { expected: String, actual: String },
    #[error("failed to activate plugin {name}: {source}")]
    Activate {
        name: String,
        #[source]
        source: PluginError,
    },
}

impl LoadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
