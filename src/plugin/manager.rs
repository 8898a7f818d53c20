use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;
use crate::plugin::catalog::Catalog;
use crate::plugin::error::LoadError;
use crate::plugin::lifecycle::{ActivePlugin, LifecycleController};
use crate::plugin::registry::{PluginDescriptor, Registry};
use crate::plugin::scanner::{CandidateStatus, DiscoveryReport, Scanner};

/// What the host sees of the plugin system: discovery, the registry, and the instance cache.
#[derive(Debug)]
pub struct PluginManager {
    catalog: Catalog,
    locations: Vec<PathBuf>,
    reserved_prefix: String,
    disabled: Vec<String>,
    registry: Registry,
    lifecycle: LifecycleController,
    report: DiscoveryReport,
    discovered: bool,
}

impl PluginManager {
    pub fn new(config: &AppConfig, catalog: Catalog) -> Self {
        let mut manager = Self {
            catalog,
            locations: Vec::new(),
            reserved_prefix: config.plugins.reserved_prefix.clone(),
            disabled: config.plugins.disabled.clone(),
            registry: Registry::new(),
            lifecycle: LifecycleController::new(),
            report: DiscoveryReport::default(),
            discovered: false,
        };

        // Configured directories are kept even when missing so the report can name them.
        for dir in config.plugin_dirs() {
            if !manager.locations.contains(&dir) {
                manager.locations.push(dir);
            }
        }

        manager
    }

    /// Builds a manager and runs discovery right away.
    pub fn from_config(config: &AppConfig, catalog: Catalog) -> Self {
        let mut manager = Self::new(config, catalog);
        manager.discover();
        manager
    }

    /// Adds another plugin location ahead of discovery. Returns `false` for
    /// missing directories, duplicates, or once discovery has run.
    pub fn add_location(&mut self, dir: impl AsRef<Path>) -> bool {
        let dir = dir.as_ref();
        if self.discovered {
            tracing::warn!(
                "plugin directory added after discovery ignored: {}",
                dir.display()
            );
            return false;
        }

        if !dir.is_dir() || self.locations.iter().any(|known| known == dir) {
            return false;
        }

        self.locations.push(dir.to_path_buf());
        true
    }

    pub fn locations(&self) -> &[PathBuf] {
        &self.locations
    }

    /// Populates the registry from every location. Runs once; later calls return
    /// the first report.
    pub fn discover(&mut self) -> &DiscoveryReport {
        if self.discovered {
            return &self.report;
        }

        self.report = Scanner::new(&self.catalog)
            .with_reserved_prefix(self.reserved_prefix.clone())
            .with_disabled(self.disabled.iter().cloned())
            .scan(&self.locations, &mut self.registry);
        self.discovered = true;
        &self.report
    }

    /// Unloads every instance, forgets the registry and scans again.
    pub fn reload(&mut self) -> &DiscoveryReport {
        let unloaded = self.lifecycle.unload_all();
        tracing::info!("reloading plugins ({unloaded} unloaded)");

        self.registry = Registry::new();
        self.report = DiscoveryReport::default();
        self.discovered = false;
        self.discover()
    }

    pub fn report(&self) -> &DiscoveryReport {
        &self.report
    }

    pub fn list_descriptors(&self) -> Vec<(&str, &str)> {
        self.registry.list_descriptors()
    }

    pub fn find_descriptor(&self, name: &str) -> Option<&PluginDescriptor> {
        self.registry.find_descriptor(name)
    }

    pub fn get_or_create(&mut self, name: &str) -> Option<&mut ActivePlugin> {
        self.lifecycle.get_or_create(&self.registry, name)
    }

    pub fn try_get_or_create(&mut self, name: &str) -> Result<&mut ActivePlugin, LoadError> {
        self.lifecycle.try_get_or_create(&self.registry, name)
    }

    pub fn unload(&mut self, name: &str) -> bool {
        self.lifecycle.unload(name)
    }

    pub fn unload_all(&mut self) -> usize {
        self.lifecycle.unload_all()
    }

    pub fn instantiate_all(&mut self) -> usize {
        self.lifecycle.instantiate_all(&self.registry)
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.lifecycle.is_active(name)
    }

    pub fn active_names(&self) -> Vec<&str> {
        self.lifecycle.active_names()
    }

    pub fn plugin_count(&self) -> usize {
        self.registry.len()
    }

    pub fn error_count(&self) -> usize {
        self.report.error_count() + self.report.missing_locations.len()
    }

    pub fn startup_notifications(&self) -> Vec<String> {
        if self.report.candidates.is_empty() && self.report.missing_locations.is_empty() {
            return vec!["plugins: none discovered".to_string()];
        }

        let mut notices = vec![self.summary_notification()];
        notices.extend(self.error_notifications());
        notices
    }

    pub fn summary_notification(&self) -> String {
        format!(
            "plugins: {} discovered, {} active, {} disabled, {} errors",
            self.plugin_count(),
            self.lifecycle.active_count(),
            self.report.disabled_count(),
            self.error_count()
        )
    }

    pub fn error_notifications(&self) -> Vec<String> {
        let missing = self
            .report
            .missing_locations
            .iter()
            .map(|dir| format!("plugin directory not found: {}", dir.display()));

        let failures = self
            .report
            .failures()
            .map(|(source, err)| format!("plugin {}: {err}", source.display()));

        missing.chain(failures).collect()
    }

    /// One row per candidate, in discovery order.
    pub fn list_notifications(&self) -> Vec<String> {
        if self.report.candidates.is_empty() {
            return vec!["plugins: none discovered".to_string()];
        }

        self.report
            .candidates
            .iter()
            .map(|outcome| {
                let source = outcome.source.display();
                match &outcome.status {
                    CandidateStatus::Registered { name } => {
                        let status = if self.is_active(name) { "active" } else { "available" };
                        let description = self
                            .find_descriptor(name)
                            .map(PluginDescriptor::description)
                            .unwrap_or_default();
                        format!("plugin {name} [{status}] {description} ({source})")
                    }
                    CandidateStatus::Disabled { name } => {
                        format!("plugin {name} [disabled] ({source})")
                    }
                    CandidateStatus::Failed(err) => format!("plugin [error: {err}] ({source})"),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::tools::basic_block::BlockFoundation;
    use crate::tools::pipe_support::PipeSupport;
    use crate::plugin::contract::PluginMeta;

    fn write_manifest(root: &Path, dir: &str, module: &str) {
        let path = root.join(dir);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("plugin.toml"), format!("module = \"{module}\"\n")).unwrap();
    }

    fn config_for(dirs: &[&Path]) -> AppConfig {
        let dirs = dirs
            .iter()
            .map(|dir| format!("{:?}", dir.display().to_string()))
            .collect::<Vec<_>>()
            .join(", ");
        AppConfig::from_layers(
            include_str!("../../config/default.toml"),
            Some(&format!("[plugins]\ndirs = [{dirs}]\n")),
        )
        .unwrap()
    }

    #[test]
    fn test_from_config_discovers_and_serves_instances() {
        let root = tempfile::tempdir().unwrap();
        write_manifest(root.path(), "basic_block", "basic_block");
        write_manifest(root.path(), "pipe_support", "pipe_support");

        let mut manager = PluginManager::from_config(&config_for(&[root.path()]), Catalog::builtin());

        assert_eq!(
            manager.list_descriptors(),
            vec![
                (BlockFoundation::NAME, BlockFoundation::DESCRIPTION),
                (PipeSupport::NAME, PipeSupport::DESCRIPTION),
            ]
        );

        let key = manager.get_or_create(PipeSupport::NAME).unwrap().key();
        assert_eq!(manager.get_or_create(PipeSupport::NAME).unwrap().key(), key);
        assert_eq!(manager.active_names(), vec![PipeSupport::NAME]);
        assert!(manager.unload(PipeSupport::NAME));
        assert!(!manager.unload(PipeSupport::NAME));
        assert!(manager.get_or_create("Unknown Tool").is_none());
    }

    #[test]
    fn test_notifications_describe_discovery() {
        let root = tempfile::tempdir().unwrap();
        write_manifest(root.path(), "basic_block", "basic_block");
        write_manifest(root.path(), "broken", "no_such_module");
        let missing = root.path().join("missing");

        let mut manager =
            PluginManager::from_config(&config_for(&[root.path(), missing.as_path()]), Catalog::builtin());
        manager.get_or_create(BlockFoundation::NAME).unwrap();

        assert_eq!(
            manager.summary_notification(),
            "plugins: 1 discovered, 1 active, 0 disabled, 2 errors"
        );

        let errors = manager.error_notifications();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("plugin directory not found"));
        assert!(errors[1].contains("unknown module `no_such_module`"));

        let rows = manager.list_notifications();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("[active]"));
        assert!(rows[1].contains("[error:"));
        assert_eq!(manager.startup_notifications().len(), 3);
    }

    #[test]
    fn test_add_location_only_before_discovery() {
        let root = tempfile::tempdir().unwrap();
        let extra = tempfile::tempdir().unwrap();
        write_manifest(extra.path(), "pipe_support", "pipe_support");

        let mut manager = PluginManager::new(&config_for(&[root.path()]), Catalog::builtin());
        assert!(manager.add_location(extra.path()));
        assert!(!manager.add_location(extra.path()));
        assert!(!manager.add_location(root.path().join("nope")));
        assert_eq!(manager.locations().len(), 2);

        manager.discover();
        assert!(manager.find_descriptor(PipeSupport::NAME).is_some());
        assert!(!manager.add_location(tempfile::tempdir().unwrap().path()));
    }

    #[test]
    fn test_discover_runs_once_and_reload_rescans() {
        let root = tempfile::tempdir().unwrap();
        write_manifest(root.path(), "basic_block", "basic_block");

        let mut manager = PluginManager::from_config(&config_for(&[root.path()]), Catalog::builtin());
        manager.get_or_create(BlockFoundation::NAME).unwrap();

        write_manifest(root.path(), "pipe_support", "pipe_support");
        assert_eq!(manager.discover().registered_count(), 1);
        assert_eq!(manager.plugin_count(), 1);

        assert_eq!(manager.reload().registered_count(), 2);
        assert_eq!(manager.plugin_count(), 2);
        assert!(manager.active_names().is_empty());
    }

    #[test]
    fn test_disabled_plugins_from_config() {
        let root = tempfile::tempdir().unwrap();
        write_manifest(root.path(), "basic_block", "basic_block");
        write_manifest(root.path(), "pipe_support", "pipe_support");
        let mut config = config_for(&[root.path()]);
        config.plugins.disabled = vec![PipeSupport::NAME.to_string()];

        let mut manager = PluginManager::from_config(&config, Catalog::builtin());

        assert_eq!(manager.plugin_count(), 1);
        assert!(manager.get_or_create(PipeSupport::NAME).is_none());
        assert!(
            manager
                .list_notifications()
                .iter()
                .any(|row| row.contains("[disabled]"))
        );
    }

    #[test]
    fn test_instantiate_all_and_unload_all() {
        let root = tempfile::tempdir().unwrap();
        write_manifest(root.path(), "basic_block", "basic_block");
        write_manifest(root.path(), "pipe_support", "pipe_support");

        let mut manager = PluginManager::from_config(&config_for(&[root.path()]), Catalog::builtin());

        assert_eq!(manager.instantiate_all(), 2);
        assert_eq!(manager.unload_all(), 2);
        assert!(manager.active_names().is_empty());
    }
}
