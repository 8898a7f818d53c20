//! Discovery: turns plugin directories into registry descriptors.
//!
//! Each immediate subdirectory of a location is a candidate. A candidate
//! carries a `plugin.toml` naming a catalog module, and that module must export
//! exactly one plugin. Metadata comes from the factory's static data, so
//! nothing is constructed while scanning. A failing candidate is recorded in
//! the [`DiscoveryReport`] and never stops the scan.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::plugin::catalog::Catalog;
use crate::plugin::error::DiscoveryError;
use crate::plugin::manifest::PluginManifest;
use crate::plugin::registry::{PluginDescriptor, Registry};

pub const DEFAULT_RESERVED_PREFIX: &str = "_";

#[derive(Debug)]
pub enum CandidateStatus {
    Registered { name: String },
    Disabled { name: String },
    Failed(DiscoveryError),
}

#[derive(Debug)]
pub struct CandidateOutcome {
    pub source: PathBuf,
    pub status: CandidateStatus,
}

#[derive(Debug, Default)]
pub struct DiscoveryReport {
    pub candidates: Vec<CandidateOutcome>,
    pub missing_locations: Vec<PathBuf>,
}

impl DiscoveryReport {
    pub fn registered_count(&self) -> usize {
        self.candidates
            .iter()
            .filter(|outcome| matches!(outcome.status, CandidateStatus::Registered { .. }))
            .count()
    }

    pub fn disabled_count(&self) -> usize {
        self.candidates
            .iter()
            .filter(|outcome| matches!(outcome.status, CandidateStatus::Disabled { .. }))
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &DiscoveryError)> {
        self.candidates.iter().filter_map(|outcome| match &outcome.status {
            CandidateStatus::Failed(err) => Some((outcome.source.as_path(), err)),
            _ => None,
        })
    }

    pub fn error_count(&self) -> usize {
        self.failures().count()
    }
}

#[derive(Debug)]
pub struct Scanner<'a> {
    catalog: &'a Catalog,
    reserved_prefix: String,
    disabled: HashSet<String>,
}

impl<'a> Scanner<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            reserved_prefix: DEFAULT_RESERVED_PREFIX.to_string(),
            disabled: HashSet::new(),
        }
    }

    /// Directory names starting with `prefix` are skipped. An empty prefix skips nothing.
    pub fn with_reserved_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.reserved_prefix = prefix.into();
        self
    }

    pub fn with_disabled<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled.extend(names.into_iter().map(Into::into));
        self
    }

    /// Scans `locations` in order and appends every valid candidate to `registry`.
    pub fn scan(&self, locations: &[PathBuf], registry: &mut Registry) -> DiscoveryReport {
        tracing::info!("discovering plugins in {} locations", locations.len());

        let mut report = DiscoveryReport::default();
        for location in locations {
            self.scan_location(location, registry, &mut report);
        }

        tracing::info!(
            "discovered {} plugins ({} skipped with errors)",
            report.registered_count(),
            report.error_count()
        );
        report
    }

    fn scan_location(&self, location: &Path, registry: &mut Registry, report: &mut DiscoveryReport) {
        if !location.is_dir() {
            tracing::warn!("plugin directory not found: {}", location.display());
            report.missing_locations.push(location.to_path_buf());
            return;
        }

        let walker = WalkBuilder::new(location)
            .standard_filters(false)
            .follow_links(true)
            .max_depth(Some(1))
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("failed to read entry in {}: {err}", location.display());
                    continue;
                }
            };

            if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                continue;
            }

            let dir_name = entry.file_name().to_string_lossy();
            if self.is_reserved(&dir_name) {
                tracing::debug!("skipping reserved directory: {}", entry.path().display());
                continue;
            }

            let source = entry.path().to_path_buf();
            let status = self.register_candidate(&source, registry);
            report.candidates.push(CandidateOutcome { source, status });
        }
    }

    fn register_candidate(&self, candidate: &Path, registry: &mut Registry) -> CandidateStatus {
        let result = self.load_candidate(candidate).and_then(|descriptor| {
            let name = descriptor.name().to_string();
            if self.disabled.contains(&name) {
                return Ok(CandidateStatus::Disabled { name });
            }
            registry.insert(descriptor)?;
            Ok(CandidateStatus::Registered { name })
        });

        match result {
            Ok(CandidateStatus::Registered { name }) => {
                tracing::info!("discovered plugin: {name} ({})", candidate.display());
                CandidateStatus::Registered { name }
            }
            Ok(status) => {
                tracing::info!("plugin disabled by configuration: {}", candidate.display());
                status
            }
            Err(err) => {
                tracing::warn!("skipping plugin candidate {}: {err}", candidate.display());
                CandidateStatus::Failed(err)
            }
        }
    }

    fn load_candidate(&self, candidate: &Path) -> Result<PluginDescriptor, DiscoveryError> {
        let manifest = PluginManifest::read(candidate)?;

        let exports = self
            .catalog
            .lookup(&manifest.module)
            .ok_or_else(|| DiscoveryError::UnknownModule(manifest.module.clone()))?;

        let factory = match exports.plugins.as_slice() {
            [factory] => factory,
            [] => return Err(DiscoveryError::NoPluginExported(manifest.module)),
            many => {
                return Err(DiscoveryError::AmbiguousExports {
                    module: manifest.module,
                    count: many.len(),
                });
            }
        };

        if factory.name.trim().is_empty() {
            return Err(DiscoveryError::BlankName(manifest.module));
        }

        Ok(PluginDescriptor::new(
            factory,
            manifest.module,
            manifest.version,
            candidate,
        ))
    }

    fn is_reserved(&self, dir_name: &str) -> bool {
        !self.reserved_prefix.is_empty() && dir_name.starts_with(&self.reserved_prefix)
    }
}
