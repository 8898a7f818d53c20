use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::plugin::contract::{Constructor, Plugin, PluginFactory};
use crate::plugin::error::{DiscoveryError, PluginError};

/// A discovered plugin that has not been instantiated.
pub struct PluginDescriptor {
    name: String,
    description: String,
    module: String,
    version: Option<String>,
    source: PathBuf,
    constructor: Constructor,
}

impl PluginDescriptor {
    pub fn new(
        factory: &PluginFactory,
        module: impl Into<String>,
        version: Option<String>,
        source: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: factory.name.to_string(),
            description: factory.description.to_string(),
            module: module.into(),
            version,
            source: source.into(),
            constructor: factory.construct,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub(crate) fn construct(&self) -> Result<Box<dyn Plugin>, PluginError> {
        (self.constructor)()
    }
}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("name", &self.name)
            .field("module", &self.module)
            .field("version", &self.version)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Discovered descriptors in discovery order, unique by name.
#[derive(Debug, Default)]
pub struct Registry {
    descriptors: Vec<PluginDescriptor>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a descriptor. The first descriptor registered under a name wins.
    pub(crate) fn insert(&mut self, descriptor: PluginDescriptor) -> Result<(), DiscoveryError> {
        if let Some(existing) = self.find_descriptor(descriptor.name()) {
            return Err(DiscoveryError::DuplicateName {
                name: descriptor.name,
                first: existing.source.clone(),
            });
        }

        self.index
            .insert(descriptor.name.clone(), self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// `(name, description)` pairs in discovery order.
    pub fn list_descriptors(&self) -> Vec<(&str, &str)> {
        self.descriptors
            .iter()
            .map(|descriptor| (descriptor.name(), descriptor.description()))
            .collect()
    }

    pub fn find_descriptor(&self, name: &str) -> Option<&PluginDescriptor> {
        self.index.get(name).map(|&idx| &self.descriptors[idx])
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.descriptors.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
