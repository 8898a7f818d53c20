use std::fmt;

use slotmap::{SlotMap, new_key_type};

use crate::plugin::contract::{Plugin, Surface};
use crate::plugin::error::LoadError;
use crate::plugin::registry::Registry;

new_key_type! {
    /// Identity of one live instance. A key is never handed out again once its
    /// instance has been unloaded.
    pub struct InstanceKey;
}

/// A constructed and activated plugin owned by the [`LifecycleController`].
pub struct ActivePlugin {
    key: InstanceKey,
    name: String,
    plugin: Box<dyn Plugin>,
}

impl ActivePlugin {
    pub fn key(&self) -> InstanceKey {
        self.key
    }

    /// Registry name the instance was created under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn plugin(&self) -> &dyn Plugin {
        self.plugin.as_ref()
    }

    pub fn create_surface(&mut self) -> Box<dyn Surface> {
        self.plugin.create_surface()
    }
}

impl fmt::Debug for ActivePlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivePlugin")
            .field("key", &self.key)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Instance cache: at most one active instance per plugin name.
#[derive(Debug, Default)]
pub struct LifecycleController {
    instances: SlotMap<InstanceKey, ActivePlugin>,
    // activation order
    active: Vec<(String, InstanceKey)>,
}

impl LifecycleController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the active instance for `name`, instantiating and activating it
    /// on first use. Unknown names and failed activations yield `None`.
    pub fn get_or_create(&mut self, registry: &Registry, name: &str) -> Option<&mut ActivePlugin> {
        match self.try_get_or_create(registry, name) {
            Ok(active) => Some(active),
            Err(err) if err.is_not_found() => {
                tracing::debug!("plugin not found in registry: {name}");
                None
            }
            Err(err) => {
                tracing::error!("{err}");
                None
            }
        }
    }

    pub fn try_get_or_create(
        &mut self,
        registry: &Registry,
        name: &str,
    ) -> Result<&mut ActivePlugin, LoadError> {
        if let Some(key) = self.key_of(name) {
            tracing::debug!("plugin already active: {name}");
            return Ok(&mut self.instances[key]);
        }

        let descriptor = registry
            .find_descriptor(name)
            .ok_or_else(|| LoadError::NotFound(name.to_string()))?;

        tracing::info!(
            "instantiating plugin: {name} ({})",
            descriptor.source().display()
        );

        let mut plugin = descriptor.construct().map_err(|source| LoadError::Construct {
            name: name.to_string(),
            source,
        })?;

        if plugin.name() != descriptor.name() {
            return Err(LoadError::NameMismatch {
                expected: descriptor.name().to_string(),
                actual: plugin.name().to_string(),
            });
        }

        // A plugin that fails activation is dropped here and never cached.
        plugin.on_activate().map_err(|source| LoadError::Activate {
            name: name.to_string(),
            source,
        })?;

        let name = descriptor.name().to_string();
        let key = self.instances.insert_with_key(|key| ActivePlugin {
            key,
            name: name.clone(),
            plugin,
        });
        self.active.push((name, key));

        Ok(&mut self.instances[key])
    }

    pub fn get(&self, name: &str) -> Option<&ActivePlugin> {
        self.key_of(name).map(|key| &self.instances[key])
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.key_of(name).is_some()
    }

    pub fn active_names(&self) -> Vec<&str> {
        self.active.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Deactivates and drops the instance for `name`. Returns `false` when
    /// nothing was active under that name.
    pub fn unload(&mut self, name: &str) -> bool {
        let Some(pos) = self.active.iter().position(|(active, _)| active == name) else {
            return false;
        };

        let (_, key) = self.active.remove(pos);
        if let Some(instance) = self.instances.remove(key) {
            deactivate(instance);
        }
        true
    }

    /// Unloads every active instance, most recently activated first.
    pub fn unload_all(&mut self) -> usize {
        let mut unloaded = 0;
        while let Some((_, key)) = self.active.pop() {
            if let Some(instance) = self.instances.remove(key) {
                deactivate(instance);
                unloaded += 1;
            }
        }
        unloaded
    }

    /// Activates every registered plugin in discovery order, skipping failures.
    /// Returns the number of active instances afterwards.
    pub fn instantiate_all(&mut self, registry: &Registry) -> usize {
        tracing::info!("instantiating all plugins");
        for descriptor in registry.descriptors() {
            let _ = self.get_or_create(registry, descriptor.name());
        }
        tracing::info!("instantiated {} plugins", self.active_count());
        self.active_count()
    }

    fn key_of(&self, name: &str) -> Option<InstanceKey> {
        self.active
            .iter()
            .find(|(active, _)| active == name)
            .map(|(_, key)| *key)
    }
}

impl Drop for LifecycleController {
    fn drop(&mut self) {
        if !self.active.is_empty() {
            self.unload_all();
        }
    }
}

fn deactivate(instance: ActivePlugin) {
    let ActivePlugin {
        name, mut plugin, ..
    } = instance;

    match plugin.on_deactivate() {
        Ok(()) => tracing::info!("unloaded plugin: {name}"),
        Err(err) => tracing::error!("failed to deactivate plugin {name}: {err}"),
    }
}
