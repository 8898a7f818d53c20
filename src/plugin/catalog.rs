//! Compile-time table of plugin modules.
//!
//! A discovered `plugin.toml` names a module key; the catalog maps that key to
//! the plugin factories compiled into the binary.

use crate::plugin::contract::PluginFactory;

#[derive(Debug, Clone)]
pub struct ModuleExports {
    pub module: String,
    pub plugins: Vec<PluginFactory>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    modules: Vec<ModuleExports>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog of the tools shipped with the toolbox.
    pub fn builtin() -> Self {
        crate::tools::builtin_modules()
            .into_iter()
            .fold(Self::new(), |catalog, (module, plugins)| {
                catalog.with_module(module, plugins)
            })
    }

    /// Adds a module. A module key registered twice keeps its first exports.
    pub fn with_module(mut self, module: impl Into<String>, plugins: Vec<PluginFactory>) -> Self {
        let module = module.into();
        if self.lookup(&module).is_some() {
            tracing::warn!("plugin module `{module}` registered twice, keeping the first");
            return self;
        }

        self.modules.push(ModuleExports { module, plugins });
        self
    }

    pub fn lookup(&self, module: &str) -> Option<&ModuleExports> {
        self.modules.iter().find(|exports| exports.module == module)
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleExports> {
        self.modules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_modules_export_one_plugin_each() {
        let catalog = Catalog::builtin();
        let modules: Vec<_> = catalog.modules().collect();

        assert_eq!(modules.len(), 4);
        for exports in modules {
            assert_eq!(exports.plugins.len(), 1, "module {}", exports.module);
        }
    }

    #[test]
    fn test_first_module_key_wins() {
        let catalog = Catalog::new()
            .with_module("dup", Vec::new())
            .with_module("dup", crate::tools::builtin_modules()[0].1.clone());

        assert!(catalog.lookup("dup").unwrap().plugins.is_empty());
        assert!(catalog.lookup("missing").is_none());
    }
}
