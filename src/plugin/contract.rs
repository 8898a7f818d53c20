use std::fmt;

use crate::plugin::error::PluginError;

/// The object a plugin hands to the host for display. The manager never looks inside it.
pub trait Surface: fmt::Debug {
    fn title(&self) -> &str;

    /// Plain-text rendering, one entry per line.
    fn lines(&self) -> Vec<String>;
}

/// Capability set every calculation tool implements.
pub trait Plugin {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn create_surface(&mut self) -> Box<dyn Surface>;

    /// Runs once, right after construction and before the instance is handed out.
    /// An error here aborts the instantiation.
    fn on_activate(&mut self) -> Result<(), PluginError> {
        Ok(())
    }

    /// Runs once on explicit unload. Errors are logged by the caller and otherwise ignored.
    fn on_deactivate(&mut self) -> Result<(), PluginError> {
        Ok(())
    }
}

/// Static identity of a plugin type, readable without constructing it.
pub trait PluginMeta: Plugin + Sized + 'static {
    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    fn construct() -> Result<Self, PluginError>;
}

pub type Constructor = fn() -> Result<Box<dyn Plugin>, PluginError>;

fn construct_boxed<T: PluginMeta>() -> Result<Box<dyn Plugin>, PluginError> {
    T::construct().map(|plugin| Box::new(plugin) as Box<dyn Plugin>)
}

/// Metadata plus constructor for one plugin type, as exported by a catalog module.
#[derive(Clone, Copy)]
pub struct PluginFactory {
    pub name: &'static str,
    pub description: &'static str,
    pub construct: Constructor,
}

impl PluginFactory {
    pub const fn of<T: PluginMeta>() -> Self {
        Self {
            name: T::NAME,
            description: T::DESCRIPTION,
            construct: construct_boxed::<T>,
        }
    }
}

impl fmt::Debug for PluginFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginFactory")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
