pub mod catalog;
pub mod contract;
pub mod error;
pub mod lifecycle;
pub mod manager;
pub mod manifest;
pub mod registry;
pub mod scanner;

pub use catalog::Catalog;
pub use contract::{Plugin, PluginFactory, PluginMeta, Surface};
pub use error::{DiscoveryError, LoadError, PluginError};
pub use lifecycle::{ActivePlugin, InstanceKey, LifecycleController};
pub use manager::PluginManager;
pub use registry::{PluginDescriptor, Registry};
