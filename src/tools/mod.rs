//! Calculation tools compiled into the toolbox.

pub mod basic_block;
pub mod column_force;
pub mod form;
pub mod pipe_support;
pub mod steel_shape_table;

use crate::plugin::contract::PluginFactory;

pub use form::{FieldKind, FieldSpec, FormSurface};

/// Module keys as referenced by `plugin.toml`, with the plugins each module exports.
pub fn builtin_modules() -> Vec<(&'static str, Vec<PluginFactory>)> {
    vec![
        (
            "basic_block",
            vec![PluginFactory::of::<basic_block::BlockFoundation>()],
        ),
        (
            "pipe_support",
            vec![PluginFactory::of::<pipe_support::PipeSupport>()],
        ),
        (
            "steel_shape_table",
            vec![PluginFactory::of::<steel_shape_table::SteelShapeTable>()],
        ),
        (
            "yjk_column_force",
            vec![PluginFactory::of::<column_force::ColumnForceTable>()],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_constructs_and_activates() {
        for (module, factories) in builtin_modules() {
            for factory in factories {
                let mut plugin = (factory.construct)().unwrap();
                assert_eq!(plugin.name(), factory.name, "module {module}");
                assert_eq!(plugin.description(), factory.description);
                plugin.on_activate().unwrap();

                let surface = plugin.create_surface();
                assert_eq!(surface.title(), factory.name);
                assert!(!surface.lines().is_empty());

                plugin.on_deactivate().unwrap();
            }
        }
    }

    #[test]
    fn test_builtin_names_are_unique() {
        let mut names: Vec<_> = builtin_modules()
            .into_iter()
            .flat_map(|(_, factories)| factories.into_iter().map(|factory| factory.name))
            .collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
