use std::path::PathBuf;

use fugo_toolbox::model::config::AppConfig;
use fugo_toolbox::plugin::{Catalog, LoadError, PluginManager, PluginMeta};
use fugo_toolbox::tools::basic_block::BlockFoundation;
use fugo_toolbox::tools::column_force::ColumnForceTable;
use fugo_toolbox::tools::pipe_support::PipeSupport;
use fugo_toolbox::tools::steel_shape_table::SteelShapeTable;

fn shipped_plugins_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("plugins")
}

fn manager() -> PluginManager {
    let user = format!(
        "[plugins]\ndirs = [{:?}]\n",
        shipped_plugins_dir().display().to_string()
    );
    let config = AppConfig::from_layers(
        include_str!("../config/default.toml"),
        Some(&user),
    )
    .unwrap();
    PluginManager::from_config(&config, Catalog::builtin())
}

#[test]
fn shipped_plugins_are_discovered_in_directory_order() {
    let manager = manager();

    assert_eq!(manager.error_count(), 0);
    assert_eq!(manager.report().registered_count(), 4);
    assert!(manager.report().missing_locations.is_empty());
    assert_eq!(
        manager.list_descriptors(),
        vec![
            (BlockFoundation::NAME, BlockFoundation::DESCRIPTION),
            (PipeSupport::NAME, PipeSupport::DESCRIPTION),
            (SteelShapeTable::NAME, SteelShapeTable::DESCRIPTION),
            (ColumnForceTable::NAME, ColumnForceTable::DESCRIPTION),
        ]
    );

    let descriptor = manager.find_descriptor(SteelShapeTable::NAME).unwrap();
    assert_eq!(descriptor.module(), "steel_shape_table");
    assert_eq!(descriptor.version(), Some("1.0.0"));
    assert!(descriptor.source().ends_with("steel_shape_table"));
}

#[test]
fn nothing_is_instantiated_by_discovery() {
    let manager = manager();
    assert!(manager.active_names().is_empty());
    assert!(manager.summary_notification().contains("0 active"));
}

#[test]
fn instances_are_cached_until_unloaded() {
    let mut manager = manager();

    let first = manager.get_or_create(SteelShapeTable::NAME).unwrap().key();
    let again = manager.get_or_create(SteelShapeTable::NAME).unwrap().key();
    assert_eq!(first, again);

    assert!(manager.unload(SteelShapeTable::NAME));
    assert!(!manager.unload(SteelShapeTable::NAME));

    let fresh = manager.get_or_create(SteelShapeTable::NAME).unwrap();
    assert_ne!(fresh.key(), first);
    assert_eq!(fresh.create_surface().title(), SteelShapeTable::NAME);
}

#[test]
fn unknown_tools_are_absent_not_errors() {
    let mut manager = manager();

    assert!(manager.get_or_create("Concrete Mixer").is_none());
    assert!(matches!(
        manager.try_get_or_create("Concrete Mixer"),
        Err(LoadError::NotFound(name)) if name == "Concrete Mixer"
    ));
    assert_eq!(manager.plugin_count(), 4);
}

#[test]
fn instantiate_all_then_unload_all() {
    let mut manager = manager();

    assert_eq!(manager.instantiate_all(), 4);
    assert_eq!(
        manager.active_names(),
        vec![
            BlockFoundation::NAME,
            PipeSupport::NAME,
            SteelShapeTable::NAME,
            ColumnForceTable::NAME,
        ]
    );
    assert_eq!(manager.unload_all(), 4);
    assert!(manager.active_names().is_empty());
}
