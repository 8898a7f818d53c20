use crate::plugin::contract::{Plugin, PluginMeta, Surface};
use crate::plugin::error::PluginError;
use crate::tools::form::{FieldSpec, FormSurface};

const EXPORT_SETS: &[&str] = &["Compression", "Tension", "All forces"];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("input", "YJK force file", "no file selected"),
    FieldSpec::choice("export", "Export", EXPORT_SETS),
];

/// Reformats YJK column base force tables.
#[derive(Debug, Default)]
pub struct ColumnForceTable;

impl Plugin for ColumnForceTable {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn create_surface(&mut self) -> Box<dyn Surface> {
        Box::new(FormSurface::new(Self::NAME, FIELDS))
    }
}

impl PluginMeta for ColumnForceTable {
    const NAME: &'static str = "YJK Column Force";
    const DESCRIPTION: &'static str =
        "Reformats YJK column base forces into compression, tension or full tables";

    fn construct() -> Result<Self, PluginError> {
        Ok(Self)
    }
}
