use crate::plugin::contract::{Plugin, PluginMeta, Surface};
use crate::plugin::error::PluginError;
use crate::tools::form::{FieldSpec, FormSurface};

const SHAPE_FAMILIES: &[&str] = &[
    "Hot-rolled H",
    "Hot-rolled I",
    "Channel",
    "Equal angle",
    "Unequal angle",
    "Circular hollow",
];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::choice("family", "Shape type", SHAPE_FAMILIES),
    FieldSpec::text("search", "Search", "designation keyword, e.g. 100"),
];

/// Section property lookup for rolled steel shapes.
#[derive(Debug, Default)]
pub struct SteelShapeTable {
    families: Vec<&'static str>,
}

impl Plugin for SteelShapeTable {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn create_surface(&mut self) -> Box<dyn Surface> {
        Box::new(FormSurface::new(Self::NAME, FIELDS))
    }

    fn on_activate(&mut self) -> Result<(), PluginError> {
        self.families = SHAPE_FAMILIES.to_vec();
        tracing::debug!("{} loaded {} shape families", Self::NAME, self.families.len());
        Ok(())
    }

    fn on_deactivate(&mut self) -> Result<(), PluginError> {
        self.families.clear();
        Ok(())
    }
}

impl PluginMeta for SteelShapeTable {
    const NAME: &'static str = "Steel Shape Table";
    const DESCRIPTION: &'static str = "Section properties of rolled steel shapes";

    fn construct() -> Result<Self, PluginError> {
        Ok(Self::default())
    }
}
