use crate::plugin::contract::{Plugin, PluginMeta, Surface};
use crate::plugin::error::PluginError;
use crate::tools::form::{FieldSpec, FormSurface};

const CONCRETE_GRADES: &[&str] = &["C25", "C30", "C35", "C40"];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::number("length", "Foundation length", "m", 2.0),
    FieldSpec::number("width", "Foundation width", "m", 1.5),
    FieldSpec::number("height", "Foundation height", "m", 1.2),
    FieldSpec::number("above_grade", "Height above grade", "m", 0.3),
    FieldSpec::number("cushion", "Cushion thickness", "m", 0.1),
    FieldSpec::number("grout", "Secondary grout thickness", "mm", 50.0),
    FieldSpec::choice("concrete", "Foundation concrete", CONCRETE_GRADES),
    FieldSpec::number("bearing", "Allowable bearing capacity", "kPa", 150.0),
    FieldSpec::number("load", "Superstructure load", "kN", 100.0),
    FieldSpec::number("backfill_thickness", "Replacement fill thickness", "m", 0.0),
    FieldSpec::number("backfill_width", "Replacement fill width", "m", 0.0),
    FieldSpec::count("anchor_bolts", "Anchor bolts", 4),
];

/// Block foundation sizing form.
#[derive(Debug, Default)]
pub struct BlockFoundation {
    surfaces_opened: usize,
}

impl Plugin for BlockFoundation {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn create_surface(&mut self) -> Box<dyn Surface> {
        self.surfaces_opened += 1;
        Box::new(FormSurface::new(Self::NAME, FIELDS))
    }

    fn on_deactivate(&mut self) -> Result<(), PluginError> {
        tracing::debug!(
            "{} closing after {} surfaces",
            Self::NAME,
            self.surfaces_opened
        );
        self.surfaces_opened = 0;
        Ok(())
    }
}

impl PluginMeta for BlockFoundation {
    const NAME: &'static str = "Block Foundation";
    const DESCRIPTION: &'static str = "Sizing inputs for concrete block equipment foundations";

    fn construct() -> Result<Self, PluginError> {
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_counter_resets_on_deactivate() {
        let mut plugin = BlockFoundation::construct().unwrap();
        plugin.create_surface();
        plugin.create_surface();
        assert_eq!(plugin.surfaces_opened, 2);

        plugin.on_deactivate().unwrap();
        assert_eq!(plugin.surfaces_opened, 0);
    }
}
