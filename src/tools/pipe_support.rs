use crate::plugin::contract::{Plugin, PluginMeta, Surface};
use crate::plugin::error::PluginError;
use crate::tools::form::{FieldSpec, FormSurface};

const SUPPORT_FORMS: &[&str] = &["Single pier", "Twin pier"];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::choice("form", "Support form", SUPPORT_FORMS),
    FieldSpec::number("plate_length", "Base plate length", "m", 1.2),
    FieldSpec::number("plate_width", "Base plate width", "m", 1.0),
    FieldSpec::number("pier_length", "Pier length", "m", 0.6),
    FieldSpec::number("pier_width", "Pier width", "m", 0.4),
    FieldSpec::number("top_width", "Top face width", "m", 0.4),
    FieldSpec::number("height", "Foundation height", "m", 1.5),
    FieldSpec::number("above_grade", "Height above grade", "m", 0.3),
    FieldSpec::number("cushion", "Cushion thickness", "mm", 100.0),
    FieldSpec::number("gravel_thickness", "Graded gravel thickness", "m", 0.0),
    FieldSpec::number("gravel_width", "Graded gravel width", "m", 0.0),
    FieldSpec::count("quantity", "Number of supports", 1),
];

/// Pipe support pier form.
#[derive(Debug, Default)]
pub struct PipeSupport;

impl Plugin for PipeSupport {
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

impl PluginMeta for PipeSupport {
    const NAME: &'static str = "Pipe Support";
    const DESCRIPTION: &'static str = "Inputs for pipe support piers and their base plates";

    fn construct() -> Result<Self, PluginError> {
        Ok(Self)
    }
}
