use crate::plugin::contract::Surface;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Number { default: f64 },
    Count { default: u32 },
    Choice {
        options: &'static [&'static str],
        selected: usize,
    },
    Text { placeholder: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub unit: Option<&'static str>,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn number(key: &'static str, label: &'static str, unit: &'static str, default: f64) -> Self {
        Self {
            key,
            label,
            unit: Some(unit),
            kind: FieldKind::Number { default },
        }
    }

    pub const fn count(key: &'static str, label: &'static str, default: u32) -> Self {
        Self {
            key,
            label,
            unit: None,
            kind: FieldKind::Count { default },
        }
    }

    pub const fn choice(key: &'static str, label: &'static str, options: &'static [&'static str]) -> Self {
        Self {
            key,
            label,
            unit: None,
            kind: FieldKind::Choice {
                options,
                selected: 0,
            },
        }
    }

    pub const fn text(key: &'static str, label: &'static str, placeholder: &'static str) -> Self {
        Self {
            key,
            label,
            unit: None,
            kind: FieldKind::Text { placeholder },
        }
    }

    fn render(&self) -> String {
        let value = match &self.kind {
            FieldKind::Number { default } => default.to_string(),
            FieldKind::Count { default } => default.to_string(),
            FieldKind::Choice { options, selected } => {
                let rendered: Vec<String> = options
                    .iter()
                    .enumerate()
                    .map(|(idx, option)| {
                        if idx == *selected {
                            format!("[{option}]")
                        } else {
                            option.to_string()
                        }
                    })
                    .collect();
                rendered.join(" / ")
            }
            FieldKind::Text { placeholder } => format!("<{placeholder}>"),
        };

        let mut line = format!("{}: {value}", self.label);
        if let Some(unit) = self.unit {
            line.push(' ');
            line.push_str(unit);
        }
        line
    }
}

/// A titled input form: the surface every built-in tool hands to the host.
#[derive(Debug, Clone)]
pub struct FormSurface {
    title: String,
    fields: Vec<FieldSpec>,
}

impl FormSurface {
    pub fn new(title: impl Into<String>, fields: &[FieldSpec]) -> Self {
        Self {
            title: title.into(),
            fields: fields.to_vec(),
        }
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.key == key)
    }
}

impl Surface for FormSurface {
    fn title(&self) -> &str {
        &self.title
    }

    fn lines(&self) -> Vec<String> {
        self.fields.iter().map(FieldSpec::render).collect()
    }
}
