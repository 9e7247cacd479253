//! Declarative descriptors: what a YAML/JSON file says to build.
//!
//! Descriptors are plain serde structs. Structural checks that do not depend
//! on a widget kind live here; kind-specific option checks happen in the
//! widget constructors.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::{ConstructionError, Format};

// ───────────────────────────────────────── widget kinds ──────

/// The closed set of widget kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Text,
    MultilineText,
    Boolean,
    SingleChoiceGroup,
    NumericRange,
    Path,
    StaticLabel,
}

impl WidgetKind {
    pub const ALL: &[WidgetKind] = &[
        WidgetKind::Text,
        WidgetKind::MultilineText,
        WidgetKind::Boolean,
        WidgetKind::SingleChoiceGroup,
        WidgetKind::NumericRange,
        WidgetKind::Path,
        WidgetKind::StaticLabel,
    ];

    /// Canonical spelling used in descriptor files.
    pub fn as_str(self) -> &'static str {
        match self {
            WidgetKind::Text => "text",
            WidgetKind::MultilineText => "multiline-text",
            WidgetKind::Boolean => "boolean",
            WidgetKind::SingleChoiceGroup => "single-choice-group",
            WidgetKind::NumericRange => "numeric-range",
            WidgetKind::Path => "path",
            WidgetKind::StaticLabel => "static-label",
        }
    }

    /// Accepts the canonical spelling and the short aliases
    /// (`textinput`, `textarea`, `checkbox`, …).
    pub fn parse(s: &str) -> Option<Self> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "text" | "textinput" | "text-input" => WidgetKind::Text,
            "multiline-text" | "textarea" | "text-area" => WidgetKind::MultilineText,
            "boolean" | "checkbox" => WidgetKind::Boolean,
            "single-choice-group" | "radiogroup" | "radio-group" | "radio" => {
                WidgetKind::SingleChoiceGroup
            }
            "numeric-range" | "slider" => WidgetKind::NumericRange,
            "path" | "filepicker" | "file-picker" => WidgetKind::Path,
            "static-label" | "label" => WidgetKind::StaticLabel,
            _ => return None,
        };
        Some(kind)
    }
}

// ───────────────────────────────────────── descriptors ───────

/// Declarative description of one widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetDescriptor {
    #[serde(alias = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl WidgetDescriptor {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: serde_json::Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn option(mut self, key: &str, value: serde_json::Value) -> Self {
        self.options.insert(key.to_string(), value);
        self
    }

    /// Name and kind checks shared by every kind.
    pub fn validate(&self) -> Result<WidgetKind, ConstructionError> {
        if self.name.trim().is_empty() {
            return Err(ConstructionError::invalid(&self.name, "name must not be empty"));
        }
        WidgetKind::parse(&self.kind).ok_or_else(|| ConstructionError::UnsupportedKind {
            name: self.name.clone(),
            kind: self.kind.clone(),
        })
    }
}

/// Stacking direction of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    #[default]
    Vertical,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormDescriptor {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "components")]
    pub widgets: Vec<WidgetDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutDescriptor {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "layout")]
    pub axis: Axis,
    #[serde(alias = "components")]
    pub widgets: Vec<WidgetDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupDescriptor {
    pub name: String,
    pub label: String,
    #[serde(alias = "components")]
    pub widgets: Vec<WidgetDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabsDescriptor {
    #[serde(default)]
    pub title: String,
    #[serde(alias = "tabs")]
    pub groups: Vec<GroupDescriptor>,
}

impl FormDescriptor {
    pub fn validate(&self) -> Result<(), ConstructionError> {
        check_flat("form", &self.widgets)
    }
}

impl LayoutDescriptor {
    pub fn validate(&self) -> Result<(), ConstructionError> {
        check_flat("layout", &self.widgets)
    }
}

impl GroupDescriptor {
    pub fn validate(&self) -> Result<(), ConstructionError> {
        if self.name.trim().is_empty() {
            return Err(ConstructionError::invalid(&self.name, "group name must not be empty"));
        }
        if self.label.trim().is_empty() {
            return Err(ConstructionError::invalid(&self.name, "group label must not be empty"));
        }
        unique_names(&self.widgets)
    }
}

impl TabsDescriptor {
    pub fn validate(&self) -> Result<(), ConstructionError> {
        if self.groups.is_empty() {
            return Err(ConstructionError::invalid("tabs", "at least one group is required"));
        }
        self.groups.iter().enumerate().try_for_each(|(index, group)| {
            group
                .validate()
                .map_err(|source| ConstructionError::in_group(index, &group.name, source))
        })
    }
}

fn check_flat(container: &str, widgets: &[WidgetDescriptor]) -> Result<(), ConstructionError> {
    if widgets.is_empty() {
        return Err(ConstructionError::invalid(
            container,
            "at least one widget is required",
        ));
    }
    unique_names(widgets)
}

/// A repeated name is reported at the position of its second occurrence,
/// wrapped the same way a failed batch build is.
pub(crate) fn unique_names(widgets: &[WidgetDescriptor]) -> Result<(), ConstructionError> {
    let mut seen = HashSet::new();
    for (index, w) in widgets.iter().enumerate() {
        if !seen.insert(w.name.as_str()) {
            return Err(ConstructionError::Batch {
                index,
                name: w.name.clone(),
                source: Box::new(ConstructionError::DuplicateName { name: w.name.clone() }),
            });
        }
    }
    Ok(())
}

// ───────────────────────────────────────── loading ───────────

/// Read a descriptor file. `.json` is parsed as JSON, everything else as YAML
/// (a superset of JSON).
pub fn load<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    Format::from_path(path)
        .decode(&contents)
        .with_context(|| format!("parsing {}", path.display()))
}
