//! Descriptor → widget construction.

use std::collections::HashSet;

use super::{AnyWidget, Checkbox, PathPicker, RadioGroup, Slider, StaticLabel, TextArea, TextInput};
use crate::core::ConstructionError;
use crate::descriptor::{GroupDescriptor, WidgetDescriptor, WidgetKind};

/// Build one widget. Fails on an empty name, an unknown kind, or a
/// kind-specific construction problem (no items, `min >= max`, bad pattern).
pub fn build(desc: &WidgetDescriptor) -> Result<AnyWidget, ConstructionError> {
    let kind = desc.validate()?;
    let widget = match kind {
        WidgetKind::Text => AnyWidget::Text(TextInput::from_descriptor(desc)?),
        WidgetKind::MultilineText => AnyWidget::MultilineText(TextArea::from_descriptor(desc)?),
        WidgetKind::Boolean => AnyWidget::Boolean(Checkbox::from_descriptor(desc)?),
        WidgetKind::SingleChoiceGroup => AnyWidget::Choice(RadioGroup::from_descriptor(desc)?),
        WidgetKind::NumericRange => AnyWidget::Range(Slider::from_descriptor(desc)?),
        WidgetKind::Path => AnyWidget::Path(PathPicker::from_descriptor(desc)?),
        WidgetKind::StaticLabel => AnyWidget::Label(StaticLabel::from_descriptor(desc)?),
    };
    tracing::debug!(name = %desc.name, kind = kind.as_str(), "built widget");
    Ok(widget)
}

/// Build a batch, all or nothing. The first failure aborts the batch and is
/// reported with its position and name; duplicate names count as failures.
pub fn build_all(descs: &[WidgetDescriptor]) -> Result<Vec<AnyWidget>, ConstructionError> {
    let mut seen = HashSet::new();
    descs
        .iter()
        .enumerate()
        .map(|(index, desc)| {
            let outcome = if seen.insert(desc.name.as_str()) {
                build(desc)
            } else {
                Err(ConstructionError::DuplicateName {
                    name: desc.name.clone(),
                })
            };
            outcome.map_err(|source| {
                tracing::warn!(index, name = %desc.name, %source, "batch build aborted");
                ConstructionError::Batch {
                    index,
                    name: desc.name.clone(),
                    source: Box::new(source),
                }
            })
        })
        .collect()
}

/// Build the widgets of one tab group. The group itself needs a non-empty
/// name and label; the widgets follow [`build_all`].
pub fn build_group(desc: &GroupDescriptor) -> Result<Vec<AnyWidget>, ConstructionError> {
    desc.validate()?;
    let widgets = build_all(&desc.widgets)?;
    tracing::debug!(group = %desc.name, widgets = widgets.len(), "built group");
    Ok(widgets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Widget;
    use serde_json::json;

    #[test]
    fn test_build_each_kind() {
        let descs = [
            WidgetDescriptor::new("text", "a"),
            WidgetDescriptor::new("multiline-text", "b"),
            WidgetDescriptor::new("boolean", "c"),
            WidgetDescriptor::new("single-choice-group", "d")
                .option("items", json!([{"id": "x", "label": "X"}])),
            WidgetDescriptor::new("numeric-range", "e"),
            WidgetDescriptor::new("path", "f"),
            WidgetDescriptor::new("static-label", "g").label("hi"),
        ];
        let widgets = build_all(&descs).unwrap();
        let names: Vec<_> = widgets.iter().map(|w| w.name()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "e", "f", "g"]);
        assert!(!widgets[6].can_focus());
    }

    #[test]
    fn test_unsupported_kind() {
        assert!(matches!(
            build(&WidgetDescriptor::new("color-picker", "c")),
            Err(ConstructionError::UnsupportedKind { .. })
        ));
    }

    #[test]
    fn test_batch_reports_position_and_name() {
        let descs = [
            WidgetDescriptor::new("text", "ok"),
            WidgetDescriptor::new("slider", "vol")
                .option("min", json!(5))
                .option("max", json!(1)),
            WidgetDescriptor::new("bogus", "never-built"),
        ];
        let err = build_all(&descs).unwrap_err();
        match &err {
            ConstructionError::Batch { index, name, .. } => {
                assert_eq!(*index, 1);
                assert_eq!(name, "vol");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(err.root_cause(), ConstructionError::InvalidDescriptor { .. }));
    }

    #[test]
    fn test_batch_rejects_duplicate_names() {
        let descs = [WidgetDescriptor::new("text", "x"), WidgetDescriptor::new("boolean", "x")];
        let err = build_all(&descs).unwrap_err();
        assert!(matches!(err.root_cause(), ConstructionError::DuplicateName { .. }));
    }

    #[test]
    fn test_build_group_requires_label() {
        let mut group = GroupDescriptor {
            name: "g1".into(),
            label: String::new(),
            widgets: vec![WidgetDescriptor::new("text", "user")],
        };
        assert!(matches!(
            build_group(&group),
            Err(ConstructionError::InvalidDescriptor { .. })
        ));
        group.label = "General".into();
        assert_eq!(build_group(&group).unwrap().len(), 1);
    }
}
