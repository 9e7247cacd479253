//! Single-choice group: a list of `{id, label}` items with at most one
//! selected.
//!
//! The highlight cursor and the selection are separate: `↑/↓` move the
//! cursor (clamped at both ends), `Enter`/`Space` select the item under it.

use crossterm::event::KeyCode;

use super::options::Options;
use super::{pressed, EventResult, Field, Widget};
use crate::app::event::AppEvent;
use crate::core::{ConstructionError, Value, ValueError, ValueKind};
use crate::descriptor::WidgetDescriptor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceItem {
    pub id: String,
    pub label: String,
}

impl ChoiceItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug)]
pub struct RadioGroup {
    field: Field,
    items: Vec<ChoiceItem>,
    cursor: usize,
    selected: Option<usize>,
    initial: Option<usize>,
}

impl RadioGroup {
    pub fn from_descriptor(desc: &WidgetDescriptor) -> Result<Self, ConstructionError> {
        let opts = Options::new(desc);
        let items: Vec<ChoiceItem> = opts
            .array("items")?
            .iter()
            .filter_map(|raw| {
                let id = raw.get("id")?.as_str().filter(|id| !id.is_empty())?;
                let label = match raw.get("label").and_then(|l| l.as_str()) {
                    Some(label) if !label.is_empty() => label,
                    _ => id,
                };
                Some(ChoiceItem::new(id, label))
            })
            .collect();
        if items.is_empty() {
            return Err(ConstructionError::invalid(
                &desc.name,
                "at least one item with a non-empty id is required",
            ));
        }

        let initial = match opts.default_str()? {
            Some(id) => {
                let found = items.iter().position(|item| item.id == id);
                if found.is_none() {
                    tracing::warn!(name = %desc.name, id, "default is not an item id, ignoring");
                }
                found
            }
            None => None,
        };

        Ok(Self {
            field: Field::from_descriptor(desc),
            items,
            cursor: initial.unwrap_or(0),
            selected: initial,
            initial,
        })
    }

    pub fn items(&self) -> &[ChoiceItem] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.map(|i| self.items[i].id.as_str())
    }
}

impl Widget for RadioGroup {
    fn name(&self) -> &str {
        &self.field.name
    }

    fn is_focused(&self) -> bool {
        self.field.focused
    }

    fn set_focus(&mut self, focused: bool) {
        self.field.focused = focused;
    }

    fn handle_input(&mut self, event: &AppEvent) -> EventResult {
        if !self.field.focused {
            return EventResult::Ignored;
        }
        let Some(key) = pressed(event) else {
            return EventResult::Ignored;
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') if self.cursor > 0 => self.cursor -= 1,
            KeyCode::Down | KeyCode::Char('j') if self.cursor + 1 < self.items.len() => {
                self.cursor += 1
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.selected = Some(self.cursor);
                self.field.error = None;
            }
            _ => return EventResult::Ignored,
        }
        EventResult::Handled
    }

    fn is_valid(&mut self) -> bool {
        let outcome = if self.field.required && self.selected.is_none() {
            Err("Select an option".to_string())
        } else {
            Ok(())
        };
        self.field.settle(outcome)
    }

    fn error(&self) -> Option<&str> {
        self.field.error.as_deref()
    }

    fn set_error(&mut self, message: Option<String>) {
        self.field.error = message;
    }

    /// The selected id, or empty text when nothing is selected.
    fn value(&self) -> Value {
        Value::Text(self.selected_id().unwrap_or_default().to_string())
    }

    fn set_value(&mut self, value: Value) -> Result<(), ValueError> {
        let Value::Text(id) = value else {
            return Err(ValueError::mismatch(ValueKind::Text, value.kind()));
        };
        if id.is_empty() {
            self.selected = None;
            return Ok(());
        }
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(ValueError::UnknownSelectionId(id))?;
        self.selected = Some(index);
        self.cursor = index;
        self.field.error = None;
        Ok(())
    }

    fn reset(&mut self) {
        self.selected = self.initial;
        self.cursor = self.initial.unwrap_or(0);
        self.field.reset();
    }

    fn view(&self) -> String {
        let body = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let pointer = if self.field.focused && i == self.cursor { "›" } else { " " };
                let dot = if self.selected == Some(i) { "(•)" } else { "( )" };
                format!("{pointer} {dot} {}", item.label)
            })
            .collect::<Vec<_>>()
            .join("\n");
        self.field.frame(&body)
    }

    fn key_hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("↑/↓", "move"), ("Space", "select")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plan_desc() -> WidgetDescriptor {
        WidgetDescriptor::new("radiogroup", "plan").option(
            "items",
            json!([
                {"id": "free", "label": "Free"},
                {"id": "pro", "label": "Pro"},
                {"id": "", "label": "Broken"},
                {"id": "team", "label": "Team"}
            ]),
        )
    }

    #[test]
    fn test_items_parsed_and_empty_rejected() {
        let w = RadioGroup::from_descriptor(&plan_desc()).unwrap();
        let ids: Vec<_> = w.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["free", "pro", "team"]);

        let empty = WidgetDescriptor::new("radiogroup", "x").option("items", json!([]));
        assert!(matches!(
            RadioGroup::from_descriptor(&empty),
            Err(ConstructionError::InvalidDescriptor { .. })
        ));
    }

    #[test]
    fn test_cursor_clamps_and_confirm_selects() {
        let mut w = RadioGroup::from_descriptor(&plan_desc()).unwrap();
        w.set_focus(true);
        assert_eq!(w.handle_input(&AppEvent::key(KeyCode::Up)), EventResult::Ignored);
        for _ in 0..5 {
            w.handle_input(&AppEvent::key(KeyCode::Char('j')));
        }
        assert_eq!(w.cursor(), 2);
        assert_eq!(w.value(), Value::from(""));
        w.handle_input(&AppEvent::key(KeyCode::Char(' ')));
        assert_eq!(w.value(), Value::from("team"));
    }

    #[test]
    fn test_required_selection() {
        let mut w = RadioGroup::from_descriptor(&plan_desc().required()).unwrap();
        assert!(!w.is_valid());
        assert_eq!(w.error(), Some("Select an option"));
        w.set_value(Value::from("pro")).unwrap();
        assert!(w.is_valid());
    }

    #[test]
    fn test_set_value_errors() {
        let mut w = RadioGroup::from_descriptor(&plan_desc()).unwrap();
        assert_eq!(
            w.set_value(Value::from("enterprise")),
            Err(ValueError::UnknownSelectionId("enterprise".into()))
        );
        assert!(matches!(
            w.set_value(Value::Number(1.0)),
            Err(ValueError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_default_and_reset_restore_cursor() {
        let desc = plan_desc().default_value(json!("pro"));
        let mut w = RadioGroup::from_descriptor(&desc).unwrap();
        assert_eq!(w.cursor(), 1);
        w.set_value(Value::from("team")).unwrap();
        w.reset();
        assert_eq!(w.selected_id(), Some("pro"));
        assert_eq!(w.cursor(), 1);
    }

    #[test]
    fn test_view_marks_selection_and_cursor() {
        let mut w = RadioGroup::from_descriptor(&plan_desc().default_value(json!("free"))).unwrap();
        w.set_focus(true);
        w.handle_input(&AppEvent::key(KeyCode::Down));
        assert_eq!(w.view(), "  (•) Free\n› ( ) Pro\n  ( ) Team");
    }
}
