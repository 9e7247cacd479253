//! Boolean toggle.

use crossterm::event::KeyCode;

use super::options::Options;
use super::{pressed, EventResult, Field, Widget};
use crate::app::event::AppEvent;
use crate::core::{ConstructionError, Value, ValueError, ValueKind};
use crate::descriptor::WidgetDescriptor;

#[derive(Debug)]
pub struct Checkbox {
    field: Field,
    checked: bool,
    initial: bool,
}

impl Checkbox {
    pub fn from_descriptor(desc: &WidgetDescriptor) -> Result<Self, ConstructionError> {
        let initial = Options::new(desc).default_bool()?.unwrap_or(false);
        Ok(Self {
            field: Field::from_descriptor(desc),
            checked: initial,
            initial,
        })
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }
}

impl Widget for Checkbox {
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
        match pressed(event).map(|k| k.code) {
            Some(KeyCode::Char(' ') | KeyCode::Enter) => {
                self.checked = !self.checked;
                self.field.error = None;
                EventResult::Handled
            }
            _ => EventResult::Ignored,
        }
    }

    fn is_valid(&mut self) -> bool {
        let outcome = if self.field.required && !self.checked {
            Err("This option must be checked".to_string())
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

    fn value(&self) -> Value {
        Value::Bool(self.checked)
    }

    fn set_value(&mut self, value: Value) -> Result<(), ValueError> {
        match value {
            Value::Bool(b) => {
                self.checked = b;
                self.field.error = None;
                Ok(())
            }
            other => Err(ValueError::mismatch(ValueKind::Bool, other.kind())),
        }
    }

    fn reset(&mut self) {
        self.checked = self.initial;
        self.field.reset();
    }

    fn view(&self) -> String {
        let mark = if self.checked { "[x]" } else { "[ ]" };
        let pointer = if self.field.focused { "›" } else { " " };
        let required = if self.field.required { " *" } else { "" };
        // The label sits on the box line rather than above it.
        let chrome = Field {
            label: String::new(),
            ..self.field.clone()
        };
        chrome.frame(&format!("{pointer} {mark} {}{required}", self.field.label))
    }

    fn key_hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("Space", "toggle")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_required() {
        let desc = WidgetDescriptor::new("checkbox", "terms").label("I agree").required();
        let mut w = Checkbox::from_descriptor(&desc).unwrap();
        assert!(!w.is_valid());
        assert_eq!(w.error(), Some("This option must be checked"));
        assert_eq!(w.view(), "  [ ] I agree *\n✗ This option must be checked");

        w.set_focus(true);
        assert!(w.handle_input(&AppEvent::key(KeyCode::Char(' '))).is_handled());
        assert_eq!(w.error(), None);
        assert!(w.is_valid());
        assert_eq!(w.value(), Value::Bool(true));
        assert_eq!(w.view(), "› [x] I agree *");
    }

    #[test]
    fn test_default_and_reset() {
        let desc = WidgetDescriptor::new("checkbox", "news").default_value(serde_json::json!(true));
        let mut w = Checkbox::from_descriptor(&desc).unwrap();
        w.set_value(Value::Bool(false)).unwrap();
        w.reset();
        assert!(w.is_checked());
        assert!(w.set_value(Value::from("yes")).is_err());
    }

    #[test]
    fn test_non_bool_default_rejected() {
        let desc = WidgetDescriptor::new("checkbox", "x").default_value(serde_json::json!("yes"));
        assert!(Checkbox::from_descriptor(&desc).is_err());
    }
}
