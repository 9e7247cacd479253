//! Static text. Never focusable, always valid; its value is its text.

use super::options::Options;
use super::{EventResult, Field, Widget};
use crate::app::event::AppEvent;
use crate::core::{ConstructionError, Value, ValueError, ValueKind};
use crate::descriptor::WidgetDescriptor;

#[derive(Debug)]
pub struct StaticLabel {
    field: Field,
    text: String,
    initial: String,
}

impl StaticLabel {
    /// The text is the descriptor's label, or its default when the label is
    /// empty.
    pub fn from_descriptor(desc: &WidgetDescriptor) -> Result<Self, ConstructionError> {
        let text = if desc.label.is_empty() {
            Options::new(desc).default_str()?.unwrap_or_default().to_string()
        } else {
            desc.label.clone()
        };
        Ok(Self {
            field: Field::from_descriptor(desc),
            initial: text.clone(),
            text,
        })
    }
}

impl Widget for StaticLabel {
    fn name(&self) -> &str {
        &self.field.name
    }

    fn can_focus(&self) -> bool {
        false
    }

    fn is_focused(&self) -> bool {
        false
    }

    fn set_focus(&mut self, _focused: bool) {}

    fn handle_input(&mut self, _event: &AppEvent) -> EventResult {
        EventResult::Ignored
    }

    fn is_valid(&mut self) -> bool {
        true
    }

    fn error(&self) -> Option<&str> {
        None
    }

    fn set_error(&mut self, _message: Option<String>) {}

    fn value(&self) -> Value {
        Value::Text(self.text.clone())
    }

    fn set_value(&mut self, value: Value) -> Result<(), ValueError> {
        match value {
            Value::Text(text) => {
                self.text = text;
                Ok(())
            }
            other => Err(ValueError::mismatch(ValueKind::Text, other.kind())),
        }
    }

    fn reset(&mut self) {
        self.text = self.initial.clone();
    }

    fn view(&self) -> String {
        if self.field.help.is_empty() {
            self.text.clone()
        } else {
            format!("{}\n{}", self.text, self.field.help)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_text_and_fallback() {
        let w = StaticLabel::from_descriptor(&WidgetDescriptor::new("label", "hdr").label("Welcome")).unwrap();
        assert_eq!(w.value(), Value::from("Welcome"));
        assert!(!w.can_focus());

        let desc = WidgetDescriptor::new("label", "note").default_value(serde_json::json!("fallback"));
        let w = StaticLabel::from_descriptor(&desc).unwrap();
        assert_eq!(w.view(), "fallback");
    }

    #[test]
    fn test_never_focused_always_valid() {
        let mut w = StaticLabel::from_descriptor(&WidgetDescriptor::new("label", "n").label("x")).unwrap();
        w.set_focus(true);
        assert!(!w.is_focused());
        w.set_error(Some("nope".into()));
        assert!(w.is_valid());
        assert_eq!(w.error(), None);
        w.set_value(Value::from("changed")).unwrap();
        w.reset();
        assert_eq!(w.value(), Value::from("x"));
    }
}
