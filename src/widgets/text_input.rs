//! Single-line text widget with length and pattern rules.

use crossterm::event::{KeyCode, KeyModifiers};
use regex::Regex;

use super::edit::EditBuffer;
use super::options::Options;
use super::{pressed, EventResult, Field, Widget};
use crate::app::event::AppEvent;
use crate::core::{ConstructionError, Value, ValueError, ValueKind};
use crate::descriptor::WidgetDescriptor;

pub(crate) const REQUIRED: &str = "This field is required";
pub(crate) const CURSOR: char = '│';

/// `min_length` / `max_length` rules shared by both text kinds. A zero
/// bound means "no bound".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct LengthRules {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl LengthRules {
    pub fn from_options(desc: &WidgetDescriptor) -> Result<Self, ConstructionError> {
        let opts = Options::new(desc);
        let rules = Self {
            min: opts.usize("min_length")?.filter(|&n| n > 0),
            max: opts.usize("max_length")?.filter(|&n| n > 0),
        };
        if let (Some(min), Some(max)) = (rules.min, rules.max) {
            if min > max {
                return Err(ConstructionError::invalid(
                    &desc.name,
                    format!("min_length {min} is greater than max_length {max}"),
                ));
            }
        }
        Ok(rules)
    }

    /// Required, then min, then max. An empty optional value passes.
    pub fn check(&self, value: &str, required: bool) -> Result<(), String> {
        if required && value.trim().is_empty() {
            return Err(REQUIRED.to_string());
        }
        if value.is_empty() {
            return Ok(());
        }
        let len = value.chars().count();
        if let Some(min) = self.min {
            if len < min {
                return Err(format!("Minimum of {min} characters"));
            }
        }
        if let Some(max) = self.max {
            if len > max {
                return Err(format!("Maximum of {max} characters"));
            }
        }
        Ok(())
    }

    pub fn admits(&self, len: usize) -> bool {
        self.max.is_none_or(|max| len <= max)
    }
}

#[derive(Debug)]
pub struct TextInput {
    field: Field,
    placeholder: String,
    buffer: EditBuffer,
    initial: String,
    rules: LengthRules,
    pattern: Option<Regex>,
}

impl TextInput {
    pub fn from_descriptor(desc: &WidgetDescriptor) -> Result<Self, ConstructionError> {
        let opts = Options::new(desc);
        let rules = LengthRules::from_options(desc)?;
        let pattern = match opts.str("pattern")? {
            Some(p) if !p.is_empty() => {
                Some(Regex::new(p).map_err(|source| ConstructionError::InvalidPattern {
                    name: desc.name.clone(),
                    source,
                })?)
            }
            _ => None,
        };
        let initial = opts.default_str()?.unwrap_or_default().to_string();

        Ok(Self {
            field: Field::from_descriptor(desc),
            placeholder: desc.placeholder.clone(),
            buffer: EditBuffer::new(initial.clone()),
            initial,
            rules,
            pattern,
        })
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    fn check(&self) -> Result<(), String> {
        let value = self.buffer.text();
        self.rules.check(value, self.field.required)?;
        if let Some(re) = &self.pattern {
            if !value.is_empty() && !re.is_match(value) {
                return Err("Invalid format".to_string());
            }
        }
        Ok(())
    }

    fn edit(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Char(c) if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                if !self.rules.admits(self.buffer.char_count() + 1) {
                    return false;
                }
                self.buffer.insert_char(c);
                true
            }
            KeyCode::Backspace => self.buffer.backspace(),
            KeyCode::Delete => self.buffer.delete(),
            KeyCode::Left => self.buffer.left(),
            KeyCode::Right => self.buffer.right(),
            KeyCode::Home => self.buffer.home(),
            KeyCode::End => self.buffer.end(),
            _ => false,
        }
    }
}

impl Widget for TextInput {
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
        if self.edit(key.code, key.modifiers) {
            self.field.error = None;
            EventResult::Handled
        } else {
            EventResult::Ignored
        }
    }

    fn is_valid(&mut self) -> bool {
        let outcome = self.check();
        self.field.settle(outcome)
    }

    fn error(&self) -> Option<&str> {
        self.field.error.as_deref()
    }

    fn set_error(&mut self, message: Option<String>) {
        self.field.error = message;
    }

    fn value(&self) -> Value {
        Value::Text(self.buffer.text().to_string())
    }

    fn set_value(&mut self, value: Value) -> Result<(), ValueError> {
        let Value::Text(text) = value else {
            return Err(ValueError::mismatch(ValueKind::Text, value.kind()));
        };
        let len = text.chars().count();
        if !self.rules.admits(len) {
            return Err(ValueError::TooLong {
                len,
                max: self.rules.max.unwrap_or(len),
            });
        }
        self.buffer.set(text);
        self.field.error = None;
        Ok(())
    }

    fn reset(&mut self) {
        self.buffer.set(self.initial.clone());
        self.field.reset();
    }

    fn view(&self) -> String {
        let body = if self.field.focused {
            self.buffer.with_marker(CURSOR)
        } else if self.buffer.text().is_empty() {
            self.placeholder.clone()
        } else {
            self.buffer.text().to_string()
        };
        self.field.frame(&format!("> {body}"))
    }

    fn key_hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("←/→", "move"), ("Bksp", "delete")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(desc: WidgetDescriptor) -> TextInput {
        let mut w = TextInput::from_descriptor(&desc).unwrap();
        w.set_focus(true);
        w
    }

    fn type_str(w: &mut TextInput, s: &str) {
        for c in s.chars() {
            w.handle_input(&AppEvent::key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_required_rule_trims() {
        let mut w = input(WidgetDescriptor::new("text", "user").required());
        type_str(&mut w, "   ");
        assert!(!w.is_valid());
        assert_eq!(w.error(), Some(REQUIRED));
    }

    #[test]
    fn test_rule_order_min_max_pattern() {
        let desc = WidgetDescriptor::new("text", "code")
            .option("min_length", json!(3))
            .option("pattern", json!("^[a-z]+$"));
        let mut w = input(desc);
        type_str(&mut w, "A");
        assert!(!w.is_valid());
        assert_eq!(w.error(), Some("Minimum of 3 characters"));
        type_str(&mut w, "BC");
        assert!(!w.is_valid());
        assert_eq!(w.error(), Some("Invalid format"));
        w.set_value(Value::from("abc")).unwrap();
        assert!(w.is_valid());
        assert_eq!(w.error(), None);
    }

    #[test]
    fn test_empty_optional_skips_rules() {
        let desc = WidgetDescriptor::new("text", "nick").option("min_length", json!(4));
        let mut w = input(desc);
        assert!(w.is_valid());
    }

    #[test]
    fn test_max_length_refuses_typing_and_set_value() {
        let desc = WidgetDescriptor::new("text", "pin").option("max_length", json!(2));
        let mut w = input(desc);
        type_str(&mut w, "123");
        assert_eq!(w.value(), Value::from("12"));
        assert_eq!(
            w.set_value(Value::from("abc")),
            Err(ValueError::TooLong { len: 3, max: 2 })
        );
    }

    #[test]
    fn test_invalid_pattern_is_construction_error() {
        let desc = WidgetDescriptor::new("text", "bad").option("pattern", json!("(unclosed"));
        assert!(matches!(
            TextInput::from_descriptor(&desc),
            Err(ConstructionError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_unfocused_ignores_keys_and_edit_clears_error() {
        let mut w = TextInput::from_descriptor(&WidgetDescriptor::new("text", "a").required()).unwrap();
        assert_eq!(w.handle_input(&AppEvent::key(KeyCode::Char('x'))), EventResult::Ignored);
        assert!(!w.is_valid());
        w.set_focus(true);
        assert!(w.handle_input(&AppEvent::key(KeyCode::Char('x'))).is_handled());
        assert_eq!(w.error(), None);
    }

    #[test]
    fn test_set_value_type_mismatch_and_reset() {
        let desc = WidgetDescriptor::new("text", "city").default_value(json!("Oslo"));
        let mut w = input(desc);
        assert_eq!(
            w.set_value(Value::Bool(true)),
            Err(ValueError::TypeMismatch { expected: ValueKind::Text, found: ValueKind::Bool })
        );
        type_str(&mut w, "!!");
        w.reset();
        assert_eq!(w.value(), Value::from("Oslo"));
        assert!(!w.is_focused());
    }

    #[test]
    fn test_view_placeholder_and_cursor() {
        let mut desc = WidgetDescriptor::new("text", "q").label("Query");
        desc.placeholder = "search…".into();
        let mut w = TextInput::from_descriptor(&desc).unwrap();
        assert_eq!(w.view(), "Query\n> search…");
        w.set_focus(true);
        type_str(&mut w, "hi");
        assert_eq!(w.view(), "Query\n> hi│");
    }
}
