//! Multi-line text widget.
//!
//! Lines are soft-wrapped at `width` columns for display and the visible
//! window follows the cursor line. Resize events set the width to
//! `max(terminal_width - 10, 30)`, whether or not the widget is focused.

use crossterm::event::{KeyCode, KeyModifiers};

use super::edit::EditBuffer;
use super::options::Options;
use super::text_input::{LengthRules, CURSOR};
use super::{pressed, EventResult, Field, Widget};
use crate::app::event::AppEvent;
use crate::core::{ConstructionError, Value, ValueError, ValueKind};
use crate::descriptor::WidgetDescriptor;

const DEFAULT_HEIGHT: usize = 5;
const DEFAULT_WIDTH: usize = 40;
const MIN_WIDTH: usize = 30;

#[derive(Debug)]
pub struct TextArea {
    field: Field,
    placeholder: String,
    buffer: EditBuffer,
    initial: String,
    rules: LengthRules,
    height: usize,
    width: usize,
}

impl TextArea {
    pub fn from_descriptor(desc: &WidgetDescriptor) -> Result<Self, ConstructionError> {
        let opts = Options::new(desc);
        let initial = opts.default_str()?.unwrap_or_default().to_string();
        Ok(Self {
            field: Field::from_descriptor(desc),
            placeholder: desc.placeholder.clone(),
            buffer: EditBuffer::new(initial.clone()),
            initial,
            rules: LengthRules::from_options(desc)?,
            height: opts.usize("height")?.filter(|&h| h > 0).unwrap_or(DEFAULT_HEIGHT),
            width: opts.usize("width")?.filter(|&w| w > 0).unwrap_or(DEFAULT_WIDTH),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    fn edit(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        match code {
            KeyCode::Enter => self.insert('\n'),
            KeyCode::Char('j') if ctrl => self.insert('\n'),
            KeyCode::Char(c) if !ctrl && !modifiers.contains(KeyModifiers::ALT) => self.insert(c),
            KeyCode::Backspace => self.buffer.backspace(),
            KeyCode::Delete => self.buffer.delete(),
            KeyCode::Left => self.buffer.left(),
            KeyCode::Right => self.buffer.right(),
            KeyCode::Up => self.buffer.up(),
            KeyCode::Down => self.buffer.down(),
            KeyCode::Home => self.buffer.home(),
            KeyCode::End => self.buffer.end(),
            _ => false,
        }
    }

    fn insert(&mut self, c: char) -> bool {
        if !self.rules.admits(self.buffer.char_count() + 1) {
            return false;
        }
        self.buffer.insert_char(c);
        true
    }

    /// Display rows: every logical line chunked to `width` characters.
    fn rows(&self, text: &str) -> Vec<String> {
        let mut rows = Vec::new();
        for line in text.split('\n') {
            let chars: Vec<char> = line.chars().collect();
            if chars.is_empty() {
                rows.push(String::new());
                continue;
            }
            rows.extend(chars.chunks(self.width).map(|c| c.iter().collect::<String>()));
        }
        rows
    }
}

impl Widget for TextArea {
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
        if let AppEvent::Resize(w, _) = event {
            self.width = usize::from(*w).saturating_sub(10).max(MIN_WIDTH);
            return EventResult::Handled;
        }
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
        let outcome = self.rules.check(self.buffer.text(), self.field.required);
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
        if !self.field.focused && self.buffer.text().is_empty() {
            return self.field.frame(&self.placeholder);
        }
        let text = if self.field.focused {
            self.buffer.with_marker(CURSOR)
        } else {
            self.buffer.text().to_string()
        };
        let rows = self.rows(&text);
        // Keep the row holding the cursor inside the window.
        let cursor_row = self.rows(&self.buffer.with_marker(CURSOR))
            .iter()
            .position(|r| r.contains(CURSOR))
            .unwrap_or(0);
        let first = cursor_row.saturating_sub(self.height.saturating_sub(1));
        let body: Vec<&str> = rows
            .iter()
            .skip(if self.field.focused { first } else { 0 })
            .take(self.height)
            .map(String::as_str)
            .collect();
        self.field.frame(&body.join("\n"))
    }

    fn key_hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("Enter", "new line"), ("↑/↓", "move")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn focused(desc: WidgetDescriptor) -> TextArea {
        let mut w = TextArea::from_descriptor(&desc).unwrap();
        w.set_focus(true);
        w
    }

    #[test]
    fn test_enter_inserts_newline() {
        let mut w = focused(WidgetDescriptor::new("textarea", "bio"));
        for code in [KeyCode::Char('a'), KeyCode::Enter, KeyCode::Char('b')] {
            w.handle_input(&AppEvent::key(code));
        }
        w.handle_input(&AppEvent::key_with(KeyCode::Char('j'), KeyModifiers::CONTROL));
        assert_eq!(w.value(), Value::from("a\nb\n"));
    }

    #[test]
    fn test_length_rules() {
        let desc = WidgetDescriptor::new("textarea", "bio")
            .required()
            .option("min_length", json!(5))
            .option("max_length", json!(8));
        let mut w = focused(desc);
        assert!(!w.is_valid());
        assert_eq!(w.error(), Some("This field is required"));
        w.set_value(Value::from("abc")).unwrap();
        assert!(!w.is_valid());
        assert_eq!(w.error(), Some("Minimum of 5 characters"));
        assert!(w.set_value(Value::from("abcdefghij")).is_err());
        w.set_value(Value::from("abcdef")).unwrap();
        assert!(w.is_valid());
    }

    #[test]
    fn test_min_greater_than_max_rejected() {
        let desc = WidgetDescriptor::new("textarea", "bio")
            .option("min_length", json!(9))
            .option("max_length", json!(3));
        assert!(TextArea::from_descriptor(&desc).is_err());
    }

    #[test]
    fn test_resize_sets_width_without_focus() {
        let mut w = TextArea::from_descriptor(&WidgetDescriptor::new("textarea", "n")).unwrap();
        assert_eq!(w.handle_input(&AppEvent::Resize(120, 40)), EventResult::Handled);
        assert_eq!(w.width(), 110);
        w.handle_input(&AppEvent::Resize(20, 10));
        assert_eq!(w.width(), 30);
    }

    #[test]
    fn test_view_window_follows_cursor() {
        let desc = WidgetDescriptor::new("textarea", "log").option("height", json!(2));
        let mut w = focused(desc);
        w.set_value(Value::from("one\ntwo\nthree")).unwrap();
        assert_eq!(w.view(), "two\nthree│");
        w.set_focus(false);
        assert_eq!(w.view(), "one\ntwo");
    }
}
