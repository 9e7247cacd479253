//! Widgets: the interactive leaves of every container.
//!
//! Each kind implements the [`Widget`] capability trait. Containers hold the
//! closed [`AnyWidget`] set and only ever talk to it through that trait; they
//! never branch on the concrete kind.

pub mod checkbox;
mod edit;
pub mod factory;
pub mod label;
mod options;
pub mod path_picker;
pub mod radio_group;
pub mod slider;
pub mod text_area;
pub mod text_input;

use crossterm::event::{KeyEvent, KeyEventKind};

use crate::app::event::AppEvent;
use crate::core::{Value, ValueError};
use crate::descriptor::WidgetDescriptor;

pub use checkbox::Checkbox;
pub use factory::{build, build_all, build_group};
pub use label::StaticLabel;
pub use path_picker::PathPicker;
pub use radio_group::{ChoiceItem, RadioGroup};
pub use slider::Slider;
pub use text_area::TextArea;
pub use text_input::TextInput;

/// Prefix of the error line in [`Widget::view`] output.
pub const ERROR_MARK: &str = "✗ ";

/// Whether a widget consumed an event. `Handled` asks for a repaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Handled,
    Ignored,
}

impl EventResult {
    pub fn is_handled(self) -> bool {
        self == EventResult::Handled
    }
}

// ───────────────────────────────────────── trait ─────────────

/// Capability contract shared by every widget kind.
pub trait Widget {
    /// Unique (within one flat container) identifier; the key in serialised
    /// output.
    fn name(&self) -> &str;

    fn can_focus(&self) -> bool {
        true
    }

    fn is_focused(&self) -> bool;

    fn set_focus(&mut self, focused: bool);

    /// Feed one event. Keys are only consumed while focused; resize events
    /// are taken regardless of focus.
    fn handle_input(&mut self, event: &AppEvent) -> EventResult;

    /// Run the rules in order. The stored error becomes the first failure's
    /// message, or is cleared when everything passes.
    fn is_valid(&mut self) -> bool;

    fn error(&self) -> Option<&str>;

    fn set_error(&mut self, message: Option<String>);

    fn value(&self) -> Value;

    fn set_value(&mut self, value: Value) -> Result<(), ValueError>;

    /// Back to the initial value, with no error and no focus.
    fn reset(&mut self);

    /// Text rendering. A pure function of current state.
    fn view(&self) -> String;

    /// `(key, description)` pairs for the status bar while focused.
    fn key_hints(&self) -> &'static [(&'static str, &'static str)] {
        &[]
    }
}

// ───────────────────────────────────────── shared chrome ─────

/// Identity, focus and error state common to every kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Field {
    pub name: String,
    pub label: String,
    pub help: String,
    pub required: bool,
    pub error: Option<String>,
    pub focused: bool,
}

impl Field {
    pub fn from_descriptor(d: &WidgetDescriptor) -> Self {
        Self {
            name: d.name.clone(),
            label: d.label.clone(),
            help: d.help.clone(),
            required: d.required,
            error: None,
            focused: false,
        }
    }

    /// Store the outcome of a rule check and report whether it passed.
    pub fn settle(&mut self, outcome: Result<(), String>) -> bool {
        self.error = outcome.err();
        self.error.is_none()
    }

    pub fn reset(&mut self) {
        self.error = None;
        self.focused = false;
    }

    /// Label line, body, then the error (or help) line.
    pub fn frame(&self, body: &str) -> String {
        let mut out = String::new();
        if !self.label.is_empty() {
            out.push_str(&self.label);
            if self.required {
                out.push_str(" *");
            }
            out.push('\n');
        }
        out.push_str(body);
        if let Some(err) = &self.error {
            out.push('\n');
            out.push_str(ERROR_MARK);
            out.push_str(err);
        } else if !self.help.is_empty() {
            out.push('\n');
            out.push_str(&self.help);
        }
        out
    }
}

/// The key of a press (or repeat) event; releases are not input.
pub(crate) fn pressed(event: &AppEvent) -> Option<KeyEvent> {
    match event {
        AppEvent::Key(key) if key.kind != KeyEventKind::Release => Some(*key),
        _ => None,
    }
}

// ───────────────────────────────────────── variant set ───────

/// The closed set of widget kinds a container can hold.
#[derive(Debug)]
pub enum AnyWidget {
    Text(TextInput),
    MultilineText(TextArea),
    Boolean(Checkbox),
    Choice(RadioGroup),
    Range(Slider),
    Path(PathPicker),
    Label(StaticLabel),
}

impl AnyWidget {
    fn inner(&self) -> &dyn Widget {
        match self {
            AnyWidget::Text(w) => w,
            AnyWidget::MultilineText(w) => w,
            AnyWidget::Boolean(w) => w,
            AnyWidget::Choice(w) => w,
            AnyWidget::Range(w) => w,
            AnyWidget::Path(w) => w,
            AnyWidget::Label(w) => w,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Widget {
        match self {
            AnyWidget::Text(w) => w,
            AnyWidget::MultilineText(w) => w,
            AnyWidget::Boolean(w) => w,
            AnyWidget::Choice(w) => w,
            AnyWidget::Range(w) => w,
            AnyWidget::Path(w) => w,
            AnyWidget::Label(w) => w,
        }
    }
}

impl Widget for AnyWidget {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn can_focus(&self) -> bool {
        self.inner().can_focus()
    }

    fn is_focused(&self) -> bool {
        self.inner().is_focused()
    }

    fn set_focus(&mut self, focused: bool) {
        self.inner_mut().set_focus(focused)
    }

    fn handle_input(&mut self, event: &AppEvent) -> EventResult {
        self.inner_mut().handle_input(event)
    }

    fn is_valid(&mut self) -> bool {
        self.inner_mut().is_valid()
    }

    fn error(&self) -> Option<&str> {
        self.inner().error()
    }

    fn set_error(&mut self, message: Option<String>) {
        self.inner_mut().set_error(message)
    }

    fn value(&self) -> Value {
        self.inner().value()
    }

    fn set_value(&mut self, value: Value) -> Result<(), ValueError> {
        self.inner_mut().set_value(value)
    }

    fn reset(&mut self) {
        self.inner_mut().reset()
    }

    fn view(&self) -> String {
        self.inner().view()
    }

    fn key_hints(&self) -> &'static [(&'static str, &'static str)] {
        self.inner().key_hints()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_shows_error_over_help() {
        let mut field = Field {
            name: "user".into(),
            label: "User".into(),
            help: "your login".into(),
            required: true,
            ..Field::default()
        };
        assert_eq!(field.frame("> ada"), "User *\n> ada\nyour login");
        assert!(!field.settle(Err("This field is required".into())));
        assert_eq!(field.frame("> "), "User *\n> \n✗ This field is required");
        assert!(field.settle(Ok(())));
        assert_eq!(field.error, None);
    }

    #[test]
    fn test_pressed_skips_release() {
        use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};
        let release = AppEvent::Key(KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(pressed(&release), None);
        assert!(pressed(&AppEvent::key(KeyCode::Char('a'))).is_some());
        assert_eq!(pressed(&AppEvent::Tick), None);
    }
}
