//! Ordered widget sequence with a circular focus cursor.
//!
//! The cursor is `None` only when no widget can take focus. Moving it scans
//! circularly for the next focusable widget, so with a single focusable
//! widget every move lands back on it, and with none every move is a no-op.

use crate::app::event::AppEvent;
use crate::core::{ImportError, SerializationError, ValueMap};
use crate::widgets::{AnyWidget, EventResult, Widget};

#[derive(Debug)]
pub struct FocusList<W: Widget = AnyWidget> {
    widgets: Vec<W>,
    cursor: Option<usize>,
}

impl<W: Widget> FocusList<W> {
    /// Cursor starts on the first focusable widget. No focus flag is set
    /// until the owning container calls [`FocusList::apply_focus`].
    pub fn new(widgets: Vec<W>) -> Self {
        let cursor = widgets.iter().position(|w| w.can_focus());
        Self { widgets, cursor }
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn widgets(&self) -> &[W] {
        &self.widgets
    }

    pub fn widgets_mut(&mut self) -> &mut [W] {
        &mut self.widgets
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&W> {
        self.widgets.iter().find(|w| w.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut W> {
        self.widgets.iter_mut().find(|w| w.name() == name)
    }

    pub fn focused(&self) -> Option<&W> {
        self.cursor.map(|i| &self.widgets[i])
    }

    pub fn focused_mut(&mut self) -> Option<&mut W> {
        self.cursor.map(|i| &mut self.widgets[i])
    }

    /// Set (or clear) the focus flag on the widget under the cursor. Every
    /// other widget is unfocused.
    pub fn apply_focus(&mut self, focused: bool) {
        for (i, w) in self.widgets.iter_mut().enumerate() {
            w.set_focus(focused && Some(i) == self.cursor);
        }
    }

    pub fn focus_next(&mut self) {
        let len = self.widgets.len();
        let Some(current) = self.cursor else {
            return;
        };
        let next = (1..=len)
            .map(|step| (current + step) % len)
            .find(|&i| self.widgets[i].can_focus());
        self.move_to(next);
    }

    pub fn focus_prev(&mut self) {
        let len = self.widgets.len();
        let Some(current) = self.cursor else {
            return;
        };
        let prev = (1..=len)
            .map(|step| (current + len - step) % len)
            .find(|&i| self.widgets[i].can_focus());
        self.move_to(prev);
    }

    fn move_to(&mut self, target: Option<usize>) {
        if let Some(i) = self.cursor {
            self.widgets[i].set_focus(false);
        }
        self.cursor = target;
        if let Some(i) = self.cursor {
            self.widgets[i].set_focus(true);
            tracing::trace!(index = i, name = self.widgets[i].name(), "focus moved");
        }
    }

    /// Deliver an event to every widget (resize-class events).
    pub fn broadcast(&mut self, event: &AppEvent) -> EventResult {
        let mut result = EventResult::Ignored;
        for w in &mut self.widgets {
            if w.handle_input(event).is_handled() {
                result = EventResult::Handled;
            }
        }
        result
    }

    /// Deliver an event to the widget under the cursor only.
    pub fn route(&mut self, event: &AppEvent) -> EventResult {
        match self.focused_mut() {
            Some(w) => w.handle_input(event),
            None => EventResult::Ignored,
        }
    }

    /// Validate every widget, without short-circuiting, so each one's
    /// error is refreshed.
    pub fn validate_each(&mut self) -> bool {
        self.widgets
            .iter_mut()
            .fold(true, |all, w| w.is_valid() && all)
    }

    /// Number of widgets currently showing an error. Reads stored state only.
    pub fn pending_errors(&self) -> usize {
        self.widgets.iter().filter(|w| w.error().is_some()).count()
    }

    pub fn values(&self) -> ValueMap {
        self.widgets
            .iter()
            .map(|w| (w.name().to_string(), w.value()))
            .collect()
    }

    /// Like [`FocusList::values`], but fails on a value the output encoding
    /// cannot represent.
    pub fn encodable_values(&self) -> Result<ValueMap, SerializationError> {
        self.widgets
            .iter()
            .map(|w| {
                let value = w.value();
                value.ensure_encodable(w.name())?;
                Ok((w.name().to_string(), value))
            })
            .collect()
    }

    /// Apply `values` by widget name through `set_value`. Every entry is
    /// tried; the ones that fail come back, keyed `scope.name` when a scope
    /// is given.
    pub fn import(&mut self, values: &ValueMap, scope: Option<&str>) -> Vec<ImportError> {
        let key = |name: &str| match scope {
            Some(scope) => format!("{scope}.{name}"),
            None => name.to_string(),
        };
        let mut failures = Vec::new();
        for (name, value) in values {
            let Some(w) = self.get_mut(name) else {
                failures.push(ImportError::UnknownWidget(key(name.as_str())));
                continue;
            };
            if let Err(source) = w.set_value(value.clone()) {
                failures.push(ImportError::Rejected {
                    name: key(name.as_str()),
                    source,
                });
            }
        }
        failures
    }

    pub fn reset(&mut self) {
        for w in &mut self.widgets {
            w.reset();
        }
        self.cursor = self.widgets.iter().position(|w| w.can_focus());
    }
}
