//! Layout container: widgets stacked along one axis, with the same focus
//! traversal as a form but no submit gate.

use crossterm::event::KeyEventKind;

use super::event::AppEvent;
use super::focus::FocusList;
use super::Flow;
use crate::config::{Action, KeyMap};
use crate::core::{ConstructionError, ImportError, ValueMap};
use crate::descriptor::{Axis, LayoutDescriptor};
use crate::widgets::{build_all, AnyWidget};

#[derive(Debug)]
pub struct Layout {
    title: String,
    description: String,
    axis: Axis,
    list: FocusList,
    quitting: bool,
}

impl Layout {
    pub fn new(title: impl Into<String>, axis: Axis, widgets: Vec<AnyWidget>) -> Self {
        let mut list = FocusList::new(widgets);
        list.apply_focus(true);
        Self {
            title: title.into(),
            description: String::new(),
            axis,
            list,
            quitting: false,
        }
    }

    pub fn from_descriptor(desc: &LayoutDescriptor) -> Result<Self, ConstructionError> {
        desc.validate()?;
        let widgets = build_all(&desc.widgets)?;
        let mut layout = Self::new(desc.title.clone(), desc.axis, widgets);
        layout.description = desc.description.clone();
        Ok(layout)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn widgets(&self) -> &[AnyWidget] {
        self.list.widgets()
    }

    pub fn widget(&self, name: &str) -> Option<&AnyWidget> {
        self.list.get(name)
    }

    pub fn widget_mut(&mut self, name: &str) -> Option<&mut AnyWidget> {
        self.list.get_mut(name)
    }

    pub fn cursor(&self) -> Option<usize> {
        self.list.cursor()
    }

    pub fn focused(&self) -> Option<&AnyWidget> {
        self.list.focused()
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    pub fn dispatch(&mut self, event: &AppEvent, keymap: &KeyMap) -> Flow {
        let key = match event {
            AppEvent::Resize(..) => return self.list.broadcast(event).into(),
            AppEvent::Key(key) if key.kind == KeyEventKind::Release => return Flow::Continue,
            AppEvent::Key(key) => *key,
            AppEvent::Tick => return self.list.route(event).into(),
        };

        match keymap.match_key(key) {
            Some(Action::Quit) => {
                tracing::debug!(layout = %self.title, "layout quit");
                self.quitting = true;
                Flow::Exit
            }
            Some(Action::FocusNext) => {
                self.list.focus_next();
                Flow::Repaint
            }
            Some(Action::FocusPrev) => {
                self.list.focus_prev();
                Flow::Repaint
            }
            _ => self.list.route(event).into(),
        }
    }

    /// Current values in widget order. No validation is involved.
    pub fn values(&self) -> ValueMap {
        self.list.values()
    }

    /// Assign values by widget name; failing entries are returned.
    pub fn import(&mut self, values: &ValueMap) -> Vec<ImportError> {
        let failures = self.list.import(values, None);
        for failure in &failures {
            tracing::warn!(%failure, "value not imported");
        }
        failures
    }

    pub fn reset(&mut self) {
        self.list.reset();
        self.list.apply_focus(true);
        self.quitting = false;
    }
}
