//! Tab container: named groups of widgets, one group active at a time.
//!
//! Each group owns its widgets and its own focus cursor, so switching away
//! from a group and back lands on the widget that was focused before.
//! Widget values survive group switches.
//!
//! Dispatch precedence:
//! 1. resize events go to every widget of the active group;
//! 2. while the container is unfocused, everything else goes to the active
//!    group's focused widget and group keys are inert;
//! 3. while focused, group keys switch groups, focus keys move inside the
//!    active group, and the rest goes to the focused widget.
//!
//! Quit and submit are left to the owner (see [`crate::app::screen`]).

use crossterm::event::KeyEventKind;

use super::event::AppEvent;
use super::focus::FocusList;
use super::Flow;
use crate::config::{group_jump, Action, KeyMap};
use crate::core::{
    ConstructionError, Diagnostic, DiagnosticSink, Format, GroupValueMap, ImportError,
    SerializationError, ValidationSnapshot,
};
use crate::descriptor::{GroupDescriptor, TabsDescriptor};
use crate::widgets::{build_group, AnyWidget, Widget};

#[derive(Debug)]
pub struct TabGroup {
    name: String,
    label: String,
    list: FocusList,
}

impl TabGroup {
    pub fn new(name: impl Into<String>, label: impl Into<String>, widgets: Vec<AnyWidget>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            list: FocusList::new(widgets),
        }
    }

    pub fn from_descriptor(desc: &GroupDescriptor) -> Result<Self, ConstructionError> {
        let widgets = build_group(desc)?;
        Ok(Self::new(desc.name.clone(), desc.label.clone(), widgets))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
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

    /// Any widget in the group currently shows an error.
    pub fn has_errors(&self) -> bool {
        self.list.pending_errors() > 0
    }
}

pub struct TabContainer {
    title: String,
    groups: Vec<TabGroup>,
    active: usize,
    focused: bool,
    error: Option<String>,
    sink: Option<Box<dyn DiagnosticSink>>,
}

impl TabContainer {
    /// The container starts unfocused on the first group; call
    /// [`TabContainer::set_focus`] to hand it keyboard input.
    pub fn new(title: impl Into<String>, groups: Vec<TabGroup>) -> Result<Self, ConstructionError> {
        if groups.is_empty() {
            return Err(ConstructionError::invalid("tabs", "at least one group is required"));
        }
        Ok(Self {
            title: title.into(),
            groups,
            active: 0,
            focused: false,
            error: None,
            sink: None,
        })
    }

    pub fn from_descriptor(desc: &TabsDescriptor) -> Result<Self, ConstructionError> {
        desc.validate()?;
        let groups = desc
            .groups
            .iter()
            .enumerate()
            .map(|(index, group)| {
                TabGroup::from_descriptor(group)
                    .map_err(|source| ConstructionError::in_group(index, &group.name, source))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(desc.title.clone(), groups)
    }

    pub fn with_sink(mut self, sink: Box<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn groups(&self) -> &[TabGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&TabGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut TabGroup> {
        self.groups.iter_mut().find(|g| g.name == name)
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn active_group(&self) -> &TabGroup {
        &self.groups[self.active]
    }

    fn active_group_mut(&mut self) -> &mut TabGroup {
        &mut self.groups[self.active]
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// First error found by the last [`TabContainer::is_valid`] call.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Focus reaches the active group's widgets only while the container
    /// itself is focused.
    pub fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
        self.active_group_mut().list.apply_focus(focused);
    }

    /// Make group `index` active. Out-of-range indices and the already
    /// active group are ignored; returns whether the active group changed.
    pub fn select_group(&mut self, index: usize) -> bool {
        if index >= self.groups.len() || index == self.active {
            return false;
        }
        self.active_group_mut().list.apply_focus(false);
        self.active = index;
        let focused = self.focused;
        let group = self.active_group_mut();
        group.list.apply_focus(focused);
        tracing::debug!(index, group = %group.name, "tab switched");
        true
    }

    pub fn next_group(&mut self) -> bool {
        let next = (self.active + 1) % self.groups.len();
        self.select_group(next)
    }

    pub fn prev_group(&mut self) -> bool {
        let len = self.groups.len();
        let prev = (self.active + len - 1) % len;
        self.select_group(prev)
    }

    pub fn dispatch(&mut self, event: &AppEvent, keymap: &KeyMap) -> Flow {
        let key = match event {
            AppEvent::Resize(..) => return self.active_group_mut().list.broadcast(event).into(),
            AppEvent::Key(key) if key.kind == KeyEventKind::Release => return Flow::Continue,
            AppEvent::Key(key) => *key,
            AppEvent::Tick => return self.active_group_mut().list.route(event).into(),
        };

        if !self.focused {
            return self.active_group_mut().list.route(event).into();
        }

        if let Some(index) = group_jump(key) {
            return switched(self.select_group(index));
        }

        match keymap.match_key(key) {
            Some(Action::NextGroup) => switched(self.next_group()),
            Some(Action::PrevGroup) => switched(self.prev_group()),
            Some(Action::FocusNext) => {
                self.active_group_mut().list.focus_next();
                Flow::Repaint
            }
            Some(Action::FocusPrev) => {
                self.active_group_mut().list.focus_prev();
                Flow::Repaint
            }
            _ => self.active_group_mut().list.route(event).into(),
        }
    }

    /// `true` iff every widget of every group is valid. Every widget is
    /// checked, so each one's error is refreshed; the first message found is
    /// kept as the container's error.
    pub fn is_valid(&mut self) -> bool {
        let valid = self
            .groups
            .iter_mut()
            .fold(true, |all, g| g.list.validate_each() && all);
        self.error = self
            .groups
            .iter()
            .flat_map(|g| g.widgets())
            .find_map(|w| w.error().map(str::to_string));
        valid
    }

    /// Advisory warnings for widget names shared by two groups whose current
    /// values differ. Never affects validity.
    pub fn conflicts(&self) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        for (i, first) in self.groups.iter().enumerate() {
            for second in &self.groups[i + 1..] {
                for w in first.widgets() {
                    let Some(other) = second.widget(w.name()) else {
                        continue;
                    };
                    let (a, b) = (w.value(), other.value());
                    if a != b {
                        out.push(Diagnostic::conflict(
                            w.name(),
                            format!(
                                "\"{}\" differs between groups {} ({a}) and {} ({b})",
                                w.name(),
                                first.name,
                                second.name
                            ),
                        ));
                    }
                }
            }
        }
        out
    }

    /// Validate every widget (keys are `group.widget`), append conflict
    /// warnings, and report the lot to the sink.
    pub fn validation(&mut self) -> ValidationSnapshot {
        self.is_valid();
        let mut snapshot = ValidationSnapshot::default();
        for group in &self.groups {
            for w in group.widgets() {
                let key = format!("{}.{}", group.name, w.name());
                snapshot.record(key, w.error().is_none(), w.error());
            }
        }
        let conflicts = self.conflicts();
        if !conflicts.is_empty() {
            tracing::debug!(count = conflicts.len(), "cross-group conflicts");
        }
        snapshot.diagnostics.extend(conflicts);
        snapshot.emit(self.sink.as_deref_mut());
        snapshot
    }

    /// Group name → widget name → value.
    pub fn value(&self) -> GroupValueMap {
        self.groups
            .iter()
            .map(|g| (g.name.clone(), g.list.values()))
            .collect()
    }

    /// Like [`TabContainer::value`], but fails on a value JSON cannot carry.
    pub fn serialize(&self) -> Result<GroupValueMap, SerializationError> {
        self.groups
            .iter()
            .map(|g| Ok((g.name.clone(), g.list.encodable_values()?)))
            .collect()
    }

    pub fn encode(&self, format: Format, pretty: bool) -> Result<String, SerializationError> {
        format.encode(&self.serialize()?, pretty)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, SerializationError> {
        self.encode(Format::Json, pretty)
    }

    pub fn to_yaml(&self) -> Result<String, SerializationError> {
        self.encode(Format::Yaml, false)
    }

    /// Assign values per group. Failures are keyed `group.widget`, or by the
    /// group name alone when no such group exists.
    pub fn import(&mut self, values: &GroupValueMap) -> Vec<ImportError> {
        let mut failures = Vec::new();
        for (name, group_values) in values {
            match self.groups.iter_mut().find(|g| &g.name == name) {
                Some(group) => {
                    failures.extend(group.list.import(group_values, Some(name.as_str())));
                }
                None => failures.push(ImportError::UnknownGroup(name.clone())),
            }
        }
        for failure in &failures {
            tracing::warn!(%failure, "value not imported");
        }
        failures
    }

    /// Every group back to its initial state and the first group active.
    /// The container keeps its own focus flag.
    pub fn reset(&mut self) {
        for g in &mut self.groups {
            g.list.reset();
        }
        self.active = 0;
        self.error = None;
        let focused = self.focused;
        self.active_group_mut().list.apply_focus(focused);
    }
}

fn switched(changed: bool) -> Flow {
    if changed {
        Flow::Repaint
    } else {
        Flow::Continue
    }
}
