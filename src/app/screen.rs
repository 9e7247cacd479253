//! The one container a session runs, plus how the session ended.

use std::path::Path;

use anyhow::Context;
use crossterm::event::KeyEventKind;

use super::event::AppEvent;
use super::form::Form;
use super::layout::Layout;
use super::tabs::TabContainer;
use super::Flow;
use crate::config::{Action, KeyMap};
use crate::core::{Format, ImportError, SerializationError, TracingSink};
use crate::descriptor::{self, FormDescriptor, LayoutDescriptor, TabsDescriptor};
use crate::widgets::{AnyWidget, Widget};

/// Which container a descriptor file describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScreenKind {
    Form,
    Layout,
    Tabs,
}

pub enum Container {
    Form(Form),
    Layout(Layout),
    Tabs(TabContainer),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Submitted,
    Quit,
}

pub struct Screen {
    container: Container,
    outcome: Option<Outcome>,
}

impl Screen {
    /// Tab containers are focused on entry. Form and tab containers report
    /// their diagnostics through `tracing`.
    pub fn new(container: Container) -> Self {
        let container = match container {
            Container::Form(form) => Container::Form(form.with_sink(Box::new(TracingSink))),
            Container::Tabs(mut tabs) => {
                tabs.set_focus(true);
                Container::Tabs(tabs.with_sink(Box::new(TracingSink)))
            }
            layout @ Container::Layout(_) => layout,
        };
        Self {
            container,
            outcome: None,
        }
    }

    /// Read a descriptor file and build the container it describes.
    pub fn load(kind: ScreenKind, path: &Path) -> anyhow::Result<Self> {
        let container = match kind {
            ScreenKind::Form => {
                let desc: FormDescriptor = descriptor::load(path)?;
                Container::Form(Form::from_descriptor(&desc).context("building form")?)
            }
            ScreenKind::Layout => {
                let desc: LayoutDescriptor = descriptor::load(path)?;
                Container::Layout(Layout::from_descriptor(&desc).context("building layout")?)
            }
            ScreenKind::Tabs => {
                let desc: TabsDescriptor = descriptor::load(path)?;
                Container::Tabs(TabContainer::from_descriptor(&desc).context("building tabs")?)
            }
        };
        tracing::info!(?kind, path = %path.display(), "screen loaded");
        Ok(Self::new(container))
    }

    /// Preset widget values from a file (a name → value map, or group →
    /// name → value for tabs). JSON or YAML by extension. Entries that do not
    /// apply are returned; the rest are kept.
    pub fn prefill(&mut self, path: &Path) -> anyhow::Result<Vec<ImportError>> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let format = Format::from_path(path);
        let parsing = || format!("parsing {}", path.display());
        let failures = match &mut self.container {
            Container::Form(f) => f.import(&format.decode(&text).with_context(parsing)?),
            Container::Layout(l) => l.import(&format.decode(&text).with_context(parsing)?),
            Container::Tabs(t) => t.import(&format.decode(&text).with_context(parsing)?),
        };
        tracing::info!(path = %path.display(), rejected = failures.len(), "values prefilled");
        Ok(failures)
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn title(&self) -> &str {
        match &self.container {
            Container::Form(f) => f.title(),
            Container::Layout(l) => l.title(),
            Container::Tabs(t) => t.title(),
        }
    }

    /// Every widget, in display order (tab groups one after another).
    pub fn widgets(&self) -> Box<dyn Iterator<Item = &AnyWidget> + '_> {
        match &self.container {
            Container::Form(f) => Box::new(f.widgets().iter()),
            Container::Layout(l) => Box::new(l.widgets().iter()),
            Container::Tabs(t) => Box::new(t.groups().iter().flat_map(|g| g.widgets())),
        }
    }

    /// The widget currently receiving keys, if any.
    pub fn focused(&self) -> Option<&AnyWidget> {
        match &self.container {
            Container::Form(f) => f.focused(),
            Container::Layout(l) => l.focused(),
            Container::Tabs(t) if t.is_focused() => t.active_group().focused(),
            Container::Tabs(_) => None,
        }
    }

    pub fn pending_errors(&self) -> usize {
        self.widgets().filter(|w| w.error().is_some()).count()
    }

    /// Container-level actions worth advertising in the status bar.
    pub fn actions(&self) -> &'static [Action] {
        match &self.container {
            Container::Form(_) => &[Action::FocusNext, Action::Submit, Action::Quit],
            Container::Layout(_) => &[Action::FocusNext, Action::Quit],
            Container::Tabs(_) => &[
                Action::FocusNext,
                Action::NextGroup,
                Action::Submit,
                Action::Quit,
            ],
        }
    }

    pub fn dispatch(&mut self, event: &AppEvent, keymap: &KeyMap) -> Flow {
        match &mut self.container {
            Container::Form(form) => {
                let flow = form.dispatch(event, keymap);
                if flow == Flow::Exit {
                    self.outcome = Some(if form.is_submitted() {
                        Outcome::Submitted
                    } else {
                        Outcome::Quit
                    });
                }
                flow
            }
            Container::Layout(layout) => {
                let flow = layout.dispatch(event, keymap);
                if flow == Flow::Exit {
                    self.outcome = Some(Outcome::Quit);
                }
                flow
            }
            Container::Tabs(tabs) => {
                let action = match event {
                    AppEvent::Key(key) if key.kind != KeyEventKind::Release => {
                        keymap.match_key(*key)
                    }
                    _ => None,
                };
                match action {
                    Some(Action::Quit) => {
                        self.outcome = Some(Outcome::Quit);
                        Flow::Exit
                    }
                    Some(Action::Submit) => {
                        if tabs.is_valid() {
                            tracing::info!(tabs = %tabs.title(), "tabs submitted");
                            self.outcome = Some(Outcome::Submitted);
                            Flow::Exit
                        } else {
                            let snapshot = tabs.validation();
                            tracing::debug!(invalid = snapshot.invalid, "submit refused");
                            Flow::Repaint
                        }
                    }
                    _ => tabs.dispatch(event, keymap),
                }
            }
        }
    }

    /// The submitted values in `format`, or `None` unless a submit
    /// succeeded. Layouts have nothing to submit.
    pub fn result(
        &self,
        format: Format,
        pretty: bool,
    ) -> Result<Option<String>, SerializationError> {
        if self.outcome != Some(Outcome::Submitted) {
            return Ok(None);
        }
        match &self.container {
            Container::Form(f) => f.encode(format, pretty).map(Some),
            Container::Tabs(t) => t.encode(format, pretty).map(Some),
            Container::Layout(_) => Ok(None),
        }
    }

    pub fn result_json(&self, pretty: bool) -> Result<Option<String>, SerializationError> {
        self.result(Format::Json, pretty)
    }

    /// One-line description for `check`.
    pub fn summary(&self) -> String {
        let widgets = self.widgets().count();
        let focusable = self.widgets().filter(|w| w.can_focus()).count();
        match &self.container {
            Container::Form(_) => format!("form: {widgets} widgets ({focusable} focusable)"),
            Container::Layout(l) => format!(
                "layout ({:?}): {widgets} widgets ({focusable} focusable)",
                l.axis()
            ),
            Container::Tabs(t) => format!(
                "tabs: {} groups, {widgets} widgets ({focusable} focusable)",
                t.groups().len()
            ),
        }
    }
}
