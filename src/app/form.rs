//! Form container: an ordered list of widgets with focus traversal, a
//! submit gate, and name → value serialisation.
//!
//! Dispatch order for one event:
//! 1. resize events go to every widget;
//! 2. quit keys set `quitting` and exit;
//! 3. focus keys move the cursor;
//! 4. the submit key exits when every widget is valid, and otherwise
//!    surfaces every widget's error and keeps running;
//! 5. anything else goes to the focused widget.

use crossterm::event::KeyEventKind;

use super::event::AppEvent;
use super::focus::FocusList;
use super::Flow;
use crate::config::{Action, KeyMap};
use crate::core::{
    ConstructionError, DiagnosticSink, Format, ImportError, SerializationError,
    ValidationSnapshot, ValueMap,
};
use crate::descriptor::FormDescriptor;
use crate::widgets::{build_all, AnyWidget, Widget};

pub struct Form {
    title: String,
    description: String,
    list: FocusList,
    quitting: bool,
    submitted: bool,
    sink: Option<Box<dyn DiagnosticSink>>,
}

impl Form {
    pub fn new(title: impl Into<String>, widgets: Vec<AnyWidget>) -> Self {
        let mut list = FocusList::new(widgets);
        list.apply_focus(true);
        Self {
            title: title.into(),
            description: String::new(),
            list,
            quitting: false,
            submitted: false,
            sink: None,
        }
    }

    pub fn from_descriptor(desc: &FormDescriptor) -> Result<Self, ConstructionError> {
        desc.validate()?;
        let widgets = build_all(&desc.widgets)?;
        let mut form = Self::new(desc.title.clone(), widgets);
        form.description = desc.description.clone();
        Ok(form)
    }

    /// Report validation diagnostics to `sink` whenever errors are surfaced.
    pub fn with_sink(mut self, sink: Box<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
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

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn pending_errors(&self) -> usize {
        self.list.pending_errors()
    }

    pub fn focus_next(&mut self) {
        self.list.focus_next();
    }

    pub fn focus_prev(&mut self) {
        self.list.focus_prev();
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
            Some(Action::Submit) => {
                if self.can_submit() {
                    tracing::info!(form = %self.title, "form submitted");
                    self.submitted = true;
                    Flow::Exit
                } else {
                    let snapshot = self.validate_all();
                    tracing::debug!(invalid = snapshot.invalid, "submit refused");
                    Flow::Repaint
                }
            }
            _ => self.list.route(event).into(),
        }
    }

    /// `true` iff every widget passes its rules. Recomputed on every call;
    /// refreshes each widget's stored error as a side effect.
    pub fn can_submit(&mut self) -> bool {
        self.list.validate_each()
    }

    /// Validate every widget, report failures to the sink, and return the
    /// snapshot.
    pub fn validate_all(&mut self) -> ValidationSnapshot {
        let mut snapshot = ValidationSnapshot::default();
        for w in self.list.widgets_mut() {
            let valid = w.is_valid();
            snapshot.record(w.name().to_string(), valid, w.error());
        }
        snapshot.emit(self.sink.as_deref_mut());
        snapshot
    }

    /// Ordered name → value map. Static labels contribute their text.
    pub fn serialize(&self) -> Result<ValueMap, SerializationError> {
        self.list.encodable_values()
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

    /// Assign values by widget name. Entries naming no widget, or that a
    /// widget rejects, are returned and leave that widget unchanged.
    pub fn import(&mut self, values: &ValueMap) -> Vec<ImportError> {
        let failures = self.list.import(values, None);
        for failure in &failures {
            tracing::warn!(%failure, "value not imported");
        }
        failures
    }

    /// Every widget back to its initial state, focus on the first focusable.
    pub fn reset(&mut self) {
        self.list.reset();
        self.list.apply_focus(true);
        self.quitting = false;
        self.submitted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Diagnostic, Value, ValueError};
    use crate::descriptor::WidgetDescriptor;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn form(descs: Vec<WidgetDescriptor>) -> Form {
        Form::from_descriptor(&FormDescriptor {
            title: "test".into(),
            description: String::new(),
            widgets: descs,
        })
        .unwrap()
    }

    fn send(form: &mut Form, code: KeyCode) -> Flow {
        form.dispatch(&AppEvent::key(code), &KeyMap::default())
    }

    #[test]
    fn test_focus_starts_on_first_focusable() {
        let f = form(vec![
            WidgetDescriptor::new("label", "intro").label("Hello"),
            WidgetDescriptor::new("textinput", "name"),
        ]);
        assert_eq!(f.cursor(), Some(1));
        assert!(f.focused().is_some_and(|w| w.is_focused()));
    }

    #[test]
    fn test_tab_cycles_focus() {
        let mut f = form(vec![
            WidgetDescriptor::new("textinput", "a"),
            WidgetDescriptor::new("checkbox", "b"),
        ]);
        assert_eq!(send(&mut f, KeyCode::Tab), Flow::Repaint);
        assert_eq!(f.cursor(), Some(1));
        send(&mut f, KeyCode::Tab);
        assert_eq!(f.cursor(), Some(0));
        f.dispatch(
            &AppEvent::key_with(KeyCode::BackTab, KeyModifiers::SHIFT),
            &KeyMap::default(),
        );
        assert_eq!(f.cursor(), Some(1));
        assert_eq!(f.widgets().iter().filter(|w| w.is_focused()).count(), 1);
    }

    #[test]
    fn test_quit_sets_flag() {
        let mut f = form(vec![WidgetDescriptor::new("textinput", "a")]);
        assert_eq!(send(&mut f, KeyCode::Esc), Flow::Exit);
        assert!(f.is_quitting());
        assert!(!f.is_submitted());
    }

    #[test]
    fn test_submit_gate_and_sink() {
        let sink = Rc::new(RefCell::new(Vec::<Diagnostic>::new()));
        let mut f = form(vec![
            WidgetDescriptor::new("textinput", "user").required(),
            WidgetDescriptor::new("checkbox", "terms").required(),
        ])
        .with_sink(Box::new(Rc::clone(&sink)));

        assert_eq!(send(&mut f, KeyCode::Enter), Flow::Repaint);
        assert!(!f.is_submitted());
        assert_eq!(f.pending_errors(), 2);
        let fields: Vec<_> = sink.borrow().iter().map(|d| d.field.clone()).collect();
        assert_eq!(fields, vec!["user", "terms"]);

        send(&mut f, KeyCode::Char('x'));
        send(&mut f, KeyCode::Tab);
        send(&mut f, KeyCode::Char(' '));
        assert_eq!(send(&mut f, KeyCode::Enter), Flow::Exit);
        assert!(f.is_submitted());
    }

    #[test]
    fn test_validate_all_snapshot() {
        let mut f = form(vec![
            WidgetDescriptor::new("textinput", "user").required(),
            WidgetDescriptor::new("slider", "vol"),
        ]);
        let snap = f.validate_all();
        assert_eq!((snap.total, snap.valid, snap.invalid), (2, 1, 1));
        assert_eq!(snap.errors.get("user").map(String::as_str), Some("This field is required"));
    }

    #[test]
    fn test_serialize_in_order_with_labels() {
        let f = form(vec![
            WidgetDescriptor::new("label", "hdr").label("Profile"),
            WidgetDescriptor::new("textinput", "city").default_value(json!("Oslo")),
            WidgetDescriptor::new("slider", "age").default_value(json!(30)),
        ]);
        let values = f.serialize().unwrap();
        let keys: Vec<_> = values.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["hdr", "city", "age"]);
        assert_eq!(values["hdr"], Value::from("Profile"));
        assert_eq!(f.to_json(false).unwrap(), r#"{"hdr":"Profile","city":"Oslo","age":30}"#);
        assert_eq!(f.to_yaml().unwrap(), "hdr: Profile\ncity: Oslo\nage: 30");
    }

    #[test]
    fn test_resize_reaches_unfocused_widgets() {
        let mut f = form(vec![
            WidgetDescriptor::new("textinput", "a"),
            WidgetDescriptor::new("textarea", "b"),
        ]);
        assert_eq!(
            f.dispatch(&AppEvent::Resize(100, 30), &KeyMap::default()),
            Flow::Repaint
        );
        match f.widget("b") {
            Some(AnyWidget::MultilineText(area)) => assert_eq!(area.width(), 90),
            other => panic!("unexpected widget: {other:?}"),
        }
    }

    #[test]
    fn test_reset_restores_everything() {
        let mut f = form(vec![
            WidgetDescriptor::new("textinput", "a").default_value(json!("x")),
            WidgetDescriptor::new("checkbox", "b"),
        ]);
        send(&mut f, KeyCode::Char('y'));
        send(&mut f, KeyCode::Tab);
        f.reset();
        assert_eq!(f.cursor(), Some(0));
        assert_eq!(f.widget("a").map(|w| w.value()), Some(Value::from("x")));
    }

    #[test]
    fn test_release_keys_are_ignored() {
        let mut f = form(vec![
            WidgetDescriptor::new("textinput", "a"),
            WidgetDescriptor::new("checkbox", "b"),
        ]);
        let keymap = KeyMap::default();
        for code in [KeyCode::Enter, KeyCode::Tab, KeyCode::Esc, KeyCode::Char('z')] {
            let release = AppEvent::Key(KeyEvent::new_with_kind(
                code,
                KeyModifiers::NONE,
                KeyEventKind::Release,
            ));
            assert_eq!(f.dispatch(&release, &keymap), Flow::Continue);
        }
        assert!(!f.is_submitted());
        assert!(!f.is_quitting());
        assert_eq!(f.cursor(), Some(0));
        assert_eq!(f.widget("a").map(|w| w.value()), Some(Value::from("")));
    }

    #[test]
    fn test_import_applies_valid_entries_and_reports_the_rest() {
        let mut f = form(vec![
            WidgetDescriptor::new("textinput", "user"),
            WidgetDescriptor::new("radiogroup", "plan")
                .option("items", json!([{"id": "free"}, {"id": "pro"}])),
            WidgetDescriptor::new("checkbox", "terms"),
            WidgetDescriptor::new("slider", "vol"),
        ]);
        let mut values = ValueMap::new();
        values.insert("user".into(), Value::from("ada"));
        values.insert("plan".into(), Value::from("enterprise"));
        values.insert("terms".into(), Value::from("yes"));
        values.insert("vol".into(), Value::Number(70.0));
        values.insert("ghost".into(), Value::Bool(true));

        let failures = f.import(&values);
        assert_eq!(
            failures,
            vec![
                ImportError::Rejected {
                    name: "plan".into(),
                    source: ValueError::UnknownSelectionId("enterprise".into()),
                },
                ImportError::Rejected {
                    name: "terms".into(),
                    source: ValueError::TypeMismatch {
                        expected: crate::core::ValueKind::Bool,
                        found: crate::core::ValueKind::Text,
                    },
                },
                ImportError::UnknownWidget("ghost".into()),
            ]
        );
        assert_eq!(f.to_json(false).unwrap(), r#"{"user":"ada","plan":"","terms":false,"vol":70}"#);
    }

    #[test]
    fn test_duplicate_names_report_position() {
        let desc = FormDescriptor {
            widgets: vec![
                WidgetDescriptor::new("text", "a"),
                WidgetDescriptor::new("text", "b"),
                WidgetDescriptor::new("boolean", "a"),
            ],
            ..FormDescriptor::default()
        };
        let err = Form::from_descriptor(&desc).err().unwrap();
        match &err {
            ConstructionError::Batch { index, name, source } => {
                assert_eq!((*index, name.as_str()), (2, "a"));
                assert!(matches!(**source, ConstructionError::DuplicateName { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "descriptor #2 (`a`): duplicate widget name `a`"
        );
    }
}
