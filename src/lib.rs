//! Declarative terminal forms.
//!
//! Widgets are built from YAML/JSON descriptors and run inside one of three
//! containers: a [`Form`] with a submit gate, a [`Layout`] that arranges
//! widgets along an axis, or a [`TabContainer`] of named groups. Containers
//! own focus traversal and validation; the binary adds a ratatui front end.

pub mod app;
pub mod config;
pub mod core;
pub mod descriptor;
pub mod shell;
pub mod ui;
pub mod widgets;

pub use app::event::AppEvent;
pub use app::form::Form;
pub use app::layout::Layout;
pub use app::screen::{Container, Outcome, Screen, ScreenKind};
pub use app::tabs::{TabContainer, TabGroup};
pub use app::Flow;
pub use config::{Action, AppConfig, KeyMap};
pub use crate::core::{
    ConstructionError, Diagnostic, DiagnosticSink, Format, GroupValueMap, ImportError,
    SerializationError, ValidationSnapshot, Value, ValueError, ValueMap,
};
pub use widgets::{AnyWidget, EventResult, Widget};
