//! Core data types – values, errors, diagnostics, and directory listing.
//!
//! Nothing in this module depends on any TUI or rendering crate.

pub mod diagnostics;
pub mod error;
pub mod fs;
pub mod value;

pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Severity, TracingSink, ValidationSnapshot};
pub use error::{ConstructionError, ImportError, SerializationError, ValueError};
pub use value::{Format, GroupValueMap, Value, ValueKind, ValueMap};
