//! Diagnostics: validation results and advisory warnings, reported through
//! an optional sink handed to a container at construction time.
//!
//! A container without a sink is fully functional; the snapshot returned by
//! `validation()` carries the same information.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCode {
    /// A widget failed one of its rules.
    Validation,
    /// The same widget name holds different values in two tab groups.
    Conflict,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    /// Widget key the diagnostic refers to (`name` or `group.name`).
    pub field: String,
    pub message: String,
}

impl Diagnostic {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: DiagnosticCode::Validation,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn conflict(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code: DiagnosticCode::Conflict,
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Receiver of diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: &Diagnostic);
}

/// Collects everything it receives.
impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: &Diagnostic) {
        self.push(diagnostic.clone());
    }
}

/// Shared handle, so the caller can read what a container reported.
impl<S: DiagnosticSink> DiagnosticSink for Rc<RefCell<S>> {
    fn report(&mut self, diagnostic: &Diagnostic) {
        self.borrow_mut().report(diagnostic);
    }
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, d: &Diagnostic) {
        match d.severity {
            Severity::Error => tracing::debug!(field = %d.field, code = ?d.code, "{}", d.message),
            Severity::Warning => tracing::warn!(field = %d.field, code = ?d.code, "{}", d.message),
        }
    }
}

/// Derived view of a container's validation state. Computed on demand,
/// never cached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationSnapshot {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    /// Widget key → current error message, for invalid widgets only.
    pub errors: IndexMap<String, String>,
    /// Validation errors followed by any advisory warnings.
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationSnapshot {
    pub fn is_valid(&self) -> bool {
        self.invalid == 0
    }

    pub(crate) fn record(&mut self, key: String, valid: bool, error: Option<&str>) {
        self.total += 1;
        if valid {
            self.valid += 1;
            return;
        }
        self.invalid += 1;
        let message = error.unwrap_or("invalid value").to_string();
        self.diagnostics.push(Diagnostic::validation(key.clone(), message.clone()));
        self.errors.insert(key, message);
    }

    pub fn conflicts(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.code == DiagnosticCode::Conflict)
    }

    pub(crate) fn emit(&self, sink: Option<&mut (dyn DiagnosticSink + 'static)>) {
        if let Some(sink) = sink {
            for d in &self.diagnostics {
                sink.report(d);
            }
        }
    }
}
