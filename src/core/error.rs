//! Error types for widget construction, value assignment and serialisation.
//!
//! None of these abort the event loop: construction errors surface before a
//! container exists, value errors are returned to the caller that attempted
//! the assignment, and validation failures are plain widget state.

use thiserror::Error;

use super::value::ValueKind;

/// Failure to turn a descriptor into a widget (or a batch of widgets).
#[derive(Debug, Error)]
pub enum ConstructionError {
    #[error("unsupported widget kind `{kind}` for `{name}`")]
    UnsupportedKind { name: String, kind: String },

    #[error("invalid descriptor `{name}`: {reason}")]
    InvalidDescriptor { name: String, reason: String },

    #[error("invalid pattern for `{name}`: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("duplicate widget name `{name}`")]
    DuplicateName { name: String },

    /// A tab group failed to build; `index` is the group's position.
    #[error("group #{index} (`{group}`): {source}")]
    InGroup {
        index: usize,
        group: String,
        #[source]
        source: Box<ConstructionError>,
    },

    /// A batch build failed; `index` is the failing descriptor's position.
    #[error("descriptor #{index} (`{name}`): {source}")]
    Batch {
        index: usize,
        name: String,
        #[source]
        source: Box<ConstructionError>,
    },
}

impl ConstructionError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        ConstructionError::InvalidDescriptor {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn in_group(index: usize, group: &str, source: ConstructionError) -> Self {
        ConstructionError::InGroup {
            index,
            group: group.to_string(),
            source: Box::new(source),
        }
    }

    /// Innermost error of a (possibly nested) batch or group failure.
    pub fn root_cause(&self) -> &ConstructionError {
        match self {
            ConstructionError::Batch { source, .. } | ConstructionError::InGroup { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

/// Rejected `set_value` call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("expected a {expected} value, got {found}")]
    TypeMismatch { expected: ValueKind, found: ValueKind },

    #[error("{value} is outside [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },

    #[error("{len} characters exceeds the limit of {max}")]
    TooLong { len: usize, max: usize },

    #[error("unknown selection id `{0}`")]
    UnknownSelectionId(String),
}

impl ValueError {
    pub(crate) fn mismatch(expected: ValueKind, found: ValueKind) -> Self {
        ValueError::TypeMismatch { expected, found }
    }
}

/// A widget produced a value the output encoding cannot represent.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("`{name}` holds a non-finite number")]
    NonFinite { name: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// One entry of an imported value map that could not be applied. The other
/// entries are still applied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportError {
    #[error("no widget named `{0}`")]
    UnknownWidget(String),

    #[error("no group named `{0}`")]
    UnknownGroup(String),

    #[error("`{name}`: {source}")]
    Rejected {
        name: String,
        #[source]
        source: ValueError,
    },
}

impl ImportError {
    /// Key of the entry that failed (`widget` or `group.widget`).
    pub fn key(&self) -> &str {
        match self {
            ImportError::UnknownWidget(name)
            | ImportError::UnknownGroup(name)
            | ImportError::Rejected { name, .. } => name,
        }
    }
}
