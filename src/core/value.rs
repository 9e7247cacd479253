//! Widget values: the closed set of shapes a widget can hold or report.

use std::fmt;

use std::path::Path;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};

use super::error::SerializationError;

/// A widget's current value.
///
/// Serialises untagged, so a form payload reads as plain JSON:
/// `{"name": "ada", "agree": true, "volume": 40}`. Whole numbers are
/// written without a fraction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    Text(String),
}

/// Discriminant of [`Value`], used in type-mismatch reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Number,
    Text,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::Text => "text",
        })
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::Text(_) => ValueKind::Text,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// JSON has no NaN or infinity.
    pub fn ensure_encodable(&self, name: &str) -> Result<(), SerializationError> {
        match self {
            Value::Number(n) if !n.is_finite() => Err(SerializationError::NonFinite {
                name: name.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Convert a scalar from a parsed descriptor. Arrays, objects and null
    /// have no widget value shape.
    pub fn from_json(raw: &serde_json::Value) -> Option<Self> {
        match raw {
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number),
            serde_json::Value::String(s) => Some(Value::Text(s.clone())),
            _ => None,
        }
    }
}

/// Largest magnitude at which every whole `f64` is exact.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) if is_integral(*n) => serializer.serialize_i64(*n as i64),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

/// Widget name → value, in widget order.
pub type ValueMap = IndexMap<String, Value>;

/// Group name → that group's [`ValueMap`], in group order.
pub type GroupValueMap = IndexMap<String, ValueMap>;

// ───────────────────────────────────────── formats ───────────

/// Text encoding for value payloads, both written and read back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

impl Format {
    /// `.json` is JSON; anything else is read as YAML, which accepts JSON too.
    pub fn from_path(path: &Path) -> Self {
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Format::Json
        } else {
            Format::Yaml
        }
    }

    /// `pretty` only affects JSON; YAML is always block style. The result
    /// carries no trailing newline.
    pub fn encode<T: Serialize + ?Sized>(
        self,
        values: &T,
        pretty: bool,
    ) -> Result<String, SerializationError> {
        let text = match self {
            Format::Json if pretty => serde_json::to_string_pretty(values)?,
            Format::Json => serde_json::to_string(values)?,
            Format::Yaml => serde_yaml::to_string(values)?.trim_end().to_string(),
        };
        Ok(text)
    }

    pub fn decode<T: DeserializeOwned>(self, text: &str) -> Result<T, SerializationError> {
        let parsed = match self {
            Format::Json => serde_json::from_str(text)?,
            Format::Yaml => serde_yaml::from_str(text)?,
        };
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(Value::from_json(&serde_json::json!(true)), Some(Value::Bool(true)));
        assert_eq!(Value::from_json(&serde_json::json!(3)), Some(Value::Number(3.0)));
        assert_eq!(Value::from_json(&serde_json::json!("x")), Some(Value::from("x")));
        assert_eq!(Value::from_json(&serde_json::json!([1, 2])), None);
        assert_eq!(Value::from_json(&serde_json::Value::Null), None);
    }

    #[test]
    fn test_untagged_serialisation() {
        let mut map = ValueMap::new();
        map.insert("name".into(), Value::from("ada"));
        map.insert("agree".into(), Value::Bool(true));
        map.insert("volume".into(), Value::Number(40.5));
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"name":"ada","agree":true,"volume":40.5}"#);
    }

    #[test]
    fn test_whole_numbers_have_no_fraction() {
        let mut map = ValueMap::new();
        map.insert("volume".into(), Value::Number(40.0));
        map.insert("offset".into(), Value::Number(-3.0));
        map.insert("ratio".into(), Value::Number(0.25));
        map.insert("huge".into(), Value::Number(1e300));
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"volume":40,"offset":-3,"ratio":0.25,"huge":1e300}"#
        );
    }

    #[test]
    fn test_yaml_encoding_and_decoding() {
        let mut map = ValueMap::new();
        map.insert("name".into(), Value::from("ada"));
        map.insert("agree".into(), Value::Bool(true));
        map.insert("volume".into(), Value::Number(40.0));
        let yaml = Format::Yaml.encode(&map, true).unwrap();
        assert_eq!(yaml, "name: ada\nagree: true\nvolume: 40");

        let back: ValueMap = Format::Yaml.decode("volume: 12\nname: bob\n").unwrap();
        assert_eq!(back["volume"], Value::Number(12.0));
        assert_eq!(back["name"], Value::from("bob"));
        assert!(Format::Json.decode::<ValueMap>("{not json").is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a/b.JSON")), Format::Json);
        assert_eq!(Format::from_path(Path::new("b.yml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("noext")), Format::Yaml);
    }

    #[test]
    fn test_non_finite_not_encodable() {
        assert!(Value::Number(f64::NAN).ensure_encodable("x").is_err());
        assert!(Value::Number(1.0).ensure_encodable("x").is_ok());
    }
}
