// File: dynaform/src/value.rs
// Purpose: Runtime values held by form controls

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dynaform_validation::char_len;

/// Opaque handle to a file picked by the user
///
/// The form never reads file contents; it only carries the handle from the
/// file picker to the submitted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl FileHandle {
    /// Create a handle with a fresh id
    pub fn new(name: impl Into<String>, size: u64, mime_type: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            size,
            mime_type,
        }
    }
}

/// Value of a single control
///
/// Serialized untagged, so values round-trip through plain JSON. Equality is
/// exact: `Number(1.0)` is never equal to `Text("1")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<FieldValue>),
    File(FileHandle),
}

impl FieldValue {
    /// Empty for the purposes of `required`
    ///
    /// `Bool(false)` and numbers are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Bool(_) | FieldValue::Number(_) | FieldValue::File(_) => false,
        }
    }

    /// Length for min/max length rules (characters of text, items of a list)
    pub fn length(&self) -> Option<usize> {
        match self {
            FieldValue::Text(s) => Some(char_len(s)),
            FieldValue::List(items) => Some(items.len()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileHandle> {
        match self {
            FieldValue::File(file) => Some(file),
            _ => None,
        }
    }

    /// Convert to a plain JSON value
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Display form used for labels and logs
    pub fn display(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Number(n) => {
                // Integral values print without ".0" while they fit an i64 exactly
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => {
                let items: Vec<String> = items.iter().map(FieldValue::display).collect();
                format!("[{}]", items.join(", "))
            }
            FieldValue::File(file) => file.name.clone(),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(items: Vec<FieldValue>) -> Self {
        FieldValue::List(items)
    }
}

impl From<FileHandle> for FieldValue {
    fn from(file: FileHandle) -> Self {
        FieldValue::File(file)
    }
}
