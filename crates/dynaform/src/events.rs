// File: dynaform/src/events.rs
// Purpose: Change events published by a live form

use serde::Serialize;

use crate::submit::ConsolidatedValue;
use crate::value::FieldValue;

/// Something observable happened to the form
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FormEvent {
    /// A control's value was written, by the user or by a reset
    ValueChanged { field: String, value: FieldValue },

    /// A control switched between enabled and disabled
    StatusChanged { field: String, disabled: bool },

    /// A valid submission was assembled
    Submitted { value: ConsolidatedValue },
}

impl FormEvent {
    pub fn value_changed(field: &str, value: &FieldValue) -> Self {
        FormEvent::ValueChanged {
            field: field.to_string(),
            value: value.clone(),
        }
    }

    pub fn status_changed(field: &str, disabled: bool) -> Self {
        FormEvent::StatusChanged {
            field: field.to_string(),
            disabled,
        }
    }

    /// Field the event is about, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            FormEvent::ValueChanged { field, .. } | FormEvent::StatusChanged { field, .. } => {
                Some(field.as_str())
            }
            FormEvent::Submitted { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_json_shape() {
        let event = FormEvent::status_changed("state", true);
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"event": "status_changed", "field": "state", "disabled": true})
        );

        let event = FormEvent::value_changed("country", &FieldValue::from("US"));
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"event": "value_changed", "field": "country", "value": "US"})
        );
    }
}
