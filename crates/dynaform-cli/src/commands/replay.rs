use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dynaform::{DynamicForm, FieldValue, FileHandle, FileSelection, FormConfig};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{info, warn};

use super::load_schema;

/// One scripted UI interaction
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Set { field: String, value: FieldValue },
    Touch(String),
    Attach {
        field: String,
        name: String,
        #[serde(default)]
        size: u64,
        #[serde(default)]
        mime_type: Option<String>,
    },
    /// Payload ignored; written as `{"submit": null}`
    Submit(serde_json::Value),
    /// Payload ignored; written as `{"reset": null}`
    Reset(serde_json::Value),
}

pub fn execute(schema_path: &Path, script_path: &Path, config: FormConfig) -> Result<()> {
    let schema = load_schema(schema_path)?;
    let content = fs::read_to_string(script_path)
        .with_context(|| format!("Failed to read script file: {:?}", script_path))?;
    let actions: Vec<Action> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse script file: {:?}", script_path))?;

    let mut form = DynamicForm::new(schema, config)?;
    info!(actions = actions.len(), "Replaying script");

    for line in replay(&mut form, &actions) {
        println!("{}", line);
    }
    Ok(())
}

/// Apply every action and collect the resulting output lines
pub fn replay(form: &mut DynamicForm, actions: &[Action]) -> Vec<serde_json::Value> {
    let mut rx = form.subscribe();
    let mut lines = Vec::new();

    for (index, action) in actions.iter().enumerate() {
        if let Some(rejection) = apply(form, action) {
            lines.push(json!({"event": "rejected", "action": index, "error": rejection}));
        }

        loop {
            match rx.try_recv() {
                Ok(event) => lines.push(serde_json::to_value(&event).unwrap_or_default()),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, action = index, "Event channel overflowed, events were dropped");
                    lines.push(json!({"event": "lagged", "action": index, "skipped": skipped}));
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }

    lines
}

/// Returns a message when the form refused the action
fn apply(form: &mut DynamicForm, action: &Action) -> Option<String> {
    let result = match action {
        Action::Set { field, value } => form.set_value(field, value.clone()),
        Action::Touch(field) => form.mark_touched(field),
        Action::Attach {
            field,
            name,
            size,
            mime_type,
        } => {
            let file = FileHandle::new(name.clone(), *size, mime_type.clone());
            form.on_file_change(field, &FileSelection::single(file)).map(|_| ())
        }
        Action::Submit(_) => {
            if form.submit().is_none() {
                return Some(submit_rejection(form));
            }
            Ok(())
        }
        Action::Reset(_) => {
            form.reset();
            Ok(())
        }
    };

    result.err().map(|e| e.to_string())
}

fn submit_rejection(form: &DynamicForm) -> String {
    let failing: Vec<String> = form
        .model()
        .errors()
        .into_iter()
        .map(|(field, errors)| {
            let kinds: Vec<String> = errors.iter().map(|e| e.kind().to_string()).collect();
            format!("{} ({})", field, kinds.join(", "))
        })
        .collect();
    format!("form is invalid: {}", failing.join("; "))
}
