// File: dynaform/src/error.rs
// Purpose: Error types for schema checking and form operations

use thiserror::Error;

/// A single problem found while checking a schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaIssue {
    #[error("field #{index} has no name")]
    MissingName { index: usize },

    #[error("field '{name}' is declared more than once")]
    DuplicateName { name: String },

    #[error("field '{field}' has unknown type '{field_type}'")]
    UnknownFieldType { field: String, field_type: String },

    #[error("field '{field}' depends on '{target}', which does not exist")]
    DanglingDependency { field: String, target: String },

    #[error("field '{field}' depends on itself")]
    SelfDependency { field: String },

    #[error("dependency cycle between fields: {}", fields.join(" -> "))]
    DependencyCycle { fields: Vec<String> },

    #[error("field '{field}' has invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        field: String,
        pattern: String,
        reason: String,
    },
}

impl SchemaIssue {
    /// Name of the field the issue is about, if it has one
    pub fn field(&self) -> Option<&str> {
        match self {
            SchemaIssue::MissingName { .. } => None,
            SchemaIssue::DuplicateName { name } => Some(name.as_str()),
            SchemaIssue::UnknownFieldType { field, .. }
            | SchemaIssue::DanglingDependency { field, .. }
            | SchemaIssue::SelfDependency { field }
            | SchemaIssue::InvalidPattern { field, .. } => Some(field.as_str()),
            SchemaIssue::DependencyCycle { fields } => fields.first().map(String::as_str),
        }
    }
}

/// A schema rejected by strict checking, with every offending entry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render_issues(.issues))]
pub struct SchemaError {
    pub issues: Vec<SchemaIssue>,
}

fn render_issues(issues: &[SchemaIssue]) -> String {
    let plural = if issues.len() == 1 { "" } else { "s" };
    let mut text = format!("invalid form schema ({} issue{})", issues.len(), plural);
    for issue in issues {
        text.push_str(&format!("\n  - {}", issue));
    }
    text
}

impl SchemaError {
    pub fn new(issues: Vec<SchemaIssue>) -> Self {
        Self { issues }
    }

    /// Names of all offending fields, deduplicated, in issue order
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for field in self.issues.iter().filter_map(SchemaIssue::field) {
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
        fields
    }
}

/// Errors returned by operations on a live form
#[derive(Debug, Error)]
pub enum FormError {
    #[error("no control named '{0}'")]
    UnknownField(String),

    #[error("control '{0}' is disabled")]
    Disabled(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("failed to parse schema: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_lists_every_issue() {
        let err = SchemaError::new(vec![
            SchemaIssue::DuplicateName {
                name: "email".to_string(),
            },
            SchemaIssue::DanglingDependency {
                field: "state".to_string(),
                target: "country".to_string(),
            },
        ]);

        let text = err.to_string();
        assert!(text.starts_with("invalid form schema (2 issues)"));
        assert!(text.contains("field 'email' is declared more than once"));
        assert!(text.contains("field 'state' depends on 'country', which does not exist"));
        assert_eq!(err.fields(), vec!["email", "state"]);
    }

    #[test]
    fn test_single_issue_is_not_pluralized() {
        let err = SchemaError::new(vec![SchemaIssue::MissingName { index: 2 }]);
        assert_eq!(err.to_string(), "invalid form schema (1 issue)\n  - field #2 has no name");

        let err: Box<dyn std::error::Error> = Box::new(err);
        assert!(err.source().is_none());
    }

    #[test]
    fn test_cycle_message() {
        let issue = SchemaIssue::DependencyCycle {
            fields: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert_eq!(issue.to_string(), "dependency cycle between fields: a -> b -> a");
    }
}
