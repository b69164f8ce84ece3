// File: dynaform/src/validator.rs
// Purpose: Translate declarative validator rules into runtime checks

use std::fmt;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use dynaform_validation::{is_valid_email, meets_max, meets_max_length, meets_min, meets_min_length};

use crate::schema::ValidatorRules;
use crate::value::FieldValue;

/// Kind of a failing rule, as seen by an error renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidatorKind {
    Required,
    Email,
    MinLength,
    MaxLength,
    Min,
    Max,
    Pattern,
}

impl fmt::Display for ValidatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidatorKind::Required => "required",
            ValidatorKind::Email => "email",
            ValidatorKind::MinLength => "minlength",
            ValidatorKind::MaxLength => "maxlength",
            ValidatorKind::Min => "min",
            ValidatorKind::Max => "max",
            ValidatorKind::Pattern => "pattern",
        };
        f.write_str(name)
    }
}

/// A failing rule together with what it expected
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ValidationError {
    #[error("This field is required.")]
    Required,

    #[error("Please enter a valid email.")]
    Email,

    #[error("Must be at least {required} characters (currently {actual}).")]
    MinLength { required: usize, actual: usize },

    #[error("Must be at most {required} characters (currently {actual}).")]
    MaxLength { required: usize, actual: usize },

    #[error("Must be at least {min}.")]
    Min { min: f64, actual: f64 },

    #[error("Must be at most {max}.")]
    Max { max: f64, actual: f64 },

    #[error("Does not match the expected format.")]
    Pattern { pattern: String },
}

impl ValidationError {
    pub fn kind(&self) -> ValidatorKind {
        match self {
            ValidationError::Required => ValidatorKind::Required,
            ValidationError::Email => ValidatorKind::Email,
            ValidationError::MinLength { .. } => ValidatorKind::MinLength,
            ValidationError::MaxLength { .. } => ValidatorKind::MaxLength,
            ValidationError::Min { .. } => ValidatorKind::Min,
            ValidationError::Max { .. } => ValidatorKind::Max,
            ValidationError::Pattern { .. } => ValidatorKind::Pattern,
        }
    }

    /// Message naming the field, for inline display next to it
    pub fn message_for(&self, label: &str) -> String {
        match self {
            ValidationError::Required => format!("{} is required.", label),
            other => other.to_string(),
        }
    }
}

/// A runtime check attached to a control
#[derive(Debug, Clone)]
pub enum Validator {
    Required,
    RequiredTrue,
    Email,
    MinLength(usize),
    MaxLength(usize),
    Min(f64),
    Max(f64),
    Pattern { source: String, regex: Regex },
}

impl Validator {
    /// Check a value, returning the failure if any
    pub fn check(&self, value: &FieldValue) -> Option<ValidationError> {
        match self {
            Validator::Required => value.is_empty().then_some(ValidationError::Required),
            Validator::RequiredTrue => {
                (*value != FieldValue::Bool(true)).then_some(ValidationError::Required)
            }
            Validator::Email => match value {
                FieldValue::Text(s) if !s.is_empty() && !is_valid_email(s) => {
                    Some(ValidationError::Email)
                }
                _ => None,
            },
            Validator::MinLength(required) => value.length().and_then(|actual| {
                (!meets_min_length(actual, *required)).then_some(ValidationError::MinLength {
                    required: *required,
                    actual,
                })
            }),
            Validator::MaxLength(required) => value.length().and_then(|actual| {
                (!meets_max_length(actual, *required)).then_some(ValidationError::MaxLength {
                    required: *required,
                    actual,
                })
            }),
            Validator::Min(min) => value.as_f64().and_then(|actual| {
                (!meets_min(actual, *min)).then_some(ValidationError::Min { min: *min, actual })
            }),
            Validator::Max(max) => value.as_f64().and_then(|actual| {
                (!meets_max(actual, *max)).then_some(ValidationError::Max { max: *max, actual })
            }),
            Validator::Pattern { source, regex } => match value {
                FieldValue::Text(s) if !s.is_empty() && !regex.is_match(s) => {
                    Some(ValidationError::Pattern {
                        pattern: source.clone(),
                    })
                }
                _ => None,
            },
        }
    }
}

/// Compile a schema pattern so that it must match the whole value
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    let anchored = if pattern.starts_with('^') && pattern.ends_with('$') {
        pattern.to_string()
    } else {
        format!("^(?:{})$", pattern)
    };
    Regex::new(&anchored)
}

/// Translate declarative rules into validators, in a fixed order
///
/// Absent rules add nothing. A pattern that does not compile is skipped
/// with a warning; strict schema checking reports it instead.
pub fn map_validators(field: &str, rules: &ValidatorRules) -> Vec<Validator> {
    let mut mapped = Vec::new();

    if rules.required {
        mapped.push(Validator::Required);
    }
    if rules.required_true {
        mapped.push(Validator::RequiredTrue);
    }
    if rules.email {
        mapped.push(Validator::Email);
    }
    if let Some(n) = rules.min_length {
        mapped.push(Validator::MinLength(n));
    }
    if let Some(n) = rules.max_length {
        mapped.push(Validator::MaxLength(n));
    }
    if let Some(min) = rules.min {
        mapped.push(Validator::Min(min));
    }
    if let Some(max) = rules.max {
        mapped.push(Validator::Max(max));
    }
    if let Some(pattern) = &rules.pattern {
        match compile_pattern(pattern) {
            Ok(regex) => mapped.push(Validator::Pattern {
                source: pattern.clone(),
                regex,
            }),
            Err(e) => {
                tracing::warn!(field, pattern = %pattern, error = %e, "Skipping invalid pattern validator");
            }
        }
    }

    mapped
}

/// Run every validator and collect the failures, one per kind
pub fn run_validators(validators: &[Validator], value: &FieldValue) -> Vec<ValidationError> {
    let mut errors: Vec<ValidationError> = Vec::new();
    for error in validators.iter().filter_map(|v| v.check(value)) {
        if !errors.iter().any(|e| e.kind() == error.kind()) {
            errors.push(error);
        }
    }
    errors
}
