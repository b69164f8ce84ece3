// File: dynaform/src/schema.rs
// Purpose: Declarative field schema consumed by the form builder

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FormError, SchemaError, SchemaIssue};
use crate::validator::compile_pattern;
use crate::value::FieldValue;

/// Kind of input a field renders as
///
/// Any `type` string not listed here is kept as `Unknown` so that a schema
/// written for a newer renderer still loads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Email,
    Password,
    Number,
    Textarea,
    Date,
    Checkbox,
    Select,
    Multiselect,
    Radio,
    Slider,
    Toggle,
    Autocomplete,
    File,
    Unknown(String),
}

impl FieldType {
    /// The type-appropriate zero value a control starts at and resets to
    pub fn blank(&self) -> FieldValue {
        match self {
            FieldType::Text
            | FieldType::Email
            | FieldType::Password
            | FieldType::Textarea
            | FieldType::Autocomplete
            | FieldType::Unknown(_) => FieldValue::Text(String::new()),
            FieldType::Checkbox | FieldType::Toggle => FieldValue::Bool(false),
            FieldType::Slider => FieldValue::Number(0.0),
            FieldType::Multiselect => FieldValue::List(Vec::new()),
            FieldType::Number
            | FieldType::Date
            | FieldType::Select
            | FieldType::Radio
            | FieldType::File => FieldValue::Null,
        }
    }

    /// Whether the field picks from `options`
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::Multiselect | FieldType::Radio | FieldType::Autocomplete
        )
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FieldType::Unknown(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Password => "password",
            FieldType::Number => "number",
            FieldType::Textarea => "textarea",
            FieldType::Date => "date",
            FieldType::Checkbox => "checkbox",
            FieldType::Select => "select",
            FieldType::Multiselect => "multiselect",
            FieldType::Radio => "radio",
            FieldType::Slider => "slider",
            FieldType::Toggle => "toggle",
            FieldType::Autocomplete => "autocomplete",
            FieldType::File => "file",
            FieldType::Unknown(other) => other,
        }
    }
}

impl From<String> for FieldType {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "text" => FieldType::Text,
            "email" => FieldType::Email,
            "password" => FieldType::Password,
            "number" => FieldType::Number,
            "textarea" => FieldType::Textarea,
            "date" | "datepicker" => FieldType::Date,
            "checkbox" => FieldType::Checkbox,
            "select" => FieldType::Select,
            "multiselect" => FieldType::Multiselect,
            "radio" => FieldType::Radio,
            "slider" => FieldType::Slider,
            "toggle" => FieldType::Toggle,
            "autocomplete" => FieldType::Autocomplete,
            "file" => FieldType::File,
            _ => FieldType::Unknown(s),
        }
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One choice of a select, radio or autocomplete field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: FieldValue,
    #[serde(default)]
    pub label: String,
}

impl FieldOption {
    /// Label to show, falling back to the value itself
    pub fn display_label(&self) -> String {
        if self.label.is_empty() {
            self.value.display()
        } else {
            self.label.clone()
        }
    }
}

/// Declarative validator rules of a field
///
/// Unrecognized keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidatorRules {
    pub required: bool,
    pub required_true: bool,
    pub email: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Show/enable condition: the field is live only while `field` holds `value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub field: String,
    pub value: FieldValue,
}

/// One schema entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    #[serde(default)]
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,

    #[serde(default)]
    pub validators: ValidatorRules,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Dependency>,

    /// Initial value; dependent fields ignore it and start blank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<FieldValue>,

    /// File fields only; intake still keeps a single file per control
    #[serde(default)]
    pub multiple: bool,
}

impl FieldSpec {
    /// Minimal spec, mostly for building schemas in code
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            label: String::new(),
            placeholder: None,
            hint: None,
            options: Vec::new(),
            validators: ValidatorRules::default(),
            depends_on: None,
            default: None,
            multiple: false,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn validators(mut self, validators: ValidatorRules) -> Self {
        self.validators = validators;
        self
    }

    pub fn depends_on(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.depends_on = Some(Dependency {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn option(mut self, value: impl Into<FieldValue>, label: impl Into<String>) -> Self {
        self.options.push(FieldOption {
            value: value.into(),
            label: label.into(),
        });
        self
    }

    pub fn default_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Label to show in messages, falling back to the name
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

/// Accepted top-level shapes of a schema document
#[derive(Deserialize)]
#[serde(untagged)]
enum SchemaRepr {
    Wrapped { fields: Vec<FieldSpec> },
    Bare(Vec<FieldSpec>),
}

impl From<SchemaRepr> for FormSchema {
    fn from(repr: SchemaRepr) -> Self {
        match repr {
            SchemaRepr::Wrapped { fields } | SchemaRepr::Bare(fields) => FormSchema { fields },
        }
    }
}

/// Ordered list of field specs; order is build and render order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "SchemaRepr")]
pub struct FormSchema {
    pub fields: Vec<FieldSpec>,
}

impl FormSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Parse a JSON schema, either `{"fields": [...]}` or a bare array
    pub fn from_json(json: &str) -> Result<Self, FormError> {
        serde_json::from_str(json).map_err(|e| FormError::Parse(e.to_string()))
    }

    /// Parse a TOML schema made of `[[fields]]` tables
    pub fn from_toml(toml_str: &str) -> Result<Self, FormError> {
        toml::from_str(toml_str).map_err(|e| FormError::Parse(e.to_string()))
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().rev().find(|spec| spec.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Collect every structural problem of the schema
    ///
    /// Lenient builds tolerate all of these; strict builds refuse them.
    pub fn issues(&self) -> Vec<SchemaIssue> {
        let mut issues = Vec::new();
        let names: HashSet<&str> = self.fields.iter().map(|f| f.name.as_str()).collect();
        let mut seen: HashSet<&str> = HashSet::new();

        for (index, spec) in self.fields.iter().enumerate() {
            if spec.name.is_empty() {
                issues.push(SchemaIssue::MissingName { index });
                continue;
            }

            if !seen.insert(spec.name.as_str()) {
                issues.push(SchemaIssue::DuplicateName {
                    name: spec.name.clone(),
                });
            }

            if let FieldType::Unknown(other) = &spec.field_type {
                issues.push(SchemaIssue::UnknownFieldType {
                    field: spec.name.clone(),
                    field_type: other.clone(),
                });
            }

            if let Some(dep) = &spec.depends_on {
                if dep.field == spec.name {
                    issues.push(SchemaIssue::SelfDependency {
                        field: spec.name.clone(),
                    });
                } else if !names.contains(dep.field.as_str()) {
                    issues.push(SchemaIssue::DanglingDependency {
                        field: spec.name.clone(),
                        target: dep.field.clone(),
                    });
                }
            }

            if let Some(pattern) = &spec.validators.pattern {
                if let Err(e) = compile_pattern(pattern) {
                    issues.push(SchemaIssue::InvalidPattern {
                        field: spec.name.clone(),
                        pattern: pattern.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        issues.extend(
            self.dependency_cycles()
                .into_iter()
                .map(|fields| SchemaIssue::DependencyCycle { fields }),
        );

        issues
    }

    /// Fail with every issue at once, or succeed on a clean schema
    pub fn check(&self) -> Result<(), SchemaError> {
        let issues = self.issues();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::new(issues))
        }
    }

    /// Cycles of two or more fields in the `dependsOn` graph
    ///
    /// Each field has at most one parent, so every cycle is found by walking
    /// parent links. A cycle is reported once, starting from its first field
    /// in schema order and closed by repeating that field.
    fn dependency_cycles(&self) -> Vec<Vec<String>> {
        let parent: HashMap<&str, &str> = self
            .fields
            .iter()
            .filter_map(|spec| {
                spec.depends_on
                    .as_ref()
                    .filter(|dep| dep.field != spec.name)
                    .map(|dep| (spec.name.as_str(), dep.field.as_str()))
            })
            .collect();

        let mut reported: HashSet<&str> = HashSet::new();
        let mut cycles = Vec::new();

        for spec in &self.fields {
            let start = spec.name.as_str();
            if reported.contains(start) {
                continue;
            }

            let mut path = vec![start];
            let mut current = start;
            while let Some(&next) = parent.get(current) {
                if next == start {
                    reported.extend(path.iter().copied());
                    let mut fields: Vec<String> = path.iter().map(|s| s.to_string()).collect();
                    fields.push(start.to_string());
                    cycles.push(fields);
                    break;
                }
                if path.contains(&next) {
                    // Leads into a cycle that does not include `start`
                    break;
                }
                path.push(next);
                current = next;
            }
        }

        cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_wrapped_schema() {
        let schema = FormSchema::from_json(
            &json!({
                "fields": [
                    {"name": "country", "type": "select", "label": "Country",
                     "options": [{"value": "US", "label": "United States"}, {"value": "CA"}]},
                    {"name": "state", "type": "text", "dependsOn": {"field": "country", "value": "US"}}
                ]
            })
            .to_string(),
        )
        .unwrap();

        assert_eq!(schema.len(), 2);
        assert_eq!(schema.fields[0].field_type, FieldType::Select);
        assert_eq!(schema.fields[0].options[1].display_label(), "CA");
        assert_eq!(
            schema.fields[1].depends_on,
            Some(Dependency {
                field: "country".to_string(),
                value: FieldValue::from("US"),
            })
        );
    }

    #[test]
    fn test_parse_bare_array_and_unknown_keys() {
        let schema = FormSchema::from_json(
            &json!([
                {"name": "email", "type": "email",
                 "validators": {"required": true, "email": true, "minLength": 3, "bogus": 1},
                 "styleHint": "ignored"}
            ])
            .to_string(),
        )
        .unwrap();

        let rules = &schema.fields[0].validators;
        assert!(rules.required);
        assert!(rules.email);
        assert_eq!(rules.min_length, Some(3));
    }

    #[test]
    fn test_parse_toml_schema() {
        let schema = FormSchema::from_toml(
            r#"
            [[fields]]
            name = "newsletter"
            type = "toggle"

            [[fields]]
            name = "frequency"
            type = "radio"
            dependsOn = { field = "newsletter", value = true }
            "#,
        )
        .unwrap();

        assert_eq!(schema.fields[0].field_type, FieldType::Toggle);
        assert_eq!(
            schema.fields[1].depends_on.as_ref().map(|d| &d.value),
            Some(&FieldValue::Bool(true))
        );
    }

    #[test]
    fn test_field_type_aliases_and_unknown() {
        assert_eq!(FieldType::from("datepicker".to_string()), FieldType::Date);
        assert_eq!(FieldType::from("Checkbox".to_string()), FieldType::Checkbox);
        assert_eq!(
            FieldType::from("colorwheel".to_string()),
            FieldType::Unknown("colorwheel".to_string())
        );
        assert_eq!(String::from(FieldType::Date), "date");
    }

    #[test]
    fn test_blank_values() {
        assert_eq!(FieldType::Text.blank(), FieldValue::from(""));
        assert_eq!(FieldType::Checkbox.blank(), FieldValue::Bool(false));
        assert_eq!(FieldType::Select.blank(), FieldValue::Null);
        assert_eq!(FieldType::Multiselect.blank(), FieldValue::List(vec![]));
        assert_eq!(FieldType::Slider.blank(), FieldValue::Number(0.0));
    }

    #[test]
    fn test_clean_schema_has_no_issues() {
        let schema = FormSchema::new(vec![
            FieldSpec::new("country", FieldType::Select),
            FieldSpec::new("state", FieldType::Text).depends_on("country", "US"),
        ]);
        assert!(schema.check().is_ok());
    }

    #[test]
    fn test_issues_enumerate_every_problem() {
        let schema = FormSchema::new(vec![
            FieldSpec::new("", FieldType::Text),
            FieldSpec::new("a", FieldType::Text),
            FieldSpec::new("a", FieldType::from("hologram".to_string())),
            FieldSpec::new("b", FieldType::Text).depends_on("missing", "x"),
            FieldSpec::new("c", FieldType::Text).depends_on("c", "x"),
            FieldSpec::new("d", FieldType::Text).validators(ValidatorRules {
                pattern: Some("(unclosed".to_string()),
                ..Default::default()
            }),
        ]);

        let issues = schema.issues();
        assert_eq!(issues[0], SchemaIssue::MissingName { index: 0 });
        assert!(issues.contains(&SchemaIssue::DuplicateName {
            name: "a".to_string()
        }));
        assert!(issues.contains(&SchemaIssue::UnknownFieldType {
            field: "a".to_string(),
            field_type: "hologram".to_string()
        }));
        assert!(issues.contains(&SchemaIssue::DanglingDependency {
            field: "b".to_string(),
            target: "missing".to_string()
        }));
        assert!(issues.contains(&SchemaIssue::SelfDependency {
            field: "c".to_string()
        }));
        assert!(issues
            .iter()
            .any(|i| matches!(i, SchemaIssue::InvalidPattern { field, .. } if field == "d")));
    }

    #[test]
    fn test_cycle_reported_once() {
        let schema = FormSchema::new(vec![
            FieldSpec::new("a", FieldType::Text).depends_on("b", "x"),
            FieldSpec::new("b", FieldType::Text).depends_on("a", "y"),
            FieldSpec::new("c", FieldType::Text).depends_on("a", "z"),
        ]);

        let cycles: Vec<_> = schema
            .issues()
            .into_iter()
            .filter(|i| matches!(i, SchemaIssue::DependencyCycle { .. }))
            .collect();
        assert_eq!(
            cycles,
            vec![SchemaIssue::DependencyCycle {
                fields: vec!["a".to_string(), "b".to_string(), "a".to_string()]
            }]
        );
    }
}
