// File: dynaform/src/builder.rs
// Purpose: Materialize a field schema into a live form model

use tracing::{info, warn};

use crate::config::{FormConfig, SchemaPolicy};
use crate::control::Control;
use crate::error::SchemaError;
use crate::model::{ControlSet, FormModel};
use crate::reactor::DependencyReactor;
use crate::schema::FormSchema;

/// Builds form models according to a configuration
#[derive(Debug, Clone, Default)]
pub struct FormBuilder {
    config: FormConfig,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FormConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Build a model from a schema
    ///
    /// Under the strict policy the schema is checked first and every issue
    /// is reported at once. Under the lenient policy this never fails.
    pub fn build(&self, schema: &FormSchema) -> Result<FormModel, SchemaError> {
        if self.config.schema.policy == SchemaPolicy::Strict {
            schema.check()?;
        }
        Ok(self.materialize(schema))
    }

    /// Walk the schema in order: one control per field, one subscription per dependency
    pub(crate) fn materialize(&self, schema: &FormSchema) -> FormModel {
        let mut controls = ControlSet::default();
        let mut reactor = DependencyReactor::new(self.config.reactor.cascade);

        for (index, spec) in schema.fields.iter().enumerate() {
            if spec.name.is_empty() {
                warn!(index, field_type = %spec.field_type, "Skipping field without a name");
                continue;
            }
            if !spec.field_type.is_known() {
                warn!(field = %spec.name, field_type = %spec.field_type, "Field has an unknown type and will not be rendered");
            }

            if controls.insert(Control::from_spec(spec)) {
                warn!(field = %spec.name, "Duplicate field name, later declaration wins");
            }

            match &spec.depends_on {
                Some(dep) => {
                    if schema.field(&dep.field).is_none() {
                        warn!(field = %spec.name, target = %dep.field, "Dependency target does not exist, field stays disabled");
                    }
                    reactor.register(&spec.name, &dep.field, dep.value.clone());
                }
                None => {
                    reactor.unregister(&spec.name);
                }
            }
        }

        info!(
            controls = controls.len(),
            dependents = reactor.subscriptions().len(),
            cascade = ?reactor.mode(),
            "Built form model"
        );

        FormModel::from_parts(controls, reactor, self.config.reactor.event_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaIssue;
    use crate::schema::{FieldSpec, FieldType};
    use crate::value::FieldValue;

    #[test]
    fn test_skips_nameless_fields() {
        let schema = FormSchema::new(vec![
            FieldSpec::new("", FieldType::Text),
            FieldSpec::new("name", FieldType::Text),
        ]);
        let model = FormBuilder::new().build(&schema).unwrap();
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_duplicate_name_last_write_wins_in_place() {
        let schema = FormSchema::new(vec![
            FieldSpec::new("a", FieldType::Text),
            FieldSpec::new("b", FieldType::Text),
            FieldSpec::new("a", FieldType::Checkbox),
        ]);
        let model = FormModel::build(&schema);

        let names: Vec<_> = model.controls().map(|c| c.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(model.get("a").unwrap().field_type(), &FieldType::Checkbox);
        assert_eq!(model.get("a").unwrap().value(), &FieldValue::Bool(false));
    }

    #[test]
    fn test_duplicate_without_dependency_drops_subscription() {
        let schema = FormSchema::new(vec![
            FieldSpec::new("p", FieldType::Text),
            FieldSpec::new("a", FieldType::Text).depends_on("p", "x"),
            FieldSpec::new("a", FieldType::Text),
        ]);
        let model = FormModel::build(&schema);
        assert!(model.reactor().subscriptions().is_empty());
        assert!(model.get("a").unwrap().is_enabled());
    }

    #[test]
    fn test_dangling_dependency_is_inert() {
        let schema = FormSchema::new(vec![
            FieldSpec::new("state", FieldType::Text).depends_on("country", "US"),
        ]);
        let model = FormModel::build(&schema);
        assert!(model.get("state").unwrap().is_disabled());
    }

    #[test]
    fn test_strict_policy_rejects_with_every_issue() {
        let schema = FormSchema::new(vec![
            FieldSpec::new("state", FieldType::Text).depends_on("country", "US"),
            FieldSpec::new("state", FieldType::Text),
        ]);
        let err = FormBuilder::with_config(FormConfig::strict())
            .build(&schema)
            .unwrap_err();

        assert_eq!(err.issues.len(), 2);
        assert!(err.issues.contains(&SchemaIssue::DanglingDependency {
            field: "state".to_string(),
            target: "country".to_string(),
        }));
    }

    #[test]
    fn test_strict_policy_accepts_clean_schema() {
        let schema = FormSchema::new(vec![
            FieldSpec::new("country", FieldType::Select),
            FieldSpec::new("state", FieldType::Text).depends_on("country", "US"),
        ]);
        let model = FormBuilder::with_config(FormConfig::strict())
            .build(&schema)
            .unwrap();
        assert_eq!(model.reactor().subscriptions().len(), 1);
    }
}
