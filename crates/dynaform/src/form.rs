// File: dynaform/src/form.rs
// Purpose: Embeddable dynamic form: schema, live model, attachments and pass-through display settings

use std::collections::{BTreeMap, HashMap};

use tokio::sync::broadcast;
use tracing::debug;

use crate::builder::FormBuilder;
use crate::config::{Appearance, FilePatchPolicy, FormConfig};
use crate::error::{FormError, SchemaError};
use crate::events::FormEvent;
use crate::model::FormModel;
use crate::schema::{FieldOption, FormSchema};
use crate::submit::{assemble, ConsolidatedValue, FileAttachments, FileSelection};
use crate::value::{FieldValue, FileHandle};

/// Style properties of one field, passed through to the renderer untouched
pub type StyleMap = BTreeMap<String, String>;

/// A schema realized into a live, interactive form
///
/// The host feeds UI events in (`set_value`, `mark_touched`,
/// `on_file_change`, `submit`) and listens for [`FormEvent`]s. Dropping the
/// form tears down its dependency subscriptions.
#[derive(Debug)]
pub struct DynamicForm {
    schema: FormSchema,
    model: FormModel,
    attachments: FileAttachments,
    styles: HashMap<String, StyleMap>,
    appearance: Appearance,
    config: FormConfig,
    submit_attempts: usize,
    submissions: usize,
}

impl DynamicForm {
    /// Build a form with the given configuration
    pub fn new(schema: FormSchema, config: FormConfig) -> Result<Self, SchemaError> {
        let model = FormBuilder::with_config(config.clone()).build(&schema)?;
        Ok(Self {
            schema,
            model,
            attachments: FileAttachments::default(),
            styles: HashMap::new(),
            appearance: config.display.appearance,
            config,
            submit_attempts: 0,
            submissions: 0,
        })
    }

    /// Parse a JSON schema and build leniently-or-strictly per `config`
    pub fn from_json(json: &str, config: FormConfig) -> Result<Self, FormError> {
        let schema = FormSchema::from_json(json)?;
        Ok(Self::new(schema, config)?)
    }

    pub fn with_styles(mut self, styles: HashMap<String, StyleMap>) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = appearance;
        self
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn model(&self) -> &FormModel {
        &self.model
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn appearance(&self) -> Appearance {
        self.appearance
    }

    pub fn styles_for(&self, field: &str) -> Option<&StyleMap> {
        self.styles.get(field)
    }

    pub fn attachments(&self) -> &FileAttachments {
        &self.attachments
    }

    pub fn submit_attempts(&self) -> usize {
        self.submit_attempts
    }

    pub fn submissions(&self) -> usize {
        self.submissions
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FormEvent> {
        self.model.subscribe()
    }

    pub fn set_value(&mut self, field: &str, value: impl Into<FieldValue>) -> Result<(), FormError> {
        self.model.set_value(field, value)
    }

    pub fn mark_touched(&mut self, field: &str) -> Result<(), FormError> {
        self.model.mark_touched(field)
    }

    /// Take the first file of a picker selection for `control`
    ///
    /// Under `PatchControl` the handle is also written into the control's
    /// value when that control exists and is enabled.
    pub fn on_file_change(
        &mut self,
        control: &str,
        selection: &FileSelection,
    ) -> Result<Option<FileHandle>, FormError> {
        let Some(file) = self.attachments.accept(control, selection).cloned() else {
            return Ok(None);
        };

        if self.config.files.patch_policy == FilePatchPolicy::PatchControl {
            match self.model.get(control).map(|c| c.is_enabled()) {
                Some(true) => {
                    self.model.set_value(control, FieldValue::File(file.clone()))?;
                }
                Some(false) => debug!(field = control, "Control disabled, file kept as attachment only"),
                None => debug!(field = control, "No control for attachment"),
            }
        }

        Ok(Some(file))
    }

    pub fn clear_attachment(&mut self, control: &str) -> Option<FileHandle> {
        self.attachments.remove(control)
    }

    /// Submit the form
    ///
    /// Every control is marked touched so errors become visible. Returns the
    /// consolidated value and publishes [`FormEvent::Submitted`] exactly once
    /// when valid; does nothing else when invalid.
    pub fn submit(&mut self) -> Option<ConsolidatedValue> {
        self.submit_attempts += 1;
        self.model.mark_all_touched();

        let value = assemble(&self.model, &self.attachments)?;
        self.submissions += 1;
        self.model.publish_one(FormEvent::Submitted {
            value: value.clone(),
        });
        Some(value)
    }

    /// Options of a choice field whose label contains `query`, ignoring case
    pub fn options_matching(&self, field: &str, query: &str) -> Vec<&FieldOption> {
        let Some(spec) = self.schema.field(field) else {
            return Vec::new();
        };
        let needle = query.to_lowercase();
        spec.options
            .iter()
            .filter(|option| option.display_label().to_lowercase().contains(&needle))
            .collect()
    }

    /// Put the model back to its initial state and drop all attachments
    pub fn reset(&mut self) {
        self.model.reset();
        self.attachments = FileAttachments::default();
    }

    pub fn teardown(&mut self) {
        self.model.teardown();
    }
}

impl Drop for DynamicForm {
    fn drop(&mut self) {
        self.teardown();
    }
}
