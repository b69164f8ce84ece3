// File: dynaform/src/submit.rs
// Purpose: File intake and assembly of the submitted value

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::model::FormModel;
use crate::value::{FieldValue, FileHandle};

/// Final mapping of field name to value, in schema order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsolidatedValue {
    entries: Vec<(String, FieldValue)>,
}

impl ConsolidatedValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; an overwritten key keeps its position
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// As a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect(),
        )
    }
}

impl FromIterator<(String, FieldValue)> for ConsolidatedValue {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        let mut value = ConsolidatedValue::new();
        for (name, field_value) in iter {
            value.insert(name, field_value);
        }
        value
    }
}

impl Serialize for ConsolidatedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Files delivered by one file-picker interaction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileSelection {
    pub files: Vec<FileHandle>,
}

impl FileSelection {
    pub fn new(files: Vec<FileHandle>) -> Self {
        Self { files }
    }

    pub fn single(file: FileHandle) -> Self {
        Self { files: vec![file] }
    }

    /// Only the first file counts; controls hold a single file
    pub fn first(&self) -> Option<&FileHandle> {
        self.files.first()
    }
}

/// Files kept out of band from the model, keyed by control name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileAttachments {
    files: BTreeMap<String, FileHandle>,
}

impl FileAttachments {
    /// Store the first file of a selection; returns the stored handle
    ///
    /// An empty selection leaves any earlier attachment in place.
    pub fn accept(&mut self, control: &str, selection: &FileSelection) -> Option<&FileHandle> {
        let file = selection.first()?;
        if selection.files.len() > 1 {
            debug!(
                field = control,
                ignored = selection.files.len() - 1,
                "Keeping only the first selected file"
            );
        }
        self.files.insert(control.to_string(), file.clone());
        self.files.get(control)
    }

    pub fn remove(&mut self, control: &str) -> Option<FileHandle> {
        self.files.remove(control)
    }

    pub fn get(&self, control: &str) -> Option<&FileHandle> {
        self.files.get(control)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileHandle)> {
        self.files.iter().map(|(key, file)| (key.as_str(), file))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Assemble the submitted value, or nothing when the form is invalid
///
/// Snapshots enabled controls, then overlays every attachment by key,
/// overwriting whatever the control held.
pub fn assemble(model: &FormModel, attachments: &FileAttachments) -> Option<ConsolidatedValue> {
    if !model.is_valid() {
        debug!(invalid = model.errors().len(), "Submit ignored, form is invalid");
        return None;
    }

    let mut value = model.value();
    for (name, file) in attachments.iter() {
        value.insert(name, FieldValue::File(file.clone()));
    }

    info!(fields = value.len(), files = attachments.len(), "Form submitted");
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSpec, FieldType, FormSchema, ValidatorRules};
    use serde_json::json;

    fn file(name: &str) -> FileHandle {
        FileHandle::new(name, 10, None)
    }

    #[test]
    fn test_consolidated_value_keeps_order_and_overwrites_in_place() {
        let mut value = ConsolidatedValue::new();
        value.insert("b", FieldValue::from(1));
        value.insert("a", FieldValue::from(2));
        value.insert("b", FieldValue::from(3));

        assert_eq!(value.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(value.get("b"), Some(&FieldValue::from(3)));
        assert_eq!(value.to_json(), json!({"b": 3.0, "a": 2.0}));
    }

    #[test]
    fn test_only_first_file_is_kept() {
        let mut attachments = FileAttachments::default();
        let selection = FileSelection::new(vec![file("one.txt"), file("two.txt")]);

        let stored = attachments.accept("doc", &selection).cloned();
        assert_eq!(stored.map(|f| f.name), Some("one.txt".to_string()));
        assert_eq!(attachments.len(), 1);
    }

    #[test]
    fn test_empty_selection_is_a_no_op() {
        let mut attachments = FileAttachments::default();
        attachments.accept("doc", &FileSelection::single(file("cv.pdf")));

        assert!(attachments.accept("doc", &FileSelection::default()).is_none());
        assert_eq!(attachments.get("doc").map(|f| f.name.as_str()), Some("cv.pdf"));
    }

    #[test]
    fn test_assemble_overlays_attachments() {
        let schema = FormSchema::new(vec![
            FieldSpec::new("name", FieldType::Text),
            FieldSpec::new("resume", FieldType::File),
        ]);
        let mut model = FormModel::build(&schema);
        model.set_value("name", "Ada").unwrap();

        let mut attachments = FileAttachments::default();
        let cv = file("cv.pdf");
        attachments.accept("resume", &FileSelection::single(cv.clone()));

        let value = assemble(&model, &attachments).unwrap();
        assert_eq!(value.get("name"), Some(&FieldValue::from("Ada")));
        assert_eq!(value.get("resume"), Some(&FieldValue::File(cv)));
    }

    #[test]
    fn test_assemble_refuses_invalid_model() {
        let schema = FormSchema::new(vec![FieldSpec::new("name", FieldType::Text).validators(
            ValidatorRules {
                required: true,
                ..Default::default()
            },
        )]);
        let model = FormModel::build(&schema);
        assert!(assemble(&model, &FileAttachments::default()).is_none());
    }
}
