// File: dynaform/src/control.rs
// Purpose: Live state of a single form field

use crate::schema::{FieldSpec, FieldType};
use crate::validator::{map_validators, run_validators, ValidationError, ValidatorKind, Validator};
use crate::value::FieldValue;

/// Runtime state for one field: value, status and validity
///
/// Errors are recomputed whenever the value or the status changes. A
/// disabled control carries no errors and does not count towards form
/// validity.
#[derive(Debug, Clone)]
pub struct Control {
    name: String,
    label: String,
    field_type: FieldType,
    value: FieldValue,
    initial: FieldValue,
    disabled: bool,
    initially_disabled: bool,
    touched: bool,
    dirty: bool,
    validators: Vec<Validator>,
    errors: Vec<ValidationError>,
}

impl Control {
    /// Materialize a control from its spec
    ///
    /// Dependent fields start disabled and blank regardless of any default.
    pub fn from_spec(spec: &FieldSpec) -> Self {
        let dependent = spec.depends_on.is_some();
        let initial = match (&spec.default, dependent) {
            (Some(default), false) => default.clone(),
            _ => spec.field_type.blank(),
        };

        let mut control = Self {
            name: spec.name.clone(),
            label: spec.display_label().to_string(),
            field_type: spec.field_type.clone(),
            value: initial.clone(),
            initial,
            disabled: dependent,
            initially_disabled: dependent,
            touched: false,
            dirty: false,
            validators: map_validators(&spec.name, &spec.validators),
            errors: Vec::new(),
        };
        control.update_validity();
        control
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Disabled controls are always valid
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn has_error(&self, kind: ValidatorKind) -> bool {
        self.errors.iter().any(|e| e.kind() == kind)
    }

    /// Whether the error renderer should show errors (invalid and touched)
    pub fn shows_errors(&self) -> bool {
        self.touched && !self.errors.is_empty()
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    /// Write a value; returns whether it differs from the previous one
    pub(crate) fn set_value(&mut self, value: FieldValue) -> bool {
        let changed = self.value != value;
        self.value = value;
        self.dirty = true;
        self.update_validity();
        changed
    }

    /// Returns whether the status changed
    pub(crate) fn enable(&mut self) -> bool {
        let changed = self.disabled;
        self.disabled = false;
        self.update_validity();
        changed
    }

    /// Returns whether the status changed
    pub(crate) fn disable(&mut self) -> bool {
        let changed = !self.disabled;
        self.disabled = true;
        self.update_validity();
        changed
    }

    /// Back to the blank value, untouched and pristine; returns whether the value changed
    pub(crate) fn clear(&mut self) -> bool {
        let blank = self.field_type.blank();
        let changed = self.value != blank;
        self.value = blank;
        self.touched = false;
        self.dirty = false;
        self.update_validity();
        changed
    }

    /// Back to the state right after build; returns whether the value changed
    pub(crate) fn restore(&mut self) -> bool {
        let changed = self.value != self.initial;
        self.value = self.initial.clone();
        self.disabled = self.initially_disabled;
        self.touched = false;
        self.dirty = false;
        self.update_validity();
        changed
    }

    pub(crate) fn mark_touched(&mut self) {
        self.touched = true;
    }

    fn update_validity(&mut self) {
        self.errors = if self.disabled {
            Vec::new()
        } else {
            run_validators(&self.validators, &self.value)
        };
    }
}
