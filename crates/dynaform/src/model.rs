// File: dynaform/src/model.rs
// Purpose: Aggregate form model: every control keyed by field name

use std::collections::HashMap;

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::control::Control;
use crate::error::FormError;
use crate::events::FormEvent;
use crate::reactor::DependencyReactor;
use crate::schema::FormSchema;
use crate::submit::ConsolidatedValue;
use crate::validator::ValidationError;
use crate::value::FieldValue;

/// Controls in schema order with lookup by name
#[derive(Debug, Clone, Default)]
pub(crate) struct ControlSet {
    controls: Vec<Control>,
    index: HashMap<String, usize>,
}

impl ControlSet {
    /// Insert a control; a name already present is replaced in place
    ///
    /// Returns whether an earlier control was replaced.
    pub(crate) fn insert(&mut self, control: Control) -> bool {
        match self.index.get(control.name()) {
            Some(&pos) => {
                self.controls[pos] = control;
                true
            }
            None => {
                self.index.insert(control.name().to_string(), self.controls.len());
                self.controls.push(control);
                false
            }
        }
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Control> {
        self.index.get(name).map(|&pos| &self.controls[pos])
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Control> {
        match self.index.get(name) {
            Some(&pos) => Some(&mut self.controls[pos]),
            None => None,
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Control> {
        self.controls.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Control> {
        self.controls.iter_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.controls.len()
    }
}

/// Live reactive model of one form instance
///
/// Built from a schema by [`FormBuilder`](crate::builder::FormBuilder).
/// All mutation is synchronous: a write returns after every dependent
/// reaction it caused has been applied and published.
#[derive(Debug)]
pub struct FormModel {
    controls: ControlSet,
    reactor: DependencyReactor,
    events: broadcast::Sender<FormEvent>,
}

impl FormModel {
    /// Build leniently with default configuration; never fails
    pub fn build(schema: &FormSchema) -> Self {
        crate::builder::FormBuilder::new().materialize(schema)
    }

    pub(crate) fn from_parts(
        controls: ControlSet,
        reactor: DependencyReactor,
        event_capacity: usize,
    ) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            controls,
            reactor,
            events,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Control> {
        self.controls.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.controls.get(name).is_some()
    }

    /// All controls in schema order
    pub fn controls(&self) -> impl Iterator<Item = &Control> {
        self.controls.iter()
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.len() == 0
    }

    pub fn reactor(&self) -> &DependencyReactor {
        &self.reactor
    }

    /// Receive every change event published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<FormEvent> {
        self.events.subscribe()
    }

    /// Write a value as user input and run dependent reactions
    ///
    /// Disabled controls are not editable.
    pub fn set_value(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), FormError> {
        let control = self
            .controls
            .get_mut(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;

        if control.is_disabled() {
            return Err(FormError::Disabled(name.to_string()));
        }

        control.set_value(value.into());
        let mut events = vec![FormEvent::value_changed(name, control.value())];
        self.reactor.propagate(&mut self.controls, name, &mut events);
        self.publish(events);
        Ok(())
    }

    pub fn mark_touched(&mut self, name: &str) -> Result<(), FormError> {
        self.controls
            .get_mut(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?
            .mark_touched();
        Ok(())
    }

    pub fn mark_all_touched(&mut self) {
        for control in self.controls.iter_mut() {
            control.mark_touched();
        }
    }

    /// True iff every enabled control passes its validators
    pub fn is_valid(&self) -> bool {
        self.controls.iter().all(Control::is_valid)
    }

    /// Failing validators of each enabled, invalid control, in schema order
    pub fn errors(&self) -> Vec<(&str, &[ValidationError])> {
        self.controls
            .iter()
            .filter(|c| !c.is_valid())
            .map(|c| (c.name(), c.errors()))
            .collect()
    }

    /// Values of enabled controls
    pub fn value(&self) -> ConsolidatedValue {
        self.controls
            .iter()
            .filter(|c| c.is_enabled())
            .map(|c| (c.name().to_string(), c.value().clone()))
            .collect()
    }

    /// Values of all controls, disabled ones included
    pub fn raw_value(&self) -> ConsolidatedValue {
        self.controls
            .iter()
            .map(|c| (c.name().to_string(), c.value().clone()))
            .collect()
    }

    /// Put every control back to its state right after build
    pub fn reset(&mut self) {
        let mut events = Vec::new();
        for control in self.controls.iter_mut() {
            let was_disabled = control.is_disabled();
            if control.restore() {
                events.push(FormEvent::value_changed(control.name(), control.value()));
            }
            if control.is_disabled() != was_disabled {
                events.push(FormEvent::status_changed(control.name(), control.is_disabled()));
            }
        }
        debug!(changes = events.len(), "Form reset");
        self.publish(events);
    }

    /// Remove all dependency subscriptions
    pub fn teardown(&mut self) {
        if !self.reactor.is_active() {
            return;
        }
        let removed = self.reactor.teardown();
        info!(subscriptions = removed, "Form torn down");
    }

    pub(crate) fn publish_one(&self, event: FormEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }

    fn publish(&self, events: Vec<FormEvent>) {
        for event in events {
            self.publish_one(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSpec, FieldType, ValidatorRules};
    use pretty_assertions::assert_eq;

    fn country_state() -> FormSchema {
        FormSchema::new(vec![
            FieldSpec::new("country", FieldType::Select)
                .option("US", "United States")
                .option("CA", "Canada"),
            FieldSpec::new("state", FieldType::Text).depends_on("country", "US"),
        ])
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let mut model = FormModel::build(&country_state());
        assert!(matches!(
            model.set_value("zip", "12345"),
            Err(FormError::UnknownField(name)) if name == "zip"
        ));
    }

    #[test]
    fn test_disabled_field_is_not_editable() {
        let mut model = FormModel::build(&country_state());
        assert!(matches!(
            model.set_value("state", "NY"),
            Err(FormError::Disabled(_))
        ));
        assert_eq!(model.get("state").unwrap().value(), &FieldValue::from(""));
    }

    #[test]
    fn test_events_are_published_in_order() {
        let mut model = FormModel::build(&country_state());
        let mut rx = model.subscribe();

        model.set_value("country", "US").unwrap();
        model.set_value("state", "NY").unwrap();
        model.set_value("country", "CA").unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }

        assert_eq!(
            events,
            vec![
                FormEvent::value_changed("country", &FieldValue::from("US")),
                FormEvent::status_changed("state", false),
                FormEvent::value_changed("state", &FieldValue::from("NY")),
                FormEvent::value_changed("country", &FieldValue::from("CA")),
                FormEvent::status_changed("state", true),
                FormEvent::value_changed("state", &FieldValue::from("")),
            ]
        );
    }

    #[test]
    fn test_reset_is_published_even_when_value_is_already_blank() {
        let mut model = FormModel::build(&country_state());
        let mut rx = model.subscribe();

        model.set_value("country", "CA").unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                FormEvent::value_changed("country", &FieldValue::from("CA")),
                FormEvent::value_changed("state", &FieldValue::from("")),
            ]
        );
    }

    #[test]
    fn test_value_excludes_disabled_controls() {
        let mut model = FormModel::build(&country_state());
        model.set_value("country", "CA").unwrap();

        let value = model.value();
        assert_eq!(value.get("country"), Some(&FieldValue::from("CA")));
        assert_eq!(value.get("state"), None);
        assert_eq!(model.raw_value().get("state"), Some(&FieldValue::from("")));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut model = FormModel::build(&country_state());
        model.set_value("country", "US").unwrap();
        model.set_value("state", "NY").unwrap();
        model.mark_all_touched();

        model.reset();

        let state = model.get("state").unwrap();
        assert!(state.is_disabled());
        assert!(!state.is_touched());
        assert_eq!(state.value(), &FieldValue::from(""));
        assert_eq!(model.get("country").unwrap().value(), &FieldValue::Null);
    }

    #[test]
    fn test_errors_list_invalid_enabled_controls() {
        let schema = FormSchema::new(vec![
            FieldSpec::new("name", FieldType::Text).validators(ValidatorRules {
                required: true,
                ..Default::default()
            }),
            FieldSpec::new("nickname", FieldType::Text),
        ]);
        let model = FormModel::build(&schema);

        let errors = model.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "name");
        assert!(!model.is_valid());
    }

    #[test]
    fn test_teardown_stops_reactions() {
        let mut model = FormModel::build(&country_state());
        model.teardown();
        model.set_value("country", "US").unwrap();
        assert!(model.get("state").unwrap().is_disabled());
    }
}
