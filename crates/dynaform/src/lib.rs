// File: dynaform/src/lib.rs
// Purpose: Main entry point for the dynaform library

//! # dynaform
//!
//! Schema-driven reactive forms. A declarative field schema is materialized
//! into a live form model: one control per field, validators attached,
//! dependent fields enabled, disabled and reset as their parent changes,
//! and a consolidated value assembled on submit.
//!
//! Rendering is left to the host; this crate owns the model only.
//!
//! ## Quick Start
//!
//! ```rust
//! use dynaform::{DynamicForm, FormConfig, FormSchema};
//!
//! let schema = FormSchema::from_json(r#"{
//!     "fields": [
//!         {"name": "country", "type": "select",
//!          "options": [{"value": "US"}, {"value": "CA"}]},
//!         {"name": "state", "type": "text",
//!          "dependsOn": {"field": "country", "value": "US"}}
//!     ]
//! }"#).unwrap();
//!
//! let mut form = DynamicForm::new(schema, FormConfig::default()).unwrap();
//! assert!(form.model().get("state").unwrap().is_disabled());
//!
//! form.set_value("country", "US").unwrap();
//! form.set_value("state", "NY").unwrap();
//!
//! let submitted = form.submit().unwrap();
//! assert_eq!(submitted.to_json()["state"], "NY");
//! ```

pub mod builder;
pub mod config;
pub mod control;
pub mod error;
pub mod events;
pub mod form;
pub mod model;
pub mod reactor;
pub mod schema;
pub mod submit;
pub mod validator;
pub mod value;

// Re-export main types
pub use builder::FormBuilder;
pub use config::{Appearance, CascadeMode, FilePatchPolicy, FormConfig, SchemaPolicy};
pub use control::Control;
pub use error::{FormError, SchemaError, SchemaIssue};
pub use events::FormEvent;
pub use form::{DynamicForm, StyleMap};
pub use model::FormModel;
pub use reactor::{DependencyReactor, Subscription};
pub use schema::{Dependency, FieldOption, FieldSpec, FieldType, FormSchema, ValidatorRules};
pub use submit::{ConsolidatedValue, FileAttachments, FileSelection};
pub use validator::{ValidationError, Validator, ValidatorKind};
pub use value::{FieldValue, FileHandle};

#[cfg(feature = "garde")]
pub use dynaform_validation::garde_validators;
