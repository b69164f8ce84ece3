//! dynaform Validation Core
//!
//! Pure Rust predicates behind the declarative validator rules of a form
//! schema. Compatible with both std and no_std environments so the same
//! checks can run inside a WASM front-end and on a server.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod email;
pub mod numeric;
pub mod string;

#[cfg(feature = "garde")]
pub mod garde_validators;

// Re-export all validators
pub use email::*;
pub use numeric::*;
pub use string::*;

#[cfg(feature = "garde")]
pub use garde_validators::*;
