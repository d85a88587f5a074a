//! Core types for event registration forms.
//!
//! An [`event::EventForm`] lists the [`field::RegistrationField`]s a
//! registrant fills in. Dynamic fields carry a formula that is re-evaluated
//! by [`form::FormState`] whenever an editable value changes.

pub mod enums;
pub mod event;
pub mod field;
pub mod form;
pub mod validation;
