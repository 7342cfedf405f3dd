//! Lead form entities, validation rules and submission lifecycle.

#![forbid(unsafe_code)]

mod content;
mod field_schema;
mod form_values;
mod submission;
mod validation;

pub use content::{CardDeck, CardKind, ContentCard, render_card};
pub use field_schema::{FieldDescriptor, FieldKind, FieldSchema};
pub use form_values::FormValues;
pub use submission::{SubmissionEvent, SubmissionState};
pub use validation::{
    EMAIL_MAX_LENGTH, FieldErrors, PHONE_MIN_DIGITS, ValidationResult, is_valid_email,
    is_valid_phone, is_valid_url, validate, validate_field,
};
