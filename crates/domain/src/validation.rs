//! Lead form validation rules.
//!
//! Every field is checked independently and the full error map is returned,
//! so a form can show all invalid fields at once.

use std::collections::BTreeMap;

use leadkit_core::AppResult;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::field_schema::{FieldDescriptor, FieldKind, FieldSchema};
use crate::form_values::FormValues;

/// Maximum total length of an email address.
pub const EMAIL_MAX_LENGTH: usize = 254;

/// Minimum number of digits in a phone number.
pub const PHONE_MIN_DIGITS: usize = 10;

const EMAIL_LOCAL_MAX_LENGTH: usize = 64;
const DOMAIN_LABEL_MAX_LENGTH: usize = 63;
const EMAIL_LOCAL_SPECIALS: &str = "!#$%&'*+/=?^_`{|}~-";
const PHONE_PUNCTUATION: &str = " +-().";

/// Per-field error messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// Creates an empty error map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error for a field, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.0.insert(name.into(), message.into());
    }

    /// Removes the error of one field.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    /// Returns the error message of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns the number of invalid fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether no field is invalid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates errors in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(name, message)| (name.as_str(), message.as_str()))
    }
}

/// Outcome of applying a schema to a value snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum ValidationResult {
    /// Every field passed; carries the trimmed values of the schema's fields.
    Valid(FormValues),
    /// At least one field failed.
    Invalid(FieldErrors),
}

impl ValidationResult {
    /// Returns whether validation passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Returns the error map when validation failed.
    #[must_use]
    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(errors) => Some(errors),
        }
    }
}

/// Validates a value snapshot against a schema.
#[must_use]
pub fn validate(schema: &FieldSchema, values: &FormValues) -> ValidationResult {
    let mut errors = FieldErrors::new();
    let mut validated = FormValues::new();

    for field in schema.fields() {
        let value = values.value_or_empty(field.name());
        match check_value(field, value) {
            Some(message) => errors.insert(field.name(), message),
            None => {
                validated.set(field.name(), value.trim());
            }
        }
    }

    if errors.is_empty() {
        ValidationResult::Valid(validated)
    } else {
        ValidationResult::Invalid(errors)
    }
}

/// Validates one field, as done when it loses focus.
///
/// Returns the field's message when the value fails its rule.
pub fn validate_field(schema: &FieldSchema, name: &str, value: &str) -> AppResult<Option<String>> {
    let field = schema.require_field(name)?;
    Ok(check_value(field, value).map(str::to_owned))
}

pub(crate) fn check_value<'a>(field: &'a FieldDescriptor, value: &str) -> Option<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return field.is_required().then_some(field.message());
    }

    let format_ok = match field.kind() {
        FieldKind::Text => true,
        FieldKind::Email => is_valid_email(trimmed),
        FieldKind::Phone => is_valid_phone(trimmed),
        FieldKind::Url => is_valid_url(trimmed),
        FieldKind::Choice { options } => options.iter().any(|option| option.trim() == trimmed),
    };
    let length_ok = field
        .min_length()
        .is_none_or(|min_length| trimmed.chars().count() >= min_length);

    (!(format_ok && length_ok)).then_some(field.message())
}

/// Checks an address against a lightweight RFC 5322 dot-atom grammar.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    if value.is_empty() || value.len() > EMAIL_MAX_LENGTH {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    is_valid_email_local_part(local) && is_valid_email_domain(domain)
}

fn is_valid_email_local_part(local: &str) -> bool {
    if local.is_empty() || local.len() > EMAIL_LOCAL_MAX_LENGTH {
        return false;
    }

    local.split('.').all(|atom| {
        !atom.is_empty()
            && atom
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || EMAIL_LOCAL_SPECIALS.contains(ch))
    })
}

fn is_valid_email_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= DOMAIN_LABEL_MAX_LENGTH
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
    });

    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|ch| ch.is_ascii_alphabetic()));

    labels_ok && tld_ok
}

/// Checks that a phone number has enough digits and only common punctuation.
#[must_use]
pub fn is_valid_phone(value: &str) -> bool {
    let mut digits = 0_usize;
    for ch in value.chars() {
        if ch.is_ascii_digit() {
            digits += 1;
        } else if !PHONE_PUNCTUATION.contains(ch) {
            return false;
        }
    }

    digits >= PHONE_MIN_DIGITS
}

/// Checks that a value is an absolute http(s) URL with a host.
#[must_use]
pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|host| !host.is_empty())
    })
}
