use std::collections::HashSet;

use leadkit_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::form_values::FormValues;
use crate::validation::check_value;

/// Format rule attached to a lead form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Email address.
    Email,
    /// Phone number with at least ten digits.
    Phone,
    /// Absolute http(s) URL.
    Url,
    /// Enum-coded value picked from a fixed list.
    Choice {
        /// Allowed values.
        options: Vec<String>,
    },
}

impl FieldKind {
    /// Returns stable rule type value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Url => "url",
            Self::Choice { .. } => "choice",
        }
    }
}

/// Rule descriptor for one field of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    name: NonEmptyString,
    label: NonEmptyString,
    kind: FieldKind,
    required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_length: Option<usize>,
    message: NonEmptyString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_value: Option<String>,
}

impl FieldDescriptor {
    /// Creates an optional field with the message shown when its rule fails.
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        kind: FieldKind,
        message: impl Into<String>,
    ) -> AppResult<Self> {
        validate_kind(&kind)?;

        Ok(Self {
            name: NonEmptyString::new(name)?,
            label: NonEmptyString::new(label)?,
            kind,
            required: false,
            min_length: None,
            message: NonEmptyString::new(message)?,
            default_value: None,
        })
    }

    /// Marks the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Adds a minimum character count for non-empty values.
    #[must_use]
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = (min_length > 0).then_some(min_length);
        self
    }

    /// Adds the value the field starts with when a form mounts or resets.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the human-readable label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns the format rule.
    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Returns whether an empty value is rejected.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the minimum character count, if any.
    #[must_use]
    pub fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    /// Returns the error message shown next to the field.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Returns the default value, if any.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }
}

/// Ordered, exhaustive field definition of one lead form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FieldSchemaDocument", into = "FieldSchemaDocument")]
pub struct FieldSchema {
    form_name: NonEmptyString,
    fields: Vec<FieldDescriptor>,
}

impl FieldSchema {
    /// Creates a validated schema.
    pub fn new(form_name: impl Into<String>, fields: Vec<FieldDescriptor>) -> AppResult<Self> {
        let form_name = NonEmptyString::new(form_name)?;
        if fields.is_empty() {
            return Err(AppError::Validation(format!(
                "form '{form_name}' must declare at least one field"
            )));
        }

        let mut seen = HashSet::new();
        for field in &fields {
            validate_kind(field.kind())?;
            if !seen.insert(field.name()) {
                return Err(AppError::Validation(format!(
                    "duplicate field '{}' in form '{form_name}'",
                    field.name()
                )));
            }

            if let Some(default_value) = field.default_value() {
                if check_value(field, default_value).is_some() {
                    return Err(AppError::Validation(format!(
                        "default value '{default_value}' of field '{}' does not satisfy its '{}' rule",
                        field.name(),
                        field.kind().as_str()
                    )));
                }
            }
        }

        Ok(Self { form_name, fields })
    }

    /// Returns the form name.
    #[must_use]
    pub fn form_name(&self) -> &str {
        self.form_name.as_str()
    }

    /// Returns field descriptors in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns one field descriptor.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Returns whether the schema declares a field.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Returns a field descriptor or a not-found error naming the form.
    pub fn require_field(&self, name: &str) -> AppResult<&FieldDescriptor> {
        self.field(name).ok_or_else(|| {
            AppError::NotFound(format!(
                "field '{name}' is not declared by form '{}'",
                self.form_name
            ))
        })
    }

    /// Checks that every field a presentation binds is declared.
    pub fn ensure_fields<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> AppResult<()> {
        let missing: Vec<&str> = names
            .into_iter()
            .filter(|name| !self.contains(name))
            .collect();
        if missing.is_empty() {
            return Ok(());
        }

        Err(AppError::Validation(format!(
            "form '{}' has no rule for bound fields: {}",
            self.form_name,
            missing.join(", ")
        )))
    }

    /// Returns the values a freshly mounted form starts with.
    #[must_use]
    pub fn defaults(&self) -> FormValues {
        self.fields
            .iter()
            .map(|field| {
                (
                    field.name().to_owned(),
                    field.default_value().unwrap_or_default().to_owned(),
                )
            })
            .collect()
    }
}

fn validate_kind(kind: &FieldKind) -> AppResult<()> {
    let FieldKind::Choice { options } = kind else {
        return Ok(());
    };

    if options.is_empty() {
        return Err(AppError::Validation(
            "choice fields must list at least one option".to_owned(),
        ));
    }
    if options.iter().any(|option| option.trim().is_empty()) {
        return Err(AppError::Validation(
            "choice options must not be empty".to_owned(),
        ));
    }

    Ok(())
}

#[derive(Serialize, Deserialize)]
struct FieldSchemaDocument {
    form_name: String,
    fields: Vec<FieldDescriptor>,
}

impl TryFrom<FieldSchemaDocument> for FieldSchema {
    type Error = AppError;

    fn try_from(document: FieldSchemaDocument) -> Result<Self, Self::Error> {
        Self::new(document.form_name, document.fields)
    }
}

impl From<FieldSchema> for FieldSchemaDocument {
    fn from(schema: FieldSchema) -> Self {
        Self {
            form_name: schema.form_name.into(),
            fields: schema.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldDescriptor, FieldKind, FieldSchema};

    fn text_field(name: &str) -> FieldDescriptor {
        FieldDescriptor::new(name, name, FieldKind::Text, "required")
            .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn schema_rejects_duplicate_fields() {
        let result = FieldSchema::new("contact", vec![text_field("name"), text_field("name")]);
        assert!(result.is_err());
    }

    #[test]
    fn schema_requires_at_least_one_field() {
        assert!(FieldSchema::new("contact", Vec::new()).is_err());
    }

    #[test]
    fn choice_requires_options() {
        let result = FieldDescriptor::new(
            "service",
            "Service",
            FieldKind::Choice {
                options: Vec::new(),
            },
            "Pick a service",
        );
        assert!(result.is_err());
    }

    #[test]
    fn default_must_satisfy_rule() {
        let service = FieldDescriptor::new(
            "service",
            "Service",
            FieldKind::Choice {
                options: vec!["SEO".to_owned(), "PPC".to_owned()],
            },
            "Pick a service",
        )
        .unwrap_or_else(|_| unreachable!())
        .with_default("Billboards");

        assert!(FieldSchema::new("consultation", vec![service]).is_err());
    }

    #[test]
    fn defaults_cover_every_field() {
        let schema = FieldSchema::new(
            "contact",
            vec![text_field("name"), text_field("company").with_default("Acme")],
        )
        .unwrap_or_else(|_| unreachable!());

        let defaults = schema.defaults();
        assert_eq!(defaults.len(), 2);
        assert_eq!(defaults.get("name"), Some(""));
        assert_eq!(defaults.get("company"), Some("Acme"));
    }

    #[test]
    fn ensure_fields_names_missing_bindings() {
        let schema = FieldSchema::new("contact", vec![text_field("name")])
            .unwrap_or_else(|_| unreachable!());

        assert!(schema.ensure_fields(["name"]).is_ok());
        let error = schema
            .ensure_fields(["name", "budget"])
            .err()
            .map(|error| error.to_string())
            .unwrap_or_default();
        assert!(error.contains("budget"));
    }

    #[test]
    fn deserialization_revalidates_invariants() {
        let document = serde_json::json!({
            "form_name": "contact",
            "fields": [
                {"name": "email", "label": "Email", "kind": {"type": "email"}, "required": true, "message": "Enter a valid email"},
                {"name": "email", "label": "Email", "kind": {"type": "email"}, "required": true, "message": "Enter a valid email"}
            ]
        });

        let result: Result<FieldSchema, _> = serde_json::from_value(document);
        assert!(result.is_err());
    }
}
