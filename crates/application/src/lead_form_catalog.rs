//! Stock lead form schemas used across the site's pages.

use std::str::FromStr;

use leadkit_core::{AppError, AppResult};
use leadkit_domain::{FieldDescriptor, FieldKind, FieldSchema};

/// Visitor's full name.
pub const NAME_FIELD: &str = "name";
/// Visitor's email address.
pub const EMAIL_FIELD: &str = "email";
/// Visitor's phone number.
pub const PHONE_FIELD: &str = "phone";
/// Visitor's company.
pub const COMPANY_FIELD: &str = "company";
/// Visitor's current website.
pub const WEBSITE_FIELD: &str = "website";
/// Monthly budget bracket.
pub const BUDGET_FIELD: &str = "budget";
/// Service the lead is interested in.
pub const SELECTED_SERVICE_FIELD: &str = "selected_service";
/// Free-form project description.
pub const MESSAGE_FIELD: &str = "message";

/// Services the agency sells, in menu order.
pub const DEFAULT_SERVICES: [&str; 6] = [
    "SEO",
    "PPC Advertising",
    "Social Media Marketing",
    "Content Marketing",
    "Web Design",
    "Email Marketing",
];

/// Monthly budget brackets offered by the quote form.
pub const BUDGET_OPTIONS: [&str; 4] = [
    "Under $1,000",
    "$1,000 - $5,000",
    "$5,000 - $10,000",
    "$10,000+",
];

/// Forms offered by the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogForm {
    /// General contact form in the footer and contact page.
    Contact,
    /// Free consultation dialog opened from service call-to-actions.
    Consultation,
    /// Quote request on pricing pages.
    QuoteRequest,
    /// Newsletter sign-up.
    Newsletter,
}

impl CatalogForm {
    /// Returns stable form name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Consultation => "consultation",
            Self::QuoteRequest => "quote_request",
            Self::Newsletter => "newsletter",
        }
    }

    /// Builds the form's schema; `services` feeds the consultation service picker.
    pub fn schema(&self, services: &[&str]) -> AppResult<FieldSchema> {
        match self {
            Self::Contact => contact_schema(),
            Self::Consultation => consultation_schema(services),
            Self::QuoteRequest => quote_request_schema(),
            Self::Newsletter => newsletter_schema(),
        }
    }

    /// Returns the field a dialog pre-selects a service into, if the form has one.
    #[must_use]
    pub fn service_field(&self) -> Option<&'static str> {
        match self {
            Self::Consultation => Some(SELECTED_SERVICE_FIELD),
            Self::Contact | Self::QuoteRequest | Self::Newsletter => None,
        }
    }
}

impl FromStr for CatalogForm {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "contact" => Ok(Self::Contact),
            "consultation" => Ok(Self::Consultation),
            "quote" | "quote_request" => Ok(Self::QuoteRequest),
            "newsletter" => Ok(Self::Newsletter),
            _ => Err(AppError::NotFound(format!("unknown lead form '{value}'"))),
        }
    }
}

/// Contact form: name, email, optional phone and a message.
pub fn contact_schema() -> AppResult<FieldSchema> {
    FieldSchema::new(
        CatalogForm::Contact.as_str(),
        vec![
            name_field()?,
            email_field()?,
            FieldDescriptor::new(
                PHONE_FIELD,
                "Phone",
                FieldKind::Phone,
                "Please enter a valid phone number",
            )?,
            FieldDescriptor::new(
                MESSAGE_FIELD,
                "Message",
                FieldKind::Text,
                "Message must be at least 10 characters",
            )?
            .required()
            .with_min_length(10),
        ],
    )
}

/// Consultation dialog: contact details plus the service the visitor picked.
pub fn consultation_schema(services: &[&str]) -> AppResult<FieldSchema> {
    FieldSchema::new(
        CatalogForm::Consultation.as_str(),
        vec![
            name_field()?,
            email_field()?,
            FieldDescriptor::new(
                PHONE_FIELD,
                "Phone",
                FieldKind::Phone,
                "Phone number must be at least 10 digits",
            )?
            .required()
            .with_min_length(10),
            FieldDescriptor::new(COMPANY_FIELD, "Company", FieldKind::Text, "Company is invalid")?,
            FieldDescriptor::new(
                SELECTED_SERVICE_FIELD,
                "Service",
                FieldKind::Choice {
                    options: services.iter().map(|service| (*service).to_owned()).collect(),
                },
                "Please select a service",
            )?
            .required(),
            FieldDescriptor::new(
                MESSAGE_FIELD,
                "Tell us about your goals",
                FieldKind::Text,
                "Message is invalid",
            )?,
        ],
    )
}

/// Quote request: contact details, current website and budget bracket.
pub fn quote_request_schema() -> AppResult<FieldSchema> {
    FieldSchema::new(
        CatalogForm::QuoteRequest.as_str(),
        vec![
            name_field()?,
            email_field()?,
            FieldDescriptor::new(
                WEBSITE_FIELD,
                "Website",
                FieldKind::Url,
                "Please enter a valid URL starting with http:// or https://",
            )?
            .required(),
            FieldDescriptor::new(
                BUDGET_FIELD,
                "Monthly budget",
                FieldKind::Choice {
                    options: BUDGET_OPTIONS.iter().map(|option| (*option).to_owned()).collect(),
                },
                "Please select a budget range",
            )?
            .required(),
            FieldDescriptor::new(
                MESSAGE_FIELD,
                "Project details",
                FieldKind::Text,
                "Message is invalid",
            )?,
        ],
    )
}

/// Newsletter sign-up: a single email field.
pub fn newsletter_schema() -> AppResult<FieldSchema> {
    FieldSchema::new(CatalogForm::Newsletter.as_str(), vec![email_field()?])
}

fn name_field() -> AppResult<FieldDescriptor> {
    Ok(FieldDescriptor::new(
        NAME_FIELD,
        "Full name",
        FieldKind::Text,
        "Name must be at least 2 characters",
    )?
    .required()
    .with_min_length(2))
}

fn email_field() -> AppResult<FieldDescriptor> {
    Ok(FieldDescriptor::new(
        EMAIL_FIELD,
        "Email",
        FieldKind::Email,
        "Please enter a valid email address",
    )?
    .required())
}

#[cfg(test)]
mod tests {
    use leadkit_domain::{FormValues, ValidationResult, validate};

    use super::{
        BUDGET_FIELD, CatalogForm, DEFAULT_SERVICES, EMAIL_FIELD, NAME_FIELD, PHONE_FIELD,
        SELECTED_SERVICE_FIELD, WEBSITE_FIELD, consultation_schema, quote_request_schema,
    };

    #[test]
    fn every_catalog_form_builds() {
        for form in [
            CatalogForm::Contact,
            CatalogForm::Consultation,
            CatalogForm::QuoteRequest,
            CatalogForm::Newsletter,
        ] {
            let schema = form.schema(&DEFAULT_SERVICES);
            assert!(schema.is_ok(), "{} schema failed to build", form.as_str());
            let parsed = form.as_str().parse::<CatalogForm>().ok();
            assert_eq!(parsed, Some(form));
        }
    }

    #[test]
    fn consultation_accepts_listed_service_only() {
        let schema = consultation_schema(&DEFAULT_SERVICES).unwrap_or_else(|_| unreachable!());
        let values = FormValues::new()
            .with(NAME_FIELD, "Jo")
            .with(EMAIL_FIELD, "jo@x.com")
            .with(PHONE_FIELD, "(555) 123-4567")
            .with(SELECTED_SERVICE_FIELD, "Web Design");

        assert!(validate(&schema, &values).is_valid());

        let unlisted = values.with(SELECTED_SERVICE_FIELD, "Billboards");
        let result = validate(&schema, &unlisted);
        let errors = result.errors().cloned().unwrap_or_default();
        assert_eq!(errors.len(), 1);
        assert!(errors.get(SELECTED_SERVICE_FIELD).is_some());
    }

    #[test]
    fn quote_request_requires_absolute_website() {
        let schema = quote_request_schema().unwrap_or_else(|_| unreachable!());
        let values = FormValues::new()
            .with(NAME_FIELD, "Jo")
            .with(EMAIL_FIELD, "jo@x.com")
            .with(WEBSITE_FIELD, "www.example.com")
            .with(BUDGET_FIELD, "$10,000+");

        let ValidationResult::Invalid(errors) = validate(&schema, &values) else {
            unreachable!("expected invalid website");
        };
        assert_eq!(errors.len(), 1);
        assert!(errors.get(WEBSITE_FIELD).is_some());
    }

    #[test]
    fn unknown_form_name_is_not_found() {
        assert!("webinar".parse::<CatalogForm>().is_err());
    }
}
