use std::env;
use std::time::Duration;

use leadkit_application::CatalogForm;
use leadkit_core::{AppError, AppResult};
use leadkit_domain::FormValues;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub form: CatalogForm,
    pub service: Option<String>,
    pub delivery_delay: Duration,
    pub success_display: Duration,
    pub simulated_failure: Option<String>,
    pub log_payloads: bool,
    pub cards_path: Option<String>,
}

impl ConsoleConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let form = optional_value(&lookup, "LEADKIT_FORM")
            .map(|value| value.parse::<CatalogForm>())
            .transpose()?
            .unwrap_or(CatalogForm::Contact);

        let service = optional_value(&lookup, "LEADKIT_SERVICE");
        if service.is_some() && form.service_field().is_none() {
            return Err(AppError::Validation(format!(
                "LEADKIT_SERVICE is not supported by the '{}' form",
                form.as_str()
            )));
        }

        let delivery_delay =
            Duration::from_millis(parse_millis(&lookup, "LEADKIT_DELIVERY_DELAY_MS", 1500)?);
        let success_display =
            Duration::from_millis(parse_millis(&lookup, "LEADKIT_SUCCESS_DISPLAY_MS", 3000)?);

        let log_payloads = match optional_value(&lookup, "LEADKIT_LOG_PAYLOADS") {
            Some(value) => parse_flag("LEADKIT_LOG_PAYLOADS", value.as_str())?,
            None => cfg!(debug_assertions),
        };

        Ok(Self {
            form,
            service,
            delivery_delay,
            success_display,
            simulated_failure: optional_value(&lookup, "LEADKIT_SIMULATE_FAILURE"),
            log_payloads,
            cards_path: optional_value(&lookup, "LEADKIT_CARDS_PATH"),
        })
    }
}

/// Parses `field=value` arguments into form values.
pub fn parse_field_arguments(arguments: impl IntoIterator<Item = String>) -> AppResult<FormValues> {
    let mut values = FormValues::new();
    for argument in arguments {
        let Some((name, value)) = argument.split_once('=') else {
            return Err(AppError::Validation(format!(
                "argument '{argument}' must have the form field=value"
            )));
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(format!(
                "argument '{argument}' is missing a field name"
            )));
        }
        values.set(name, value);
    }

    Ok(values)
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn optional_value(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
) -> AppResult<u64> {
    match optional_value(lookup, name) {
        Some(value) => value.parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}

fn parse_flag(name: &str, value: &str) -> AppResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::Validation(format!(
            "{name} must be a boolean, got '{value}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use leadkit_application::CatalogForm;

    use super::{ConsoleConfig, parse_field_arguments};

    fn config_from(pairs: &[(&str, &str)]) -> Result<ConsoleConfig, leadkit_core::AppError> {
        let variables: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ConsoleConfig::from_lookup(|name| variables.get(name).cloned())
    }

    #[test]
    fn defaults_to_contact_form() {
        let config = config_from(&[]).unwrap_or_else(|_| unreachable!());

        assert_eq!(config.form, CatalogForm::Contact);
        assert_eq!(config.delivery_delay, Duration::from_millis(1500));
        assert_eq!(config.success_display, Duration::from_millis(3000));
        assert_eq!(config.simulated_failure, None);
    }

    #[test]
    fn reads_consultation_with_service() {
        let config = config_from(&[
            ("LEADKIT_FORM", "consultation"),
            ("LEADKIT_SERVICE", "SEO"),
            ("LEADKIT_DELIVERY_DELAY_MS", "10"),
            ("LEADKIT_LOG_PAYLOADS", "off"),
        ])
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(config.form, CatalogForm::Consultation);
        assert_eq!(config.service.as_deref(), Some("SEO"));
        assert_eq!(config.delivery_delay, Duration::from_millis(10));
        assert!(!config.log_payloads);
    }

    #[test]
    fn rejects_service_for_forms_without_picker() {
        let result = config_from(&[("LEADKIT_FORM", "newsletter"), ("LEADKIT_SERVICE", "SEO")]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_malformed_numbers_and_flags() {
        assert!(config_from(&[("LEADKIT_DELIVERY_DELAY_MS", "soon")]).is_err());
        assert!(config_from(&[("LEADKIT_LOG_PAYLOADS", "maybe")]).is_err());
    }

    #[test]
    fn parses_field_arguments() {
        let values = parse_field_arguments(vec![
            "name=Jo".to_owned(),
            "message=a=b".to_owned(),
        ])
        .unwrap_or_default();

        assert_eq!(values.get("name"), Some("Jo"));
        assert_eq!(values.get("message"), Some("a=b"));
        assert!(parse_field_arguments(vec!["name".to_owned()]).is_err());
        assert!(parse_field_arguments(vec!["=Jo".to_owned()]).is_err());
    }
}
