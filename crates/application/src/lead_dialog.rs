//! Page-scoped lead dialog store.
//!
//! A page owns one dialog. Call-to-action buttons open it with the service they
//! advertise pre-selected; every open starts from fresh form values.

use std::sync::{Mutex, MutexGuard};

use leadkit_core::{AppError, AppResult};
use leadkit_domain::FormValues;
use serde::Serialize;
use tracing::debug;

use crate::form_controller::FormController;

/// Open state of a lead dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeadDialogState {
    /// Whether the dialog is shown.
    pub is_open: bool,
    /// Service pre-selected by the entry point that opened the dialog.
    pub default_service: Option<String>,
}

/// Lead dialog bound to one form controller.
pub struct LeadDialog {
    controller: FormController,
    service_field: String,
    state: Mutex<LeadDialogState>,
}

impl LeadDialog {
    /// Creates a closed dialog; `service_field` must be declared by the controller's schema.
    pub fn new(controller: FormController, service_field: impl Into<String>) -> AppResult<Self> {
        let service_field = service_field.into();
        controller
            .schema()
            .ensure_fields([service_field.as_str()])?;

        Ok(Self {
            controller,
            service_field,
            state: Mutex::new(LeadDialogState::default()),
        })
    }

    /// Returns the form controller rendered inside the dialog.
    #[must_use]
    pub fn controller(&self) -> &FormController {
        &self.controller
    }

    /// Returns the current open state.
    pub fn snapshot(&self) -> AppResult<LeadDialogState> {
        Ok(self.state()?.clone())
    }

    /// Opens the dialog with fresh values, optionally pre-selecting a service.
    pub fn open(&self, service: Option<&str>) -> AppResult<()> {
        let overrides = match service {
            Some(service) => FormValues::new().with(self.service_field.as_str(), service),
            None => FormValues::new(),
        };
        self.controller.reset(overrides)?;

        let mut state = self.state()?;
        state.is_open = true;
        state.default_service = service.map(str::to_owned);

        debug!(
            form = self.controller.schema().form_name(),
            service = service.unwrap_or_default(),
            "lead dialog opened"
        );
        Ok(())
    }

    /// Changes the pre-selected service of an open dialog.
    pub fn select_service(&self, service: &str) -> AppResult<()> {
        let mut state = self.state()?;
        if !state.is_open {
            return Err(AppError::Conflict(format!(
                "lead dialog of form '{}' is closed",
                self.controller.schema().form_name()
            )));
        }

        self.controller
            .set_field(self.service_field.as_str(), service)?;
        state.default_service = Some(service.to_owned());
        Ok(())
    }

    /// Closes the dialog and clears the form.
    pub fn close(&self) -> AppResult<()> {
        self.controller.reset(FormValues::new())?;

        let mut state = self.state()?;
        *state = LeadDialogState::default();

        debug!(
            form = self.controller.schema().form_name(),
            "lead dialog closed"
        );
        Ok(())
    }

    fn state(&self) -> AppResult<MutexGuard<'_, LeadDialogState>> {
        self.state.lock().map_err(|error| {
            AppError::Internal(format!("failed to lock lead dialog state: {error}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use leadkit_core::{AppError, AppResult};
    use leadkit_domain::FormValues;

    use super::{LeadDialog, LeadDialogState};
    use crate::form_controller::FormController;
    use crate::lead_delivery_ports::{LeadDeliveryService, LeadSubmission};
    use crate::lead_form_catalog::{
        DEFAULT_SERVICES, MESSAGE_FIELD, NAME_FIELD, SELECTED_SERVICE_FIELD, consultation_schema,
    };

    struct AcceptingDelivery;

    #[async_trait]
    impl LeadDeliveryService for AcceptingDelivery {
        async fn deliver(&self, _submission: &LeadSubmission) -> AppResult<()> {
            Ok(())
        }
    }

    fn dialog() -> LeadDialog {
        let schema = consultation_schema(&DEFAULT_SERVICES).unwrap_or_else(|_| unreachable!());
        let controller = FormController::builder(schema, Arc::new(AcceptingDelivery))
            .build()
            .unwrap_or_else(|_| unreachable!());
        LeadDialog::new(controller, SELECTED_SERVICE_FIELD).unwrap_or_else(|_| unreachable!())
    }

    fn values_of(dialog: &LeadDialog) -> FormValues {
        dialog
            .controller()
            .snapshot()
            .map(|snapshot| snapshot.values)
            .unwrap_or_default()
    }

    #[test]
    fn rejects_service_field_missing_from_schema() {
        let schema = consultation_schema(&DEFAULT_SERVICES).unwrap_or_else(|_| unreachable!());
        let controller = FormController::builder(schema, Arc::new(AcceptingDelivery))
            .build()
            .unwrap_or_else(|_| unreachable!());

        assert!(LeadDialog::new(controller, "campaign").is_err());
    }

    #[test]
    fn open_pre_selects_service() {
        let dialog = dialog();

        assert!(dialog.open(Some("SEO")).is_ok());

        assert_eq!(
            dialog.snapshot().ok(),
            Some(LeadDialogState {
                is_open: true,
                default_service: Some("SEO".to_owned()),
            })
        );
        assert_eq!(values_of(&dialog).get(SELECTED_SERVICE_FIELD), Some("SEO"));
    }

    #[test]
    fn sequential_opens_do_not_leak_values() {
        let dialog = dialog();
        let schema = consultation_schema(&DEFAULT_SERVICES).unwrap_or_else(|_| unreachable!());

        assert!(dialog.open(Some("SEO")).is_ok());
        assert!(dialog.controller().set_field(NAME_FIELD, "Jo").is_ok());
        assert!(dialog.controller().set_field(MESSAGE_FIELD, "Need help").is_ok());
        let first_open = values_of(&dialog);

        assert!(dialog.open(Some("Web Design")).is_ok());
        let second_open = values_of(&dialog);

        assert_eq!(first_open.get(NAME_FIELD), Some("Jo"));
        assert_eq!(
            second_open,
            schema
                .defaults()
                .with(SELECTED_SERVICE_FIELD, "Web Design")
        );
    }

    #[test]
    fn select_service_requires_open_dialog() {
        let dialog = dialog();

        let result = dialog.select_service("PPC Advertising");
        assert!(matches!(result, Err(AppError::Conflict(_))));

        assert!(dialog.open(None).is_ok());
        assert!(dialog.select_service("PPC Advertising").is_ok());
        assert_eq!(
            values_of(&dialog).get(SELECTED_SERVICE_FIELD),
            Some("PPC Advertising")
        );
    }

    #[test]
    fn close_clears_values_and_state() {
        let dialog = dialog();
        let schema = consultation_schema(&DEFAULT_SERVICES).unwrap_or_else(|_| unreachable!());
        assert!(dialog.open(Some("SEO")).is_ok());
        assert!(dialog.controller().set_field(NAME_FIELD, "Jo").is_ok());

        assert!(dialog.close().is_ok());

        assert_eq!(dialog.snapshot().ok(), Some(LeadDialogState::default()));
        assert_eq!(values_of(&dialog), schema.defaults());
    }
}
