//! Reusable lead form controller.
//!
//! One controller instance backs one mounted form. It owns the form values,
//! the surfaced field errors and the submission lifecycle, and hands validated
//! leads to a delivery collaborator.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use leadkit_core::{AppError, AppResult, SubmissionId};
use leadkit_domain::{
    FieldErrors, FieldSchema, FormValues, SubmissionEvent, SubmissionState, validate_field,
};
use serde::Serialize;
use tracing::debug;

use crate::lead_delivery_ports::LeadDeliveryService;

mod submit;

/// How long a success confirmation stays on display before the form is idle again.
pub const DEFAULT_SUCCESS_DISPLAY: Duration = Duration::from_secs(3);

/// Result of one submit call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another submission is in flight or its confirmation is on display.
    Ignored,
    /// Validation failed; errors are also surfaced on the controller.
    Invalid(FieldErrors),
    /// The lead was delivered.
    Delivered(SubmissionId),
    /// Delivery failed; values are kept so the user can retry.
    Failed {
        /// Human-readable failure reason.
        reason: String,
    },
    /// The form was reset or unmounted while delivery was in flight.
    Discarded,
}

/// Point-in-time copy of a controller's state for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSnapshot {
    /// Current field values.
    pub values: FormValues,
    /// Errors currently shown next to fields.
    pub errors: FieldErrors,
    /// Submission lifecycle state.
    pub state: SubmissionState,
}

#[derive(Debug)]
struct FormSession {
    values: FormValues,
    errors: FieldErrors,
    state: SubmissionState,
    generation: u64,
    mounted: bool,
    in_flight: bool,
}

struct ControllerInner {
    schema: FieldSchema,
    delivery: Arc<dyn LeadDeliveryService>,
    success_display: Duration,
    session: Mutex<FormSession>,
}

impl ControllerInner {
    fn session(&self) -> AppResult<MutexGuard<'_, FormSession>> {
        self.session.lock().map_err(|error| {
            AppError::Internal(format!(
                "failed to lock session of form '{}': {error}",
                self.schema.form_name()
            ))
        })
    }

    fn mounted_session(&self) -> AppResult<MutexGuard<'_, FormSession>> {
        let session = self.session()?;
        if !session.mounted {
            return Err(AppError::Conflict(format!(
                "form '{}' is unmounted",
                self.schema.form_name()
            )));
        }

        Ok(session)
    }
}

/// Builder for [`FormController`].
pub struct FormControllerBuilder {
    schema: FieldSchema,
    delivery: Arc<dyn LeadDeliveryService>,
    success_display: Duration,
    bound_fields: Vec<String>,
}

impl FormControllerBuilder {
    /// Sets how long the success confirmation stays on display.
    #[must_use]
    pub fn with_success_display(mut self, success_display: Duration) -> Self {
        self.success_display = success_display;
        self
    }

    /// Declares the fields the presentation renders; each must have a rule.
    #[must_use]
    pub fn with_bound_fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bound_fields.extend(names.into_iter().map(Into::into));
        self
    }

    /// Builds a mounted controller whose values start at the schema defaults.
    pub fn build(self) -> AppResult<FormController> {
        self.schema
            .ensure_fields(self.bound_fields.iter().map(String::as_str))?;

        let values = self.schema.defaults();
        Ok(FormController {
            inner: Arc::new(ControllerInner {
                schema: self.schema,
                delivery: self.delivery,
                success_display: self.success_display,
                session: Mutex::new(FormSession {
                    values,
                    errors: FieldErrors::new(),
                    state: SubmissionState::Idle,
                    generation: 0,
                    mounted: true,
                    in_flight: false,
                }),
            }),
        })
    }
}

/// Orchestrates schema, validation, submission state and delivery for one form.
pub struct FormController {
    inner: Arc<ControllerInner>,
}

impl FormController {
    /// Starts building a controller for a schema and delivery collaborator.
    #[must_use]
    pub fn builder(
        schema: FieldSchema,
        delivery: Arc<dyn LeadDeliveryService>,
    ) -> FormControllerBuilder {
        FormControllerBuilder {
            schema,
            delivery,
            success_display: DEFAULT_SUCCESS_DISPLAY,
            bound_fields: Vec::new(),
        }
    }

    /// Returns the form schema.
    #[must_use]
    pub fn schema(&self) -> &FieldSchema {
        &self.inner.schema
    }

    /// Returns the success confirmation window.
    #[must_use]
    pub fn success_display(&self) -> Duration {
        self.inner.success_display
    }

    /// Returns a copy of values, errors and submission state.
    pub fn snapshot(&self) -> AppResult<FormSnapshot> {
        let session = self.inner.session()?;
        Ok(FormSnapshot {
            values: session.values.clone(),
            errors: session.errors.clone(),
            state: session.state.clone(),
        })
    }

    /// Updates one field without validating it.
    ///
    /// Clears the error shown for that field and dismisses a failure banner.
    pub fn set_field(&self, name: &str, value: impl Into<String>) -> AppResult<()> {
        self.inner.schema.require_field(name)?;

        let mut session = self.inner.mounted_session()?;
        if session.state.failure_reason().is_some() {
            session.state.apply(SubmissionEvent::Acknowledge)?;
        }
        session.values.set(name, value);
        session.errors.remove(name);

        Ok(())
    }

    /// Validates one field as it loses focus and records the outcome.
    pub fn blur_field(&self, name: &str) -> AppResult<Option<String>> {
        let mut session = self.inner.mounted_session()?;
        let value = session.values.value_or_empty(name).to_owned();
        let error = validate_field(&self.inner.schema, name, &value)?;

        match &error {
            Some(message) => session.errors.insert(name, message.as_str()),
            None => {
                session.errors.remove(name);
            }
        }

        Ok(error)
    }

    /// Restores schema defaults with optional per-field overrides and returns to idle.
    ///
    /// Any submission still in flight is discarded when it settles. Until then
    /// new submits are ignored, so at most one delivery runs per controller.
    pub fn reset(&self, overrides: FormValues) -> AppResult<()> {
        for (name, _) in overrides.iter() {
            self.inner.schema.require_field(name)?;
        }

        let mut session = self.inner.mounted_session()?;
        let mut values = self.inner.schema.defaults();
        for (name, value) in overrides.iter() {
            values.set(name, value);
        }

        session.values = values;
        session.errors = FieldErrors::new();
        session.state.apply(SubmissionEvent::Reset)?;
        session.generation += 1;

        debug!(
            form = self.inner.schema.form_name(),
            overrides = overrides.len(),
            "lead form reset"
        );

        Ok(())
    }

    /// Detaches the controller from its page; pending results are dropped.
    pub fn unmount(&self) -> AppResult<()> {
        let mut session = self.inner.session()?;
        session.mounted = false;
        session.generation += 1;
        session.state.apply(SubmissionEvent::Reset)?;

        debug!(form = self.inner.schema.form_name(), "lead form unmounted");
        Ok(())
    }

    /// Returns whether the controller is still mounted.
    pub fn is_mounted(&self) -> AppResult<bool> {
        Ok(self.inner.session()?.mounted)
    }
}
