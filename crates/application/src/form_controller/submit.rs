use std::sync::{Arc, Weak};

use leadkit_core::AppResult;
use leadkit_domain::{FieldErrors, SubmissionEvent, SubmissionState, ValidationResult, validate};
use tracing::{debug, info, warn};

use crate::lead_delivery_ports::LeadSubmission;

use super::{ControllerInner, FormController, SubmitOutcome};

/// Failure shown when a submit call is dropped before its delivery settled.
pub(super) const CANCELLED_REASON: &str = "submission was cancelled before delivery completed";

impl FormController {
    /// Validates the form and, when valid, delivers it.
    ///
    /// At most one delivery is in flight per controller: calls made while a
    /// submission is pending, still settling after a reset, or showing its
    /// confirmation return [`SubmitOutcome::Ignored`]. A submit after a failure
    /// counts as the user retrying.
    ///
    /// Dropping the returned future mid-delivery leaves the form in
    /// [`SubmissionState::Failed`] so it can be submitted again.
    pub async fn submit(&self) -> AppResult<SubmitOutcome> {
        let form_name = self.inner.schema.form_name();

        let (submission, mut in_flight) = {
            let mut session = self.inner.mounted_session()?;
            if session.in_flight
                || matches!(
                    session.state,
                    SubmissionState::Submitting | SubmissionState::Succeeded
                )
            {
                debug!(
                    form = form_name,
                    state = session.state.as_str(),
                    in_flight = session.in_flight,
                    "ignoring duplicate submit"
                );
                return Ok(SubmitOutcome::Ignored);
            }
            if session.state.failure_reason().is_some() {
                session.state.apply(SubmissionEvent::Acknowledge)?;
            }

            match validate(&self.inner.schema, &session.values) {
                ValidationResult::Invalid(errors) => {
                    info!(
                        form = form_name,
                        invalid_fields = errors.len(),
                        "lead form failed validation"
                    );
                    session.errors = errors.clone();
                    return Ok(SubmitOutcome::Invalid(errors));
                }
                ValidationResult::Valid(values) => {
                    session.errors = FieldErrors::new();
                    session.state.apply(SubmissionEvent::Begin)?;
                    session.in_flight = true;
                    (
                        LeadSubmission::new(form_name, values),
                        InFlightDelivery::new(&self.inner, session.generation),
                    )
                }
            }
        };

        let delivery_result = self.inner.delivery.deliver(&submission).await;

        let mut session = self.inner.session()?;
        in_flight.settle();
        session.in_flight = false;
        if !session.mounted || session.generation != in_flight.generation {
            debug!(
                form = form_name,
                submission_id = %submission.submission_id(),
                "discarding result of superseded submission"
            );
            return Ok(SubmitOutcome::Discarded);
        }

        match delivery_result {
            Ok(()) => {
                session.state.apply(SubmissionEvent::Delivered)?;
                session.values = self.inner.schema.defaults();
                drop(session);

                info!(
                    form = form_name,
                    submission_id = %submission.submission_id(),
                    "lead delivered"
                );
                schedule_display_reset(Arc::downgrade(&self.inner), in_flight.generation);

                Ok(SubmitOutcome::Delivered(submission.submission_id()))
            }
            Err(error) => {
                let reason = error.to_string();
                session.state.apply(SubmissionEvent::Rejected {
                    reason: reason.clone(),
                })?;

                warn!(
                    form = form_name,
                    submission_id = %submission.submission_id(),
                    error = %error,
                    "lead delivery failed"
                );

                Ok(SubmitOutcome::Failed { reason })
            }
        }
    }
}

/// Marks a delivery as in flight until the submit call settles it.
///
/// If the submit future is dropped first, the controller stops treating the
/// delivery as pending and, when the form was not reset meanwhile, moves it
/// from submitting to failed.
struct InFlightDelivery<'a> {
    inner: &'a ControllerInner,
    generation: u64,
    settled: bool,
}

impl<'a> InFlightDelivery<'a> {
    fn new(inner: &'a ControllerInner, generation: u64) -> Self {
        Self {
            inner,
            generation,
            settled: false,
        }
    }

    fn settle(&mut self) {
        self.settled = true;
    }
}

impl Drop for InFlightDelivery<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let Ok(mut session) = self.inner.session() else {
            return;
        };

        session.in_flight = false;
        if session.generation != self.generation || !session.state.is_submitting() {
            return;
        }

        let rejected = session.state.apply(SubmissionEvent::Rejected {
            reason: CANCELLED_REASON.to_owned(),
        });
        if rejected.is_ok() {
            warn!(
                form = self.inner.schema.form_name(),
                "lead submission cancelled mid-delivery"
            );
        }
    }
}

/// Returns the form to idle once the confirmation window elapses, unless it was
/// reset, unmounted or dropped in the meantime.
fn schedule_display_reset(inner: Weak<ControllerInner>, generation: u64) {
    let Some(success_display) = inner.upgrade().map(|inner| inner.success_display) else {
        return;
    };

    tokio::spawn(async move {
        tokio::time::sleep(success_display).await;

        let Some(inner) = inner.upgrade() else {
            return;
        };
        let Ok(mut session) = inner.session() else {
            return;
        };
        if session.generation != generation || session.state != SubmissionState::Succeeded {
            return;
        }

        if session.state.apply(SubmissionEvent::DisplayElapsed).is_ok() {
            debug!(
                form = inner.schema.form_name(),
                "success confirmation elapsed"
            );
        }
    });
}
