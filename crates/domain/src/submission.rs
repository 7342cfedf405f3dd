use leadkit_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Lifecycle of one form's submit attempts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionState {
    /// Ready to accept a submit attempt.
    #[default]
    Idle,
    /// A delivery is in flight.
    Submitting,
    /// The lead was delivered; confirmation is on display.
    Succeeded,
    /// Delivery failed; the form stays editable.
    Failed {
        /// Human-readable failure reason.
        reason: String,
    },
}

/// Event that drives a [`SubmissionState`] transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionEvent {
    /// Validated values are handed to delivery.
    Begin,
    /// Delivery accepted the lead.
    Delivered,
    /// Delivery failed.
    Rejected {
        /// Human-readable failure reason.
        reason: String,
    },
    /// The success confirmation window elapsed.
    DisplayElapsed,
    /// The user acted on the form again after a failure.
    Acknowledge,
    /// The form was reset or its dialog dismissed.
    Reset,
}

impl SubmissionState {
    /// Returns stable status value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Succeeded => "succeeded",
            Self::Failed { .. } => "failed",
        }
    }

    /// Returns whether a submit attempt may start.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns whether a delivery is in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    /// Returns the failure reason when the last delivery failed.
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Failed { reason } => Some(reason.as_str()),
            _ => None,
        }
    }

    /// Applies an event, rejecting transitions the lifecycle does not allow.
    pub fn apply(&mut self, event: SubmissionEvent) -> AppResult<()> {
        let next = match (&*self, event) {
            (_, SubmissionEvent::Reset) => Self::Idle,
            (Self::Idle, SubmissionEvent::Begin) => Self::Submitting,
            (Self::Submitting, SubmissionEvent::Delivered) => Self::Succeeded,
            (Self::Submitting, SubmissionEvent::Rejected { reason }) => Self::Failed { reason },
            (Self::Succeeded, SubmissionEvent::DisplayElapsed) => Self::Idle,
            (Self::Failed { .. } | Self::Idle, SubmissionEvent::Acknowledge) => Self::Idle,
            (current, event) => {
                return Err(AppError::Conflict(format!(
                    "cannot apply {event:?} while submission is '{}'",
                    current.as_str()
                )));
            }
        };

        *self = next;
        Ok(())
    }
}
