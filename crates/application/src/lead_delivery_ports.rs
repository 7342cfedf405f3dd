use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use leadkit_core::{AppResult, SubmissionId};
use leadkit_domain::FormValues;

/// Validated lead handed to a delivery collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadSubmission {
    submission_id: SubmissionId,
    form_name: String,
    values: FormValues,
    submitted_at: DateTime<Utc>,
}

impl LeadSubmission {
    /// Creates a submission envelope stamped with a fresh id and the current time.
    #[must_use]
    pub fn new(form_name: impl Into<String>, values: FormValues) -> Self {
        Self {
            submission_id: SubmissionId::new(),
            form_name: form_name.into(),
            values,
            submitted_at: Utc::now(),
        }
    }

    /// Returns the submission identifier.
    #[must_use]
    pub fn submission_id(&self) -> SubmissionId {
        self.submission_id
    }

    /// Returns the name of the form the lead came from.
    #[must_use]
    pub fn form_name(&self) -> &str {
        &self.form_name
    }

    /// Returns the validated values.
    #[must_use]
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Returns when the lead was submitted.
    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

/// Port for the system that receives leads. Infrastructure provides simulated
/// and recording implementations; a real deployment would post to a CRM or mailer.
#[async_trait]
pub trait LeadDeliveryService: Send + Sync {
    /// Delivers one lead. Errors surface as a retryable submission failure.
    async fn deliver(&self, submission: &LeadSubmission) -> AppResult<()>;
}
