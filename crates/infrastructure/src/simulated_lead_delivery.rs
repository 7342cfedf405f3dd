//! Simulated lead delivery for development. Waits a fixed delay and logs the lead.

use std::time::Duration;

use async_trait::async_trait;
use leadkit_application::{LeadDeliveryService, LeadSubmission};
use leadkit_core::{AppError, AppResult};
use tracing::{debug, info};

/// Delay the site used to stand in for the lead intake round trip.
pub const DEFAULT_DELIVERY_DELAY: Duration = Duration::from_millis(1500);

/// Fixed-delay delivery stub that never reaches a real endpoint.
#[derive(Debug, Clone)]
pub struct SimulatedLeadDelivery {
    delay: Duration,
    failure_reason: Option<String>,
    log_payloads: bool,
}

impl SimulatedLeadDelivery {
    /// Creates a stub with the default delay; payload logging follows the build profile.
    #[must_use]
    pub fn new() -> Self {
        Self {
            delay: DEFAULT_DELIVERY_DELAY,
            failure_reason: None,
            log_payloads: cfg!(debug_assertions),
        }
    }

    /// Overrides the simulated round-trip delay.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Makes every delivery fail with the given reason.
    #[must_use]
    pub fn with_failure(mut self, reason: impl Into<String>) -> Self {
        self.failure_reason = Some(reason.into());
        self
    }

    /// Enables or disables logging of submitted field values.
    #[must_use]
    pub fn with_payload_logging(mut self, log_payloads: bool) -> Self {
        self.log_payloads = log_payloads;
        self
    }
}

impl Default for SimulatedLeadDelivery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LeadDeliveryService for SimulatedLeadDelivery {
    async fn deliver(&self, submission: &LeadSubmission) -> AppResult<()> {
        tokio::time::sleep(self.delay).await;

        if self.log_payloads {
            let payload = serde_json::to_string(submission.values()).map_err(|error| {
                AppError::Internal(format!("failed to encode lead payload: {error}"))
            })?;
            debug!(
                submission_id = %submission.submission_id(),
                payload = %payload,
                "simulated lead payload"
            );
        }

        if let Some(reason) = &self.failure_reason {
            return Err(AppError::Delivery(reason.clone()));
        }

        info!(
            submission_id = %submission.submission_id(),
            form = submission.form_name(),
            fields = submission.values().len(),
            delay_ms = u64::try_from(self.delay.as_millis()).unwrap_or(u64::MAX),
            "lead accepted by simulated delivery"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use leadkit_application::{LeadDeliveryService, LeadSubmission};
    use leadkit_core::AppError;
    use leadkit_domain::FormValues;
    use tokio::time::Instant;

    use super::SimulatedLeadDelivery;

    fn submission() -> LeadSubmission {
        LeadSubmission::new("contact", FormValues::new().with("email", "jo@x.com"))
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_configured_delay() {
        let delivery = SimulatedLeadDelivery::new().with_delay(Duration::from_secs(2));
        let started = Instant::now();

        let result = delivery.deliver(&submission()).await;

        assert!(result.is_ok());
        assert!(started.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn injected_failure_is_a_delivery_error() {
        let delivery = SimulatedLeadDelivery::new()
            .with_delay(Duration::ZERO)
            .with_failure("intake endpoint returned 503");

        let result = delivery.deliver(&submission()).await;

        assert!(matches!(result, Err(AppError::Delivery(reason)) if reason.contains("503")));
    }
}
