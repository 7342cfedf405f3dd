use std::sync::Arc;

use async_trait::async_trait;
use leadkit_application::{LeadDeliveryService, LeadSubmission};
use leadkit_core::AppResult;
use tokio::sync::RwLock;

/// Delivery decorator that keeps every lead its inner delivery accepted.
pub struct RecordingLeadDelivery {
    inner: Arc<dyn LeadDeliveryService>,
    accepted: RwLock<Vec<LeadSubmission>>,
}

impl RecordingLeadDelivery {
    /// Wraps a delivery collaborator.
    #[must_use]
    pub fn new(inner: Arc<dyn LeadDeliveryService>) -> Self {
        Self {
            inner,
            accepted: RwLock::new(Vec::new()),
        }
    }

    /// Returns accepted leads in delivery order.
    pub async fn accepted(&self) -> Vec<LeadSubmission> {
        self.accepted.read().await.clone()
    }

    /// Returns how many leads were accepted.
    pub async fn accepted_count(&self) -> usize {
        self.accepted.read().await.len()
    }
}

#[async_trait]
impl LeadDeliveryService for RecordingLeadDelivery {
    async fn deliver(&self, submission: &LeadSubmission) -> AppResult<()> {
        self.inner.deliver(submission).await?;
        self.accepted.write().await.push(submission.clone());
        Ok(())
    }
}
