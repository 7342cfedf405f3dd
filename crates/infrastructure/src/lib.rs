//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod recording_lead_delivery;
mod simulated_lead_delivery;

pub use recording_lead_delivery::RecordingLeadDelivery;
pub use simulated_lead_delivery::{DEFAULT_DELIVERY_DELAY, SimulatedLeadDelivery};
