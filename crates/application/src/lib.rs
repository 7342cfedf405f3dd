//! Application services and ports.

#![forbid(unsafe_code)]

mod form_controller;
mod lead_delivery_ports;
mod lead_dialog;
pub mod lead_form_catalog;

pub use form_controller::{
    DEFAULT_SUCCESS_DISPLAY, FormController, FormControllerBuilder, FormSnapshot, SubmitOutcome,
};
pub use lead_delivery_ports::{LeadDeliveryService, LeadSubmission};
pub use lead_dialog::{LeadDialog, LeadDialogState};
pub use lead_form_catalog::CatalogForm;
