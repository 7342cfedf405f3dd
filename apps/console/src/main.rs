//! Leadkit console driver.
//!
//! Fills one of the site's lead forms from `field=value` arguments and submits
//! it through the simulated delivery, the way a page would.

#![forbid(unsafe_code)]

mod console_config;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use leadkit_application::lead_form_catalog::DEFAULT_SERVICES;
use leadkit_application::{FormController, LeadDialog, SubmitOutcome};
use leadkit_core::{AppError, AppResult};
use leadkit_domain::{CardDeck, FormValues};
use leadkit_infrastructure::{RecordingLeadDelivery, SimulatedLeadDelivery};
use tracing::{info, warn};

use crate::console_config::{ConsoleConfig, init_tracing, parse_field_arguments};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ConsoleConfig::load()?;
    let field_values = parse_field_arguments(env::args().skip(1))?;

    if let Some(cards_path) = config.cards_path.as_deref() {
        render_cards(cards_path)?;
    }

    let delivery = Arc::new(RecordingLeadDelivery::new(Arc::new(build_delivery(&config))));
    let schema = config.form.schema(&DEFAULT_SERVICES)?;
    let controller = FormController::builder(schema, delivery.clone())
        .with_success_display(config.success_display)
        .with_bound_fields(field_values.iter().map(|(name, _)| name.to_owned()))
        .build()?;

    info!(
        form = config.form.as_str(),
        fields = field_values.len(),
        delivery_delay_ms = u64::try_from(config.delivery_delay.as_millis()).unwrap_or(u64::MAX),
        "leadkit-console started"
    );

    match config.form.service_field() {
        Some(service_field) => {
            let dialog = LeadDialog::new(controller, service_field)?;
            dialog.open(config.service.as_deref())?;

            let result = submit_and_report(dialog.controller(), &field_values, &config).await;
            dialog.close()?;
            info!(
                accepted = delivery.accepted_count().await,
                "lead dialog closed"
            );
            result
        }
        None => submit_and_report(&controller, &field_values, &config).await,
    }
}

fn build_delivery(config: &ConsoleConfig) -> SimulatedLeadDelivery {
    let delivery = SimulatedLeadDelivery::new()
        .with_delay(config.delivery_delay)
        .with_payload_logging(config.log_payloads);

    match config.simulated_failure.as_deref() {
        Some(reason) => delivery.with_failure(reason),
        None => delivery,
    }
}

async fn submit_and_report(
    controller: &FormController,
    field_values: &FormValues,
    config: &ConsoleConfig,
) -> AppResult<()> {
    for (name, value) in field_values.iter() {
        controller.set_field(name, value)?;
    }

    match controller.submit().await? {
        SubmitOutcome::Delivered(submission_id) => {
            info!(
                form = config.form.as_str(),
                submission_id = %submission_id,
                "thank you, we will be in touch shortly"
            );

            tokio::time::sleep(controller.success_display() + Duration::from_millis(50)).await;
            let state = controller.snapshot()?.state;
            info!(state = state.as_str(), "success confirmation dismissed");
            Ok(())
        }
        SubmitOutcome::Invalid(errors) => {
            for (field, message) in errors.iter() {
                warn!(field = field, message = message, "invalid field");
            }
            Err(AppError::Validation(format!(
                "{} field(s) need attention",
                errors.len()
            )))
        }
        SubmitOutcome::Failed { reason } => {
            warn!(reason = %reason, "submission failed, please try again");
            Err(AppError::Delivery(reason))
        }
        SubmitOutcome::Ignored | SubmitOutcome::Discarded => Err(AppError::Conflict(
            "submission did not run to completion".to_owned(),
        )),
    }
}

fn render_cards(cards_path: &str) -> AppResult<()> {
    let document = std::fs::read_to_string(cards_path).map_err(|error| {
        AppError::Internal(format!("failed to read content cards '{cards_path}': {error}"))
    })?;
    let deck = CardDeck::from_json(&document)?;

    info!(cards = deck.cards().len(), "rendering content cards");
    println!("{}", deck.render());
    Ok(())
}
