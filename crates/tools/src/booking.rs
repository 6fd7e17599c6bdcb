//! Booking completion, confirmation SMS, and call termination
//!
//! The completion gate authorizes the call-closing actions: it checks that
//! every required field is collected, triggers the confirmation SMS exactly
//! once per call, and tells the policy function to close. A failed SMS is
//! surfaced in the logs and the returned status, never retried, and never
//! aborts the call.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use clinic_agent_config::ClinicConfig;
use clinic_agent_core::BookingField;

use crate::tool::{InputSchema, Tool, ToolContext, ToolError, ToolOutput, ToolSchema};

const BOOKING_COMPLETE_MESSAGE: &str =
    "Booking is complete. All required information has been collected and confirmation SMS \
     has been sent. Please end the call now.";

/// Send the confirmation SMS for the current record. Fails closed: every
/// failure mode becomes a failure string, not an error.
async fn send_confirmation(ctx: &mut ToolContext<'_>, clinic: &ClinicConfig) -> String {
    let Some(sms) = ctx.sms.clone() else {
        tracing::error!("sms service not configured; cannot send confirmation");
        return "Failed to send confirmation SMS - missing credentials".to_string();
    };

    let phone = ctx
        .record
        .field(BookingField::Phone)
        .unwrap_or_default()
        .to_string();
    let body = format!(
        "{} - Appointment Confirmation\nDate: {}\nPhone: {}\nReason: {}\n",
        clinic.name,
        ctx.record.field(BookingField::BookingDateTime).unwrap_or_default(),
        phone,
        ctx.record.field(BookingField::BookingReason).unwrap_or_default(),
    );

    match sms.send_sms(&phone, &body).await {
        Ok(receipt) => {
            tracing::info!(sid = %receipt.sid, to = %receipt.to, "confirmation sms sent");
            format!("Confirmation SMS sent successfully to {}", phone)
        }
        Err(e) => {
            tracing::error!(error = %e, "error sending confirmation sms");
            format!("Failed to send confirmation SMS: {}", e)
        }
    }
}

/// Sends the appointment confirmation SMS with all booking details.
pub struct SendConfirmationSmsTool {
    clinic: Arc<ClinicConfig>,
}

impl SendConfirmationSmsTool {
    pub fn new(clinic: Arc<ClinicConfig>) -> Self {
        Self { clinic }
    }
}

#[async_trait]
impl Tool for SendConfirmationSmsTool {
    fn name(&self) -> &str {
        "send_confirmation_sms"
    }

    fn description(&self) -> &str {
        "Send SMS confirmation to the customer with all booking details"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: InputSchema::object(),
        }
    }

    async fn execute(
        &self,
        _input: Value,
        ctx: &mut ToolContext<'_>,
    ) -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput::text(send_confirmation(ctx, &self.clinic).await))
    }
}

/// The booking-completion gate.
pub struct CheckBookingCompleteTool {
    clinic: Arc<ClinicConfig>,
}

impl CheckBookingCompleteTool {
    pub fn new(clinic: Arc<ClinicConfig>) -> Self {
        Self { clinic }
    }
}

#[async_trait]
impl Tool for CheckBookingCompleteTool {
    fn name(&self) -> &str {
        "check_booking_complete"
    }

    fn description(&self) -> &str {
        "Check if all booking information has been collected and send confirmation SMS"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: InputSchema::object(),
        }
    }

    async fn execute(
        &self,
        _input: Value,
        ctx: &mut ToolContext<'_>,
    ) -> Result<ToolOutput, ToolError> {
        if !ctx.record.is_complete() {
            let missing: Vec<&str> = ctx
                .record
                .missing_fields()
                .iter()
                .map(|f| f.label())
                .collect();
            return Ok(ToolOutput::text(format!(
                "Booking incomplete. Missing: {}",
                missing.join(", ")
            )));
        }

        if ctx.record.confirmation_sent() {
            // The gate may be re-checked while closing; the notification
            // goes out at most once per call.
            tracing::debug!("confirmation already attempted, not resending");
            return Ok(ToolOutput::text(BOOKING_COMPLETE_MESSAGE));
        }

        tracing::info!("booking complete - all information collected");
        ctx.record.mark_confirmation_sent();
        let sms_result = send_confirmation(ctx, &self.clinic).await;
        tracing::info!(result = %sms_result, "sms confirmation result");

        Ok(ToolOutput::text(BOOKING_COMPLETE_MESSAGE))
    }
}

/// Ends the call once the closing narration has finished playing.
pub struct EndCallTool;

#[async_trait]
impl Tool for EndCallTool {
    fn name(&self) -> &str {
        "end_call"
    }

    fn description(&self) -> &str {
        "End the call after booking is complete"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: InputSchema::object(),
        }
    }

    async fn execute(
        &self,
        _input: Value,
        ctx: &mut ToolContext<'_>,
    ) -> Result<ToolOutput, ToolError> {
        tracing::info!("ending call - booking completed");

        match ctx.call.clone() {
            Some(call) => {
                if let Err(e) = call.hang_up().await {
                    // Teardown failure is logged once, not retried; the
                    // policy layer still hears a clean close.
                    tracing::error!(error = %e, "error ending call");
                }
            }
            None => tracing::warn!("no call control attached, nothing to close"),
        }

        Ok(ToolOutput::text("Call ended successfully"))
    }
}
