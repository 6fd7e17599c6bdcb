//! Phone verification tools
//!
//! When the caller's number arrives with the call (room-name extraction),
//! the agent verifies it by reading back the last four digits instead of
//! collecting it digit by digit. A denied verification clears the stored
//! number for re-collection.

use async_trait::async_trait;
use serde_json::Value;

use clinic_agent_core::BookingField;

use crate::tool::{InputSchema, PropertySchema, Tool, ToolContext, ToolError, ToolOutput, ToolSchema};

const RECOLLECT_PROMPT: &str =
    "I don't have your phone number. Could you please provide it digit by digit?";

/// Reads back the last four digits of the stored phone number.
pub struct VerifyPhoneTool;

#[async_trait]
impl Tool for VerifyPhoneTool {
    fn name(&self) -> &str {
        "verify_phone_last_four_digits"
    }

    fn description(&self) -> &str {
        "Verify the customer's phone number by showing the last 4 digits"
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
        let Some(phone) = ctx.record.field(BookingField::Phone) else {
            return Ok(ToolOutput::text(RECOLLECT_PROMPT));
        };

        let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
        let last_four = if digits.len() >= 4 {
            digits[digits.len() - 4..].to_string()
        } else {
            "0000".to_string()
        };

        tracing::info!(last_four = %last_four, "verifying phone number");
        Ok(ToolOutput::text(format!(
            "I have your phone number ending in {}. Is this correct for sending the \
             confirmation SMS?",
            last_four
        )))
    }
}

/// Records the caller's answer to the last-four-digits check.
pub struct ConfirmPhoneVerificationTool;

#[async_trait]
impl Tool for ConfirmPhoneVerificationTool {
    fn name(&self) -> &str {
        "confirm_phone_verification"
    }

    fn description(&self) -> &str {
        "Called when the customer confirms or denies the phone number verification"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: InputSchema::object().property(
                "confirmed",
                PropertySchema::boolean(
                    "Whether the caller confirms the phone number ending digits are correct",
                ),
                true,
            ),
        }
    }

    async fn execute(
        &self,
        input: Value,
        ctx: &mut ToolContext<'_>,
    ) -> Result<ToolOutput, ToolError> {
        let confirmed = input
            .get("confirmed")
            .and_then(|v| v.as_bool())
            .ok_or_else(|| ToolError::invalid_params("confirmed is required"))?;

        if confirmed {
            match ctx.record.field(BookingField::Phone) {
                Some(phone) => {
                    tracing::info!(phone = %phone, "phone number verified");
                    Ok(ToolOutput::text(format!(
                        "Thank you! Your phone number {} has been verified for SMS confirmation.",
                        phone
                    )))
                }
                None => Ok(ToolOutput::text(RECOLLECT_PROMPT)),
            }
        } else {
            ctx.record.clear_field(BookingField::Phone);
            Ok(ToolOutput::text(
                "I understand. Please provide your correct phone number digit by digit \
                 in the format (1) 111 222 3333.",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_agent_core::SessionRecord;
    use serde_json::json;

    #[tokio::test]
    async fn test_verify_reads_last_four_digits() {
        let mut record = SessionRecord::new();
        record.set_field(BookingField::Phone, "+15145859691");
        let mut ctx = ToolContext::new(&mut record);

        let out = VerifyPhoneTool.execute(json!({}), &mut ctx).await.unwrap();
        assert!(out.text.contains("ending in 9691"));
    }

    #[tokio::test]
    async fn test_verify_without_phone_asks_for_it() {
        let mut record = SessionRecord::new();
        let mut ctx = ToolContext::new(&mut record);

        let out = VerifyPhoneTool.execute(json!({}), &mut ctx).await.unwrap();
        assert_eq!(out.text, RECOLLECT_PROMPT);
    }

    #[tokio::test]
    async fn test_verify_short_number_falls_back() {
        let mut record = SessionRecord::new();
        record.set_field(BookingField::Phone, "+12");
        let mut ctx = ToolContext::new(&mut record);

        let out = VerifyPhoneTool.execute(json!({}), &mut ctx).await.unwrap();
        assert!(out.text.contains("ending in 0000"));
    }

    #[tokio::test]
    async fn test_denied_verification_clears_phone() {
        let mut record = SessionRecord::new();
        record.set_field(BookingField::Phone, "+15145859691");
        let mut ctx = ToolContext::new(&mut record);

        let out = ConfirmPhoneVerificationTool
            .execute(json!({"confirmed": false}), &mut ctx)
            .await
            .unwrap();
        assert!(out.text.contains("digit by digit"));
        assert_eq!(record.field(BookingField::Phone), None);
    }

    #[tokio::test]
    async fn test_confirmed_verification_keeps_phone() {
        let mut record = SessionRecord::new();
        record.set_field(BookingField::Phone, "+15145859691");
        let mut ctx = ToolContext::new(&mut record);

        let out = ConfirmPhoneVerificationTool
            .execute(json!({"confirmed": true}), &mut ctx)
            .await
            .unwrap();
        assert!(out.text.contains("+15145859691"));
        assert_eq!(record.field(BookingField::Phone), Some("+15145859691"));
    }
}
