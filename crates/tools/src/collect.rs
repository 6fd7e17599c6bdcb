//! Field collector tools
//!
//! One tool per booking field, all the same shape: a single string
//! argument, an unconditional overwrite of the session record (no
//! validation, last write wins), a confirmation string for the policy
//! function to narrate, and a full record snapshot on the diagnostic
//! stream after every write.

use async_trait::async_trait;
use serde_json::Value;

use clinic_agent_core::{format_phone_number, BookingField};

use crate::tool::{InputSchema, PropertySchema, Tool, ToolContext, ToolError, ToolOutput, ToolSchema};

/// Collector for a single booking field.
pub struct SetFieldTool {
    field: BookingField,
}

impl SetFieldTool {
    pub fn new(field: BookingField) -> Self {
        Self { field }
    }

    /// Collectors for all five required fields, in collection order.
    pub fn all() -> Vec<SetFieldTool> {
        BookingField::ALL.iter().copied().map(Self::new).collect()
    }

    fn tool_name(&self) -> &'static str {
        match self.field {
            BookingField::FirstName => "set_first_name",
            BookingField::LastName => "set_last_name",
            BookingField::Phone => "set_phone",
            BookingField::BookingDateTime => "set_booking_date_time",
            BookingField::BookingReason => "set_booking_reason",
        }
    }

    fn param_name(&self) -> &'static str {
        match self.field {
            BookingField::FirstName | BookingField::LastName => "name",
            BookingField::Phone => "phone",
            BookingField::BookingDateTime => "date_time",
            BookingField::BookingReason => "reason",
        }
    }

    fn param_description(&self) -> &'static str {
        match self.field {
            BookingField::FirstName => "The customer's first name",
            BookingField::LastName => "The customer's last name",
            BookingField::Phone => "The customer's phone number",
            BookingField::BookingDateTime => "The customer's booking date and time",
            BookingField::BookingReason => "The booking reason",
        }
    }

    fn confirmation_noun(&self) -> &'static str {
        match self.field {
            BookingField::FirstName => "first name",
            BookingField::LastName => "last name",
            BookingField::Phone => "phone number",
            BookingField::BookingDateTime => "booking date and time",
            BookingField::BookingReason => "booking reason",
        }
    }

    fn tool_description(&self) -> &'static str {
        match self.field {
            BookingField::FirstName => "Called when the customer provides their first name",
            BookingField::LastName => "Called when the customer provides their last name",
            BookingField::Phone => "Called when the customer provides their phone number",
            BookingField::BookingDateTime => {
                "Called when the customer provides their booking date and time"
            }
            BookingField::BookingReason => "Called when the customer provides their booking reason",
        }
    }
}

#[async_trait]
impl Tool for SetFieldTool {
    fn name(&self) -> &str {
        self.tool_name()
    }

    fn description(&self) -> &str {
        self.tool_description()
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.tool_name().to_string(),
            description: self.tool_description().to_string(),
            input_schema: InputSchema::object().property(
                self.param_name(),
                PropertySchema::string(self.param_description()),
                true,
            ),
        }
    }

    async fn execute(
        &self,
        input: Value,
        ctx: &mut ToolContext<'_>,
    ) -> Result<ToolOutput, ToolError> {
        let raw = input
            .get(self.param_name())
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                ToolError::invalid_params(format!("{} is required", self.param_name()))
            })?;

        // Phone numbers are stored in the normalized form used for SMS
        // addressing; everything else is stored as given.
        let stored = match self.field {
            BookingField::Phone => format_phone_number(raw),
            _ => raw.to_string(),
        };

        ctx.record.set_field(self.field, stored.clone());
        tracing::info!(
            tool = self.tool_name(),
            snapshot = %ctx.record.summarize(),
            "booking field updated"
        );

        Ok(ToolOutput::text(format!(
            "The {} is updated to {}",
            self.confirmation_noun(),
            stored
        )))
    }
}
