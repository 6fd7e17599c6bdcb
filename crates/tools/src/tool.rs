//! Tool interface
//!
//! Every operation the policy function can invoke is a [`Tool`]: a named
//! operation with a JSON-schema argument description and an async `execute`
//! that receives the call's [`ToolContext`]. Context is passed explicitly —
//! there is no ambient session state — so one record per call is enforced
//! by the type system rather than by convention.
//!
//! Tool outputs are narration-friendly strings; tool-level failures are
//! recovered before they can reach the live call.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use clinic_agent_core::SessionRecord;
use clinic_agent_telephony::{CallControl, SmsService};

/// Errors surfaced to the dispatcher. These never propagate past the tool
/// boundary: the dispatcher converts them into polite narration.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    #[error("execution failed: {0}")]
    Execution(String),
}

impl ToolError {
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        ToolError::InvalidParams(msg.into())
    }
}

/// Result of a tool execution. `text` is what the policy function narrates
/// from; `data` optionally carries structured detail for diagnostics.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub text: String,
    pub data: Option<Value>,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Per-dispatch execution context: exclusive access to the call's session
/// record plus the external services a tool may invoke.
pub struct ToolContext<'a> {
    pub record: &'a mut SessionRecord,
    pub sms: Option<Arc<dyn SmsService>>,
    pub call: Option<Arc<dyn CallControl>>,
}

impl<'a> ToolContext<'a> {
    pub fn new(record: &'a mut SessionRecord) -> Self {
        Self {
            record,
            sms: None,
            call: None,
        }
    }

    pub fn with_sms(mut self, sms: Arc<dyn SmsService>) -> Self {
        self.sms = Some(sms);
        self
    }

    pub fn with_call(mut self, call: Arc<dyn CallControl>) -> Self {
        self.call = Some(call);
        self
    }
}

/// A named operation callable by the policy function.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn schema(&self) -> ToolSchema;

    async fn execute(
        &self,
        input: Value,
        ctx: &mut ToolContext<'_>,
    ) -> Result<ToolOutput, ToolError>;
}

/// Schema advertised to the policy function.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
}

/// JSON-schema object describing a tool's arguments.
#[derive(Debug, Clone, Serialize)]
pub struct InputSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: BTreeMap<String, PropertySchema>,
    pub required: Vec<String>,
}

impl InputSchema {
    pub fn object() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }

    pub fn property(mut self, name: &str, schema: PropertySchema, required: bool) -> Self {
        self.properties.insert(name.to_string(), schema);
        if required {
            self.required.push(name.to_string());
        }
        self
    }
}

/// A single argument's schema.
#[derive(Debug, Clone, Serialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub property_type: String,
    pub description: String,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

impl PropertySchema {
    pub fn string(description: impl Into<String>) -> Self {
        Self {
            property_type: "string".to_string(),
            description: description.into(),
            enum_values: None,
        }
    }

    pub fn boolean(description: impl Into<String>) -> Self {
        Self {
            property_type: "boolean".to_string(),
            description: description.into(),
            enum_values: None,
        }
    }

    pub fn enum_type(description: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            property_type: "string".to_string(),
            description: description.into(),
            enum_values: Some(values),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_serializes_as_json_schema() {
        let schema = ToolSchema {
            name: "set_phone".to_string(),
            description: "Store the phone number".to_string(),
            input_schema: InputSchema::object().property(
                "phone",
                PropertySchema::string("The customer's phone number"),
                true,
            ),
        };
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["input_schema"]["type"], "object");
        assert_eq!(json["input_schema"]["required"][0], "phone");
        assert_eq!(
            json["input_schema"]["properties"]["phone"]["type"],
            "string"
        );
    }
}
