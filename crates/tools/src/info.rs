//! Informational tools: current date/time and clinic info

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use clinic_agent_config::ClinicConfig;
use clinic_agent_core::Language;

use crate::tool::{InputSchema, Tool, ToolContext, ToolError, ToolOutput, ToolSchema};

/// Long-form human-readable timestamp, e.g.
/// "Monday, June 02, 2025 at 09:00 AM".
pub const DATETIME_FORMAT: &str = "%A, %B %d, %Y at %I:%M %p";

/// Reports the current local date and time so the policy function can
/// resolve relative dates ("next Tuesday") against it.
pub struct CurrentDatetimeTool;

#[async_trait]
impl Tool for CurrentDatetimeTool {
    fn name(&self) -> &str {
        "get_current_datetime"
    }

    fn description(&self) -> &str {
        "Get the current date and time"
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
        _ctx: &mut ToolContext<'_>,
    ) -> Result<ToolOutput, ToolError> {
        let now = chrono::Local::now();
        Ok(ToolOutput::text(format!(
            "Current date and time: {}",
            now.format(DATETIME_FORMAT)
        )))
    }
}

/// Returns the fixed clinic address/hours text, in the call's detected
/// language (English when no detection has happened yet).
pub struct ClinicInfoTool {
    clinic: Arc<ClinicConfig>,
}

impl ClinicInfoTool {
    pub fn new(clinic: Arc<ClinicConfig>) -> Self {
        Self { clinic }
    }
}

#[async_trait]
impl Tool for ClinicInfoTool {
    fn name(&self) -> &str {
        "get_clinic_info"
    }

    fn description(&self) -> &str {
        "Get dental clinic location and opening hours information"
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
        let language = ctx.record.detected_language().unwrap_or(Language::English);
        Ok(ToolOutput::text(self.clinic.info(language)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_agent_core::SessionRecord;
    use serde_json::json;

    #[tokio::test]
    async fn test_datetime_has_expected_shape() {
        let mut record = SessionRecord::new();
        let mut ctx = ToolContext::new(&mut record);
        let out = CurrentDatetimeTool
            .execute(json!({}), &mut ctx)
            .await
            .unwrap();
        assert!(out.text.starts_with("Current date and time: "));
        // Long-form format includes the year and an AM/PM marker.
        assert!(out.text.contains("20"));
        assert!(out.text.contains('M'));
    }

    #[tokio::test]
    async fn test_clinic_info_follows_detected_language() {
        let clinic = Arc::new(ClinicConfig::default());
        let tool = ClinicInfoTool::new(clinic);

        let mut record = SessionRecord::new();
        let mut ctx = ToolContext::new(&mut record);
        let out = tool.execute(json!({}), &mut ctx).await.unwrap();
        assert!(out.text.contains("5561 St-Denis Street"));

        record.set_detected_language(Language::French);
        let mut ctx = ToolContext::new(&mut record);
        let out = tool.execute(json!({}), &mut ctx).await.unwrap();
        assert!(out.text.contains("rue St-Denis"));
    }
}
