//! Language detection and hand-off tool
//!
//! The greeting persona's only tool. It scores the caller's first response
//! against the keyword lists, records the detected language, and directly
//! switches the active-persona pointer the turn dispatcher reads before
//! every turn. The returned string is informational: routing never depends
//! on narrated text.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use clinic_agent_config::DetectionConfig;
use clinic_agent_core::Language;

use crate::tool::{InputSchema, PropertySchema, Tool, ToolContext, ToolError, ToolOutput, ToolSchema};

/// Detects the caller's language and transfers to the matching booking
/// persona.
pub struct DetectLanguageAndTransferTool {
    detection: Arc<DetectionConfig>,
    english_target: String,
    french_target: String,
}

impl DetectLanguageAndTransferTool {
    pub fn new(
        detection: Arc<DetectionConfig>,
        english_target: impl Into<String>,
        french_target: impl Into<String>,
    ) -> Self {
        Self {
            detection,
            english_target: english_target.into(),
            french_target: french_target.into(),
        }
    }

    fn target_for(&self, language: Language) -> &str {
        match language {
            Language::English => &self.english_target,
            Language::French => &self.french_target,
        }
    }
}

#[async_trait]
impl Tool for DetectLanguageAndTransferTool {
    fn name(&self) -> &str {
        "detect_language_and_transfer"
    }

    fn description(&self) -> &str {
        "Detect the language of the user's response and transfer to the appropriate booking agent"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: InputSchema::object().property(
                "user_response",
                PropertySchema::string("The user's response to analyze for language detection"),
                true,
            ),
        }
    }

    async fn execute(
        &self,
        input: Value,
        ctx: &mut ToolContext<'_>,
    ) -> Result<ToolOutput, ToolError> {
        let response = input
            .get("user_response")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::invalid_params("user_response is required"))?;

        // Idempotent re-entry: once the hand-off has happened, repeat calls
        // report the standing decision without touching any state.
        if let (Some(language), Some(_)) =
            (ctx.record.detected_language(), ctx.record.previous_persona())
        {
            tracing::debug!(language = %language, "transfer already completed");
            return Ok(ToolOutput::text(format!(
                "Transferred to {} agent",
                language.display_name()
            )));
        }

        let (language, scores) = self.detection.detect(response);
        ctx.record.set_detected_language(language);
        tracing::info!(
            language = %language,
            french_score = scores.french,
            english_score = scores.english,
            "language detected"
        );
        tracing::info!(snapshot = %ctx.record.summarize(), "session state at hand-off");

        match ctx.record.transfer(self.target_for(language)) {
            Ok(()) => Ok(ToolOutput::text(format!(
                "Transferred to {} agent",
                language.display_name()
            ))),
            Err(e) => {
                // Fail-safe: the conversation continues under the current
                // persona rather than dropping the call.
                tracing::error!(error = %e, "hand-off failed, keeping current agent");
                Ok(ToolOutput::text(
                    "Language preference noted, continuing with the current agent",
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_agent_core::SessionRecord;
    use serde_json::json;

    fn tool() -> DetectLanguageAndTransferTool {
        DetectLanguageAndTransferTool::new(
            Arc::new(DetectionConfig::default()),
            "english_booking_agent",
            "french_booking_agent",
        )
    }

    fn greeting_record() -> SessionRecord {
        let mut record = SessionRecord::new();
        record.register_persona("greeting_agent");
        record.register_persona("english_booking_agent");
        record.register_persona("french_booking_agent");
        record.activate_entry("greeting_agent").unwrap();
        record
    }

    #[tokio::test]
    async fn test_french_utterance_transfers_to_french_agent() {
        let mut record = greeting_record();
        let mut ctx = ToolContext::new(&mut record);

        let out = tool()
            .execute(json!({"user_response": "bonjour, je voudrais un rendez-vous"}), &mut ctx)
            .await
            .unwrap();

        assert_eq!(out.text, "Transferred to French agent");
        assert_eq!(record.detected_language(), Some(Language::French));
        assert_eq!(record.current_persona(), Some("french_booking_agent"));
        assert_eq!(record.previous_persona(), Some("greeting_agent"));
    }

    #[tokio::test]
    async fn test_english_utterance_transfers_to_english_agent() {
        let mut record = greeting_record();
        let mut ctx = ToolContext::new(&mut record);

        let out = tool()
            .execute(
                json!({"user_response": "hello, I need an appointment please"}),
                &mut ctx,
            )
            .await
            .unwrap();

        assert_eq!(out.text, "Transferred to English agent");
        assert_eq!(record.current_persona(), Some("english_booking_agent"));
    }

    #[tokio::test]
    async fn test_reentry_is_idempotent() {
        let mut record = greeting_record();
        let the_tool = tool();

        let mut ctx = ToolContext::new(&mut record);
        the_tool
            .execute(json!({"user_response": "bonjour merci"}), &mut ctx)
            .await
            .unwrap();

        // A second invocation reports the standing decision and leaves the
        // pointers alone, even for an utterance in the other language.
        let mut ctx = ToolContext::new(&mut record);
        let out = the_tool
            .execute(json!({"user_response": "hello yes please"}), &mut ctx)
            .await
            .unwrap();

        assert_eq!(out.text, "Transferred to French agent");
        assert_eq!(record.detected_language(), Some(Language::French));
        assert_eq!(record.current_persona(), Some("french_booking_agent"));
        assert_eq!(record.previous_persona(), Some("greeting_agent"));
    }

    #[tokio::test]
    async fn test_unknown_target_keeps_current_agent() {
        let mut record = greeting_record();
        let mut ctx = ToolContext::new(&mut record);
        let bad_tool = DetectLanguageAndTransferTool::new(
            Arc::new(DetectionConfig::default()),
            "english_booking_agent",
            "missing_agent",
        );

        let out = bad_tool
            .execute(json!({"user_response": "bonjour merci oui"}), &mut ctx)
            .await
            .unwrap();

        assert!(out.text.contains("continuing with the current agent"));
        assert_eq!(record.current_persona(), Some("greeting_agent"));
    }
}
