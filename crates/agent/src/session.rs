//! Per-call booking session and turn dispatcher
//!
//! `BookingSession` owns the call's `SessionRecord` and the persona
//! registry, and routes every tool invocation from the policy function to
//! the currently active persona. The active-persona pointer is read from
//! the record before each dispatch, so a hand-off performed by a tool is
//! visible to the very next turn with no buffering in between.

use std::sync::Arc;

use serde_json::Value;

use clinic_agent_config::{ClinicConfig, DetectionConfig, PersonasConfig};
use clinic_agent_core::{extract_phone_from_room_name, BookingField, SessionRecord};
use clinic_agent_telephony::{CallControl, SmsService};
use clinic_agent_tools::{ToolContext, ToolSchema};

use crate::persona::{build_registry, AgentPersona, PersonaRegistry};

/// Reply used when a tool execution fails. The caller never hears a
/// technical error.
const RECOVERY_REPLY: &str = "I'm sorry, could you repeat that please?";

/// Session construction failures (misconfiguration, caught at call start).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no personas configured")]
    NoPersonas,
    #[error("entry persona '{0}' is not registered")]
    UnknownEntry(String),
}

/// Dispatch failures. These signal a policy-layer bug (asking for a tool
/// the active persona does not advertise), not a conversational error.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("tool '{tool}' is not available to persona '{persona}'")]
    UnknownTool { tool: String, persona: String },
    #[error("no active persona")]
    NoActivePersona,
}

/// Emitted when a dispatch switched the active persona. The runtime speaks
/// the target's greeting line, uninterrupted, before the next turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffAnnouncement {
    pub from: String,
    pub to: String,
    pub greeting_line: String,
}

/// Result of one tool dispatch.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Narration-friendly reply for the policy function
    pub reply: String,
    /// Present iff this dispatch handed the call to another persona
    pub handoff: Option<HandoffAnnouncement>,
}

/// One live call: session record, persona set, and external services.
pub struct BookingSession {
    record: SessionRecord,
    registry: PersonaRegistry,
    sms: Option<Arc<dyn SmsService>>,
    call: Option<Arc<dyn CallControl>>,
}

impl std::fmt::Debug for BookingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingSession")
            .field("record", &self.record)
            .field("sms", &self.sms.is_some())
            .field("call", &self.call.is_some())
            .finish_non_exhaustive()
    }
}

impl BookingSession {
    /// Create a session over a prebuilt registry, starting on `entry`.
    pub fn new(registry: PersonaRegistry, entry: &str) -> Result<Self, SessionError> {
        if registry.is_empty() {
            return Err(SessionError::NoPersonas);
        }

        let mut record = SessionRecord::new();
        for id in registry.ids() {
            record.register_persona(id);
        }
        record
            .activate_entry(entry)
            .map_err(|_| SessionError::UnknownEntry(entry.to_string()))?;

        Ok(Self {
            record,
            registry,
            sms: None,
            call: None,
        })
    }

    /// Create a session from configuration.
    pub fn from_configs(
        personas: &PersonasConfig,
        clinic: Arc<ClinicConfig>,
        detection: Arc<DetectionConfig>,
    ) -> Result<Self, SessionError> {
        let registry = build_registry(personas, clinic, detection);
        Self::new(registry, &personas.entry)
    }

    pub fn with_sms(mut self, sms: Arc<dyn SmsService>) -> Self {
        self.sms = Some(sms);
        self
    }

    pub fn with_call(mut self, call: Arc<dyn CallControl>) -> Self {
        self.call = Some(call);
        self
    }

    /// Pre-populate the phone field from an inbound call's room name, when
    /// the name carries one. Calls with a pre-populated number skip phone
    /// collection in favor of last-four-digits verification.
    pub fn with_room_name(mut self, room_name: &str) -> Self {
        match extract_phone_from_room_name(room_name) {
            Some(phone) => {
                tracing::info!(room = %room_name, phone = %phone, "phone extracted from room name");
                self.record.set_field(BookingField::Phone, phone);
            }
            None => {
                tracing::info!(room = %room_name, "no phone number in room name");
            }
        }
        self
    }

    pub fn record(&self) -> &SessionRecord {
        &self.record
    }

    /// The persona currently governing the conversation.
    pub fn active_persona(&self) -> Option<&Arc<AgentPersona>> {
        self.record
            .current_persona()
            .and_then(|id| self.registry.get(id))
    }

    /// Opening line of the active persona (spoken at call start and after
    /// each hand-off).
    pub fn opening_line(&self) -> Option<&str> {
        self.active_persona().map(|p| p.greeting_line())
    }

    /// Tool schemas the policy function may invoke this turn.
    pub fn available_tools(&self) -> Vec<ToolSchema> {
        self.active_persona()
            .map(|p| p.tool_schemas())
            .unwrap_or_default()
    }

    /// Dispatch one tool invocation against the active persona.
    ///
    /// Tool execution errors are recovered here into a polite reply; only a
    /// request for a tool the active persona does not carry is returned as
    /// an error, since that is a policy-layer bug rather than anything the
    /// caller did.
    pub async fn dispatch_tool(
        &mut self,
        tool_name: &str,
        input: Value,
    ) -> Result<TurnOutcome, DispatchError> {
        let persona = self
            .active_persona()
            .cloned()
            .ok_or(DispatchError::NoActivePersona)?;
        let before = persona.id().to_string();

        let tool = persona
            .find_tool(tool_name)
            .cloned()
            .ok_or_else(|| DispatchError::UnknownTool {
                tool: tool_name.to_string(),
                persona: before.clone(),
            })?;

        let mut ctx = ToolContext::new(&mut self.record);
        if let Some(sms) = &self.sms {
            ctx = ctx.with_sms(sms.clone());
        }
        if let Some(call) = &self.call {
            ctx = ctx.with_call(call.clone());
        }

        let reply = match tool.execute(input, &mut ctx).await {
            Ok(output) => output.text,
            Err(e) => {
                tracing::warn!(tool = tool_name, error = %e, "tool failed, recovering");
                RECOVERY_REPLY.to_string()
            }
        };

        let handoff = match self.record.current_persona() {
            Some(after) if after != before => {
                let greeting_line = self
                    .registry
                    .get(after)
                    .map(|p| p.greeting_line().to_string())
                    .unwrap_or_default();
                tracing::info!(from = %before, to = %after, "hand-off completed");
                Some(HandoffAnnouncement {
                    from: before,
                    to: after.to_string(),
                    greeting_line,
                })
            }
            _ => None,
        };

        Ok(TurnOutcome { reply, handoff })
    }
}
