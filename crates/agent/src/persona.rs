//! Agent personas and the persona registry
//!
//! A persona is an immutable bundle of instructions, ordered tool list, and
//! voice/output configuration, built once at call start from the persona
//! templates. The registry is the fixed set of hand-off targets for the
//! call; it is never mutated after construction.

use std::sync::Arc;

use clinic_agent_config::{ClinicConfig, DetectionConfig, PersonaRole, PersonasConfig};
use clinic_agent_core::Language;
use clinic_agent_tools::{
    CheckBookingCompleteTool, ClinicInfoTool, ConfirmPhoneVerificationTool, CurrentDatetimeTool,
    DetectLanguageAndTransferTool, EndCallTool, SendConfirmationSmsTool, SetFieldTool, Tool,
    ToolSchema, VerifyPhoneTool,
};

/// An instantiated persona. Opaque to the hand-off logic beyond its id and
/// the fact that its tools may mutate the session record.
pub struct AgentPersona {
    id: String,
    instructions: String,
    greeting_line: String,
    voice: String,
    tools: Vec<Arc<dyn Tool>>,
}

impl AgentPersona {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Instruction text governing the persona's turns.
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Scripted line spoken, uninterruptible, when this persona takes over.
    pub fn greeting_line(&self) -> &str {
        &self.greeting_line
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }

    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    pub fn find_tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Schemas advertised to the policy function while this persona governs.
    pub fn tool_schemas(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(|t| t.schema()).collect()
    }
}

/// The fixed set of personas for one call.
pub struct PersonaRegistry {
    personas: Vec<Arc<AgentPersona>>,
}

impl PersonaRegistry {
    pub fn new(personas: Vec<Arc<AgentPersona>>) -> Self {
        Self { personas }
    }

    pub fn get(&self, id: &str) -> Option<&Arc<AgentPersona>> {
        self.personas.iter().find(|p| p.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.personas.iter().map(|p| p.id.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

/// Instantiate every configured persona with its toolset.
///
/// Greeting personas carry only the detection/transfer tool, with hand-off
/// targets resolved from the configured booking personas by language.
/// Booking personas carry the five collectors plus the informational tools,
/// with verification and completion tools gated by their feature flags.
pub fn build_registry(
    config: &PersonasConfig,
    clinic: Arc<ClinicConfig>,
    detection: Arc<DetectionConfig>,
) -> PersonaRegistry {
    let now = chrono::Local::now()
        .format(clinic_agent_tools::info::DATETIME_FORMAT)
        .to_string();

    let personas = config
        .personas
        .iter()
        .map(|def| {
            let tools: Vec<Arc<dyn Tool>> = match def.role {
                PersonaRole::Greeting => {
                    vec![Arc::new(DetectLanguageAndTransferTool::new(
                        detection.clone(),
                        booking_target(config, Language::English),
                        booking_target(config, Language::French),
                    )) as Arc<dyn Tool>]
                }
                PersonaRole::Booking => {
                    let mut tools: Vec<Arc<dyn Tool>> = SetFieldTool::all()
                        .into_iter()
                        .map(|t| Arc::new(t) as Arc<dyn Tool>)
                        .collect();
                    tools.push(Arc::new(CurrentDatetimeTool));
                    tools.push(Arc::new(ClinicInfoTool::new(clinic.clone())));
                    if def.features.phone_verification {
                        tools.push(Arc::new(VerifyPhoneTool));
                        tools.push(Arc::new(ConfirmPhoneVerificationTool));
                    }
                    if def.features.sms_confirmation {
                        tools.push(Arc::new(CheckBookingCompleteTool::new(clinic.clone())));
                        tools.push(Arc::new(SendConfirmationSmsTool::new(clinic.clone())));
                        tools.push(Arc::new(EndCallTool));
                    }
                    tools
                }
            };

            Arc::new(AgentPersona {
                id: def.id.clone(),
                instructions: config.render_instructions(def, &clinic, &now),
                greeting_line: def.greeting_line.clone(),
                voice: def.voice.clone(),
                tools,
            })
        })
        .collect();

    PersonaRegistry::new(personas)
}

/// Hand-off target for a language: the booking persona configured for that
/// language, or any booking persona as fallback. A missing target resolves
/// to the entry persona, which makes the transfer a logged no-op at runtime.
fn booking_target(config: &PersonasConfig, language: Language) -> String {
    config
        .personas
        .iter()
        .find(|p| p.role == PersonaRole::Booking && p.language == Some(language))
        .or_else(|| {
            config
                .personas
                .iter()
                .find(|p| p.role == PersonaRole::Booking)
        })
        .map(|p| p.id.clone())
        .unwrap_or_else(|| config.entry.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_persona_has_only_transfer_tool() {
        let registry = build_registry(
            &PersonasConfig::default(),
            Arc::new(ClinicConfig::default()),
            Arc::new(DetectionConfig::default()),
        );
        let greeting = registry.get("greeting_agent").unwrap();
        let names: Vec<&str> = greeting.tools().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["detect_language_and_transfer"]);
    }

    #[test]
    fn test_booking_persona_toolset() {
        let registry = build_registry(
            &PersonasConfig::default(),
            Arc::new(ClinicConfig::default()),
            Arc::new(DetectionConfig::default()),
        );
        let booking = registry.get("english_booking_agent").unwrap();
        let names: Vec<&str> = booking.tools().iter().map(|t| t.name()).collect();
        assert!(names.contains(&"set_first_name"));
        assert!(names.contains(&"get_clinic_info"));
        assert!(names.contains(&"check_booking_complete"));
        assert!(names.contains(&"end_call"));
        // Verification is not enabled for the routed booking personas.
        assert!(!names.contains(&"verify_phone_last_four_digits"));
    }

    #[test]
    fn test_single_agent_carries_verification_tools() {
        let registry = build_registry(
            &PersonasConfig::single_agent(),
            Arc::new(ClinicConfig::default()),
            Arc::new(DetectionConfig::default()),
        );
        let main = registry.get("main_agent").unwrap();
        let names: Vec<&str> = main.tools().iter().map(|t| t.name()).collect();
        assert!(names.contains(&"verify_phone_last_four_digits"));
        assert!(names.contains(&"confirm_phone_verification"));
        assert!(names.contains(&"send_confirmation_sms"));
    }

    #[test]
    fn test_instructions_rendered_per_language() {
        let registry = build_registry(
            &PersonasConfig::default(),
            Arc::new(ClinicConfig::default()),
            Arc::new(DetectionConfig::default()),
        );
        let french = registry.get("french_booking_agent").unwrap();
        assert!(french.instructions().contains("en français"));
        assert_eq!(french.voice(), "nova");
    }
}
