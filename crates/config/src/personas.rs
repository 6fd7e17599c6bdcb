//! Persona templates
//!
//! One parameterized template keyed by role, locale, and feature flags
//! replaces the per-language copies of near-identical persona classes the
//! product started with. The agent crate instantiates concrete personas
//! (instructions + toolset) from these definitions.

use serde::{Deserialize, Serialize};
use std::path::Path;

use clinic_agent_core::Language;

use crate::{ClinicConfig, ConfigError};

/// What a persona is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaRole {
    /// Greets the caller, detects language, transfers. No booking tools.
    Greeting,
    /// Collects booking fields and closes the call.
    Booking,
}

/// Optional capabilities a booking persona carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PersonaFeatures {
    /// Verify a pre-populated phone number by its last four digits.
    #[serde(default)]
    pub phone_verification: bool,
    /// Completion gate, confirmation SMS, and end-call tools.
    #[serde(default)]
    pub sms_confirmation: bool,
}

/// A single persona definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaDefinition {
    /// Stable name used as the hand-off target key
    pub id: String,
    pub role: PersonaRole,
    /// Conversation language. `None` means the persona follows the caller's
    /// opening language and never switches mid-call.
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub features: PersonaFeatures,
    /// TTS voice id
    #[serde(default = "default_voice")]
    pub voice: String,
    /// Scripted line spoken, uninterruptible, when the persona takes over
    pub greeting_line: String,
}

fn default_voice() -> String {
    "nova".to_string()
}

/// Persona set for a deployment, loadable from personas.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonasConfig {
    /// Persona that governs the call at start
    pub entry: String,
    pub personas: Vec<PersonaDefinition>,
}

impl Default for PersonasConfig {
    fn default() -> Self {
        Self::multi_agent()
    }
}

impl PersonasConfig {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        crate::load_yaml(path)
    }

    /// Greeting-and-route configuration: a bilingual greeting persona hands
    /// off to one booking persona per language.
    pub fn multi_agent() -> Self {
        Self {
            entry: "greeting_agent".to_string(),
            personas: vec![
                PersonaDefinition {
                    id: "greeting_agent".to_string(),
                    role: PersonaRole::Greeting,
                    language: None,
                    features: PersonaFeatures::default(),
                    voice: default_voice(),
                    greeting_line: "Hi Bonjour, welcome to SmileRight Dental Clinic, \
                                    how can I help you today?"
                        .to_string(),
                },
                PersonaDefinition {
                    id: "english_booking_agent".to_string(),
                    role: PersonaRole::Booking,
                    language: Some(Language::English),
                    features: PersonaFeatures {
                        phone_verification: false,
                        sms_confirmation: true,
                    },
                    voice: default_voice(),
                    greeting_line: "Perfect! I'll help you book your appointment in English. \
                                    Let's start with your preferred appointment date and time."
                        .to_string(),
                },
                PersonaDefinition {
                    id: "french_booking_agent".to_string(),
                    role: PersonaRole::Booking,
                    language: Some(Language::French),
                    features: PersonaFeatures {
                        phone_verification: false,
                        sms_confirmation: true,
                    },
                    voice: default_voice(),
                    greeting_line: "Parfait ! Je vais vous aider à prendre votre rendez-vous \
                                    en français. Commençons par votre date et heure de \
                                    rendez-vous préférées."
                        .to_string(),
                },
            ],
        }
    }

    /// Single-persona configuration: one booking persona with phone
    /// verification and SMS confirmation, no language routing. Used for
    /// inbound telephony deployments where the caller's number arrives with
    /// the call.
    pub fn single_agent() -> Self {
        Self {
            entry: "main_agent".to_string(),
            personas: vec![PersonaDefinition {
                id: "main_agent".to_string(),
                role: PersonaRole::Booking,
                language: None,
                features: PersonaFeatures {
                    phone_verification: true,
                    sms_confirmation: true,
                },
                voice: default_voice(),
                greeting_line: "Hi, welcome to SmileRight Dental Clinic, \
                                how can I help you today?"
                    .to_string(),
            }],
        }
    }

    pub fn get(&self, id: &str) -> Option<&PersonaDefinition> {
        self.personas.iter().find(|p| p.id == id)
    }

    pub fn entry_definition(&self) -> Option<&PersonaDefinition> {
        self.get(&self.entry)
    }

    /// Render the instruction text governing a persona's turns.
    ///
    /// `current_time` is the call-start timestamp in long human-readable
    /// form; it is baked into the instructions the same way the deployed
    /// prompts do it.
    pub fn render_instructions(
        &self,
        def: &PersonaDefinition,
        clinic: &ClinicConfig,
        current_time: &str,
    ) -> String {
        match def.role {
            PersonaRole::Greeting => greeting_instructions(&def.greeting_line),
            PersonaRole::Booking => booking_instructions(def, clinic, current_time),
        }
    }
}

fn greeting_instructions(greeting_line: &str) -> String {
    format!(
        "You are the greeting agent for SmileRight Dental Clinic.\n\
         \n\
         Your role is to:\n\
         1. Greet customers with \"{greeting_line}\"\n\
         2. Listen to their first response\n\
         3. Use the detect_language_and_transfer function to analyze their language preference\n\
         4. Silently transfer them to the appropriate specialized booking agent\n\
         \n\
         IMPORTANT RULES:\n\
         - Always greet with the exact phrase above\n\
         - After the user responds, immediately call detect_language_and_transfer with their response\n\
         - Do not engage in booking activities: your only job is language detection and transfer\n\
         - Do NOT announce the transfer; make it completely silent\n\
         - After calling detect_language_and_transfer, do not say anything else"
    )
}

fn booking_instructions(
    def: &PersonaDefinition,
    clinic: &ClinicConfig,
    current_time: &str,
) -> String {
    // French personas get fully localized instructions; everything else is
    // written in English with the appropriate language policy.
    match def.language {
        Some(Language::French) => french_booking_instructions(def, clinic, current_time),
        _ => english_booking_instructions(def, clinic, current_time),
    }
}

fn english_booking_instructions(
    def: &PersonaDefinition,
    clinic: &ClinicConfig,
    current_time: &str,
) -> String {
    let language_policy = match def.language {
        Some(_) => "Conduct the entire conversation in English.",
        None => "Do not switch languages once the conversation has started, even if the patient does.",
    };

    let phone_rule = if def.features.phone_verification {
        "PHONE NUMBER RULE\n\
         The phone number is automatically initialized from the room name when the call starts.\n\
         If a phone number is already available, use verify_phone_last_four_digits to show the \
         last 4 digits and ask for verification.\n\
         If the caller confirms using confirm_phone_verification, the number is verified for SMS \
         confirmation.\n\
         If the caller denies or if no phone number is available, request the telephone number \
         digit by digit using set_phone.\n\
         The required format is (1) 111 222 3333.\n\
         The country code \"(1)\" may be omitted by the patient; if missing, add it yourself.\n\
         Always speak or repeat the number digit by digit.\n\
         Example: (1) 5 1 4 5 8 5 9 6 9 1."
    } else {
        "PHONE NUMBER RULE\n\
         Request the telephone number digit by digit.\n\
         The required format is (1) 111 222 3333.\n\
         The country code \"(1)\" may be omitted by the patient; if missing, add it yourself.\n\
         Always speak or repeat the number digit by digit.\n\
         Example: (1) 5 1 4 5 8 5 9 6 9 1."
    };

    let closing = if def.features.sms_confirmation {
        "Confirm all captured details: date, time, full name, phone number, and reason.\n\
         After confirming all details, check if the booking is complete using the \
         check_booking_complete function.\n\
         If the booking is complete, provide a brief closing remark such as: \
         \"We look forward to seeing you!\"\n\
         Then immediately end the call using the end_call function."
    } else {
        "Confirm all captured details: date, time, full name, phone number, and reason.\n\
         End with: \"We look forward to seeing you!\""
    };

    format!(
        "You are the automated booking agent for {name}.\n\
         Current date and time: {current_time}\n\
         {info}\n\
         \n\
         LANGUAGE POLICY\n\
         {language_policy}\n\
         Never use special characters such as %, $, #, or *.\n\
         \n\
         {phone_rule}\n\
         \n\
         BOOKING FLOW (ask only one question at a time)\n\
         \n\
         Ask for the desired appointment date and time.\n\
         Validate that the chosen slot falls within operating hours ({hours}).\n\
         If it does not, politely suggest the nearest available slot.\n\
         \n\
         Ask for the patient's first name.\n\
         \n\
         Ask for the patient's last name and request that they spell it letter by letter.\n\
         \n\
         Ask for the telephone number digit by digit.\n\
         \n\
         Ask for the reason for the visit.\n\
         \n\
         {closing}\n\
         \n\
         GENERAL GUIDELINES\n\
         Never ask two questions at once.\n\
         Respond in clear, complete sentences.\n\
         If the user provides unexpected information, politely steer them back to the required step.\n\
         If the user asks for anything outside your scope (for example medical advice), respond \
         succinctly that you can only help with booking appointments.\n\
         If the user requests general information about the clinic such as opening hours, address, \
         or available services, provide the requested information.",
        name = clinic.name,
        info = clinic.info(Language::English),
        hours = clinic.operating_hours(Language::English),
    )
}

fn french_booking_instructions(
    def: &PersonaDefinition,
    clinic: &ClinicConfig,
    current_time: &str,
) -> String {
    let closing = if def.features.sms_confirmation {
        "Confirmez tous les détails saisis : date, heure, nom complet, numéro de téléphone et raison.\n\
         Après avoir confirmé tous les détails, vérifiez que la réservation est complète avec la \
         fonction check_booking_complete.\n\
         Si la réservation est complète, terminez par une brève formule comme : \
         « Nous avons hâte de vous voir ! »\n\
         Puis terminez immédiatement l'appel avec la fonction end_call."
    } else {
        "Confirmez tous les détails saisis : date, heure, nom complet, numéro de téléphone et raison.\n\
         Terminez par : « Nous avons hâte de vous voir ! »"
    };

    format!(
        "Vous êtes l'agent de réservation en français de la Clinique Dentaire SmileRight.\n\
         Date et heure actuelles : {current_time}\n\
         {info}\n\
         \n\
         POLITIQUE LINGUISTIQUE\n\
         Menez toute la conversation en français.\n\
         N'utilisez jamais de caractères spéciaux tels que %, $, #, ou *.\n\
         \n\
         RÈGLE NUMÉRO DE TÉLÉPHONE\n\
         Demandez le numéro de téléphone chiffre par chiffre.\n\
         Le format requis est (1) 111 222 3333.\n\
         L'indicatif de pays \"(1)\" peut être omis par le patient ; s'il manque, ajoutez-le vous-même.\n\
         Toujours épeler ou répéter le numéro chiffre par chiffre.\n\
         Exemple : (1) 5 1 4 5 8 5 9 6 9 1.\n\
         \n\
         PROCESSUS DE RÉSERVATION (ne posez qu'une question à la fois)\n\
         \n\
         Demandez la date et l'heure de rendez-vous souhaitées.\n\
         Validez que le créneau choisi se situe dans les heures d'ouverture ({hours}).\n\
         Si ce n'est pas le cas, proposez poliment le créneau disponible le plus proche.\n\
         \n\
         Demandez le prénom du patient.\n\
         \n\
         Demandez le nom de famille du patient et demandez qu'il l'épelle lettre par lettre.\n\
         \n\
         Demandez le numéro de téléphone chiffre par chiffre.\n\
         \n\
         Demandez la raison de la visite.\n\
         \n\
         {closing}\n\
         \n\
         DIRECTIVES GÉNÉRALES\n\
         Ne posez jamais deux questions à la fois.\n\
         Répondez en phrases claires et complètes.\n\
         Si l'utilisateur fournit des informations inattendues, redirigez-le poliment vers l'étape requise.\n\
         Si l'utilisateur demande quelque chose en dehors de votre domaine (par exemple des conseils \
         médicaux), répondez succinctement que vous ne pouvez aider qu'avec la prise de rendez-vous.\n\
         Si l'utilisateur demande des informations générales sur la clinique telles que les heures \
         d'ouverture, l'adresse ou les services disponibles, fournissez les informations demandées.",
        info = clinic.info(Language::French),
        hours = clinic.operating_hours(Language::French),
    )
}
