//! Per-call session record
//!
//! The `SessionRecord` is the single mutable structure shared by every tool
//! a persona exposes. It holds the collected booking fields, the detected
//! language, and the persona registry pointers the hand-off controller
//! mutates. One record is created at call start and dropped at call end;
//! records are never persisted or shared across calls, so tool invocations
//! are serialized by construction (`&mut` access per conversational turn).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Booking information collected over the course of a call.
///
/// Fields are unset until a collector tool writes them and are only ever
/// overwritten, never removed (phone re-collection after a failed
/// verification is the one deliberate exception).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingField {
    FirstName,
    LastName,
    Phone,
    BookingDateTime,
    BookingReason,
}

impl BookingField {
    /// All required fields, in collection order.
    pub const ALL: [BookingField; 5] = [
        BookingField::FirstName,
        BookingField::LastName,
        BookingField::Phone,
        BookingField::BookingDateTime,
        BookingField::BookingReason,
    ];

    /// Snapshot key, matching the audit log schema.
    pub fn key(&self) -> &'static str {
        match self {
            BookingField::FirstName => "customer_first_name",
            BookingField::LastName => "customer_last_name",
            BookingField::Phone => "customer_phone",
            BookingField::BookingDateTime => "booking_date_time",
            BookingField::BookingReason => "booking_reason",
        }
    }

    /// Fixed label used in "missing fields" narration.
    pub fn label(&self) -> &'static str {
        match self {
            BookingField::FirstName => "first name",
            BookingField::LastName => "last name",
            BookingField::Phone => "phone number",
            BookingField::BookingDateTime => "appointment date/time",
            BookingField::BookingReason => "reason for visit",
        }
    }
}

/// Hand-off failures. An unknown target is fail-safe: the record is left
/// untouched and the previous persona keeps governing the conversation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandoffError {
    #[error("persona '{0}' is not registered")]
    UnknownPersona(String),
    #[error("no entry persona has been activated")]
    NoActivePersona,
}

/// Mutable state for one active call.
#[derive(Debug, Clone, Default)]
pub struct SessionRecord {
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
    booking_date_time: Option<String>,
    booking_reason: Option<String>,
    detected_language: Option<Language>,
    confirmation_sent: bool,
    personas: Vec<String>,
    current_persona: Option<String>,
    previous_persona: Option<String>,
}

impl SessionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a persona name. Registration happens once at call start;
    /// the set is never mutated afterwards.
    pub fn register_persona(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.personas.iter().any(|p| *p == name) {
            self.personas.push(name);
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.personas.iter().any(|p| p == name)
    }

    /// Registered persona names, in registration order.
    pub fn personas(&self) -> &[String] {
        &self.personas
    }

    /// Activate the entry persona. Fails if the name was never registered,
    /// preserving the invariant that the current pointer is always a
    /// registered name.
    pub fn activate_entry(&mut self, name: &str) -> Result<(), HandoffError> {
        if !self.is_registered(name) {
            return Err(HandoffError::UnknownPersona(name.to_string()));
        }
        self.current_persona = Some(name.to_string());
        Ok(())
    }

    /// Atomically switch the active persona.
    ///
    /// On an unknown target nothing is mutated and the error is returned so
    /// the caller can log it; the conversation continues under the previous
    /// persona. On success `previous_persona` captures the prior value and
    /// the change is visible to the very next turn's dispatch.
    pub fn transfer(&mut self, target: &str) -> Result<(), HandoffError> {
        if !self.is_registered(target) {
            return Err(HandoffError::UnknownPersona(target.to_string()));
        }
        let prior = self
            .current_persona
            .take()
            .ok_or(HandoffError::NoActivePersona)?;
        self.previous_persona = Some(prior);
        self.current_persona = Some(target.to_string());
        Ok(())
    }

    pub fn current_persona(&self) -> Option<&str> {
        self.current_persona.as_deref()
    }

    pub fn previous_persona(&self) -> Option<&str> {
        self.previous_persona.as_deref()
    }

    /// Overwrite a booking field. Last write wins; no validation is applied
    /// (the policy layer handles malformed input conversationally).
    pub fn set_field(&mut self, field: BookingField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    pub fn field(&self, field: BookingField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Clear a field for re-collection (denied phone verification).
    pub fn clear_field(&mut self, field: BookingField) {
        *self.slot_mut(field) = None;
    }

    fn slot(&self, field: BookingField) -> &Option<String> {
        match field {
            BookingField::FirstName => &self.first_name,
            BookingField::LastName => &self.last_name,
            BookingField::Phone => &self.phone,
            BookingField::BookingDateTime => &self.booking_date_time,
            BookingField::BookingReason => &self.booking_reason,
        }
    }

    fn slot_mut(&mut self, field: BookingField) -> &mut Option<String> {
        match field {
            BookingField::FirstName => &mut self.first_name,
            BookingField::LastName => &mut self.last_name,
            BookingField::Phone => &mut self.phone,
            BookingField::BookingDateTime => &mut self.booking_date_time,
            BookingField::BookingReason => &mut self.booking_reason,
        }
    }

    /// Record the detected language. First write wins: the language is
    /// chosen at most once per call and is immutable afterwards. Returns
    /// whether this call set it.
    pub fn set_detected_language(&mut self, language: Language) -> bool {
        if self.detected_language.is_some() {
            return false;
        }
        self.detected_language = Some(language);
        true
    }

    pub fn detected_language(&self) -> Option<Language> {
        self.detected_language
    }

    /// Whether the confirmation notification has already been attempted.
    pub fn confirmation_sent(&self) -> bool {
        self.confirmation_sent
    }

    /// Mark the confirmation notification as attempted. One attempt per
    /// call, successful or not; failed sends are surfaced, not retried.
    pub fn mark_confirmation_sent(&mut self) {
        self.confirmation_sent = true;
    }

    /// Completion gate: true iff every required field is set to a
    /// non-whitespace value.
    pub fn is_complete(&self) -> bool {
        BookingField::ALL
            .iter()
            .all(|f| matches!(self.field(*f), Some(v) if !v.trim().is_empty()))
    }

    /// Required fields still missing, in collection order.
    pub fn missing_fields(&self) -> Vec<BookingField> {
        BookingField::ALL
            .iter()
            .copied()
            .filter(|f| !matches!(self.field(*f), Some(v) if !v.trim().is_empty()))
            .collect()
    }

    /// Human-readable YAML snapshot, emitted to the diagnostic stream after
    /// every field mutation for after-the-fact reconstruction of the call's
    /// data trail. Unset values render as "unknown".
    pub fn summarize(&self) -> String {
        let mut data = BTreeMap::new();
        for field in BookingField::ALL {
            data.insert(field.key(), self.field(field).unwrap_or("unknown"));
        }
        let language = self
            .detected_language
            .map(|l| l.as_str())
            .unwrap_or("unknown");
        data.insert("detected_language", language);
        data.insert("current_agent", self.current_persona().unwrap_or("unknown"));
        serde_yaml::to_string(&data).unwrap_or_else(|_| "snapshot unavailable".to_string())
    }
}
