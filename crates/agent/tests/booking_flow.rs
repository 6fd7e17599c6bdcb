//! End-to-end booking flow scenarios
//!
//! Drives `BookingSession` the way the policy function would: tool
//! invocations only, asserting on session state, hand-off announcements,
//! and the notification side effects.

use std::sync::Arc;

use serde_json::json;

use clinic_agent_agent::BookingSession;
use clinic_agent_config::{ClinicConfig, DetectionConfig, PersonasConfig};
use clinic_agent_core::{BookingField, Language};
use clinic_agent_telephony::{SimulatedCallControl, SimulatedSmsService};

struct Harness {
    session: BookingSession,
    sms: Arc<SimulatedSmsService>,
    call: Arc<SimulatedCallControl>,
}

fn multi_agent_harness() -> Harness {
    let sms = Arc::new(SimulatedSmsService::new());
    let call = Arc::new(SimulatedCallControl::new());
    let session = BookingSession::from_configs(
        &PersonasConfig::default(),
        Arc::new(ClinicConfig::default()),
        Arc::new(DetectionConfig::default()),
    )
    .unwrap()
    .with_sms(sms.clone())
    .with_call(call.clone());
    Harness { session, sms, call }
}

#[tokio::test]
async fn french_caller_is_handed_to_french_booking_agent_once() {
    let mut h = multi_agent_harness();
    assert_eq!(h.session.record().current_persona(), Some("greeting_agent"));

    let outcome = h
        .session
        .dispatch_tool(
            "detect_language_and_transfer",
            json!({"user_response": "bonjour, je voudrais un rendez-vous"}),
        )
        .await
        .unwrap();

    assert_eq!(outcome.reply, "Transferred to French agent");
    let handoff = outcome.handoff.expect("hand-off expected");
    assert_eq!(handoff.from, "greeting_agent");
    assert_eq!(handoff.to, "french_booking_agent");
    assert!(handoff.greeting_line.starts_with("Parfait !"));

    let record = h.session.record();
    assert_eq!(record.detected_language(), Some(Language::French));
    assert_eq!(record.current_persona(), Some("french_booking_agent"));
    assert_eq!(record.previous_persona(), Some("greeting_agent"));

    // The greeting persona no longer governs, so the detection tool is not
    // reachable again: the transition fires at most once per call.
    let err = h
        .session
        .dispatch_tool(
            "detect_language_and_transfer",
            json!({"user_response": "hello"}),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        clinic_agent_agent::DispatchError::UnknownTool { .. }
    ));
    assert_eq!(
        h.session.record().current_persona(),
        Some("french_booking_agent")
    );
}

#[tokio::test]
async fn english_caller_is_handed_to_english_booking_agent() {
    let mut h = multi_agent_harness();

    let outcome = h
        .session
        .dispatch_tool(
            "detect_language_and_transfer",
            json!({"user_response": "hello, I would like to book an appointment"}),
        )
        .await
        .unwrap();

    assert_eq!(outcome.reply, "Transferred to English agent");
    assert_eq!(
        h.session.record().current_persona(),
        Some("english_booking_agent")
    );
}

#[tokio::test]
async fn tool_schemas_follow_the_active_persona() {
    let mut h = multi_agent_harness();

    let before: Vec<String> = h
        .session
        .available_tools()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(before, vec!["detect_language_and_transfer"]);

    h.session
        .dispatch_tool(
            "detect_language_and_transfer",
            json!({"user_response": "bonjour merci"}),
        )
        .await
        .unwrap();

    // The very next turn sees the booking toolset.
    let after: Vec<String> = h
        .session
        .available_tools()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert!(after.contains(&"set_first_name".to_string()));
    assert!(after.contains(&"check_booking_complete".to_string()));
}

#[tokio::test]
async fn complete_booking_sends_one_sms_and_ends_the_call() {
    let mut h = multi_agent_harness();
    h.session
        .dispatch_tool(
            "detect_language_and_transfer",
            json!({"user_response": "hello, I need an appointment"}),
        )
        .await
        .unwrap();

    // Fields arrive in an arbitrary order.
    for (tool, args) in [
        ("set_booking_reason", json!({"reason": "annual cleaning"})),
        ("set_first_name", json!({"name": "Marie"})),
        ("set_phone", json!({"phone": "514 585 9691"})),
        ("set_last_name", json!({"name": "Tremblay"})),
        (
            "set_booking_date_time",
            json!({"date_time": "Tuesday, June 3 at 10:00 AM"}),
        ),
    ] {
        let outcome = h.session.dispatch_tool(tool, args).await.unwrap();
        assert!(outcome.handoff.is_none());
    }

    let outcome = h
        .session
        .dispatch_tool("check_booking_complete", json!({}))
        .await
        .unwrap();
    assert!(outcome.reply.starts_with("Booking is complete"));
    assert_eq!(h.sms.sent_count(), 1);

    let (to, body) = h.sms.sent().pop().unwrap();
    assert_eq!(to, "+15145859691");
    assert!(body.contains("Date: Tuesday, June 3 at 10:00 AM"));

    // Re-checking the gate never produces a second notification.
    h.session
        .dispatch_tool("check_booking_complete", json!({}))
        .await
        .unwrap();
    assert_eq!(h.sms.sent_count(), 1);

    let outcome = h.session.dispatch_tool("end_call", json!({})).await.unwrap();
    assert_eq!(outcome.reply, "Call ended successfully");
    assert_eq!(h.call.hang_up_count(), 1);
}

#[tokio::test]
async fn incomplete_booking_names_the_missing_fields() {
    let mut h = multi_agent_harness();
    h.session
        .dispatch_tool(
            "detect_language_and_transfer",
            json!({"user_response": "hello there"}),
        )
        .await
        .unwrap();
    h.session
        .dispatch_tool("set_first_name", json!({"name": "Marie"}))
        .await
        .unwrap();

    let outcome = h
        .session
        .dispatch_tool("check_booking_complete", json!({}))
        .await
        .unwrap();
    assert_eq!(
        outcome.reply,
        "Booking incomplete. Missing: last name, phone number, appointment date/time, \
         reason for visit"
    );
    assert_eq!(h.sms.sent_count(), 0);
}

#[tokio::test]
async fn inbound_call_with_room_phone_verifies_last_four_digits() {
    let sms = Arc::new(SimulatedSmsService::new());
    let mut session = BookingSession::from_configs(
        &PersonasConfig::single_agent(),
        Arc::new(ClinicConfig::default()),
        Arc::new(DetectionConfig::default()),
    )
    .unwrap()
    .with_sms(sms)
    .with_room_name("call-_+15145859691_yZ35TYo5aNjy");

    assert_eq!(
        session.record().field(BookingField::Phone),
        Some("+15145859691")
    );

    let outcome = session
        .dispatch_tool("verify_phone_last_four_digits", json!({}))
        .await
        .unwrap();
    assert!(outcome.reply.contains("ending in 9691"));

    // The caller denies; the number is cleared for digit-by-digit
    // re-collection.
    session
        .dispatch_tool("confirm_phone_verification", json!({"confirmed": false}))
        .await
        .unwrap();
    assert_eq!(session.record().field(BookingField::Phone), None);

    let outcome = session
        .dispatch_tool("set_phone", json!({"phone": "1 514 585 9691"}))
        .await
        .unwrap();
    assert_eq!(outcome.reply, "The phone number is updated to +15145859691");
}

#[tokio::test]
async fn single_agent_configuration_never_hands_off() {
    let mut session = BookingSession::from_configs(
        &PersonasConfig::single_agent(),
        Arc::new(ClinicConfig::default()),
        Arc::new(DetectionConfig::default()),
    )
    .unwrap();

    assert_eq!(session.record().current_persona(), Some("main_agent"));

    let outcome = session
        .dispatch_tool("set_first_name", json!({"name": "Marie"}))
        .await
        .unwrap();
    assert!(outcome.handoff.is_none());
    assert_eq!(session.record().previous_persona(), None);
}
