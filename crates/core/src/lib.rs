//! Core types for the clinic voice booking agent
//!
//! Provides the per-call session record, the booking field schema, phone
//! number normalization, and the room-name phone extraction used to
//! pre-populate inbound calls. One `SessionRecord` exists per active call
//! and is never shared across calls.

pub mod language;
pub mod phone;
pub mod session;

pub use language::Language;
pub use phone::{extract_phone_from_room_name, format_phone_number};
pub use session::{BookingField, HandoffError, SessionRecord};
