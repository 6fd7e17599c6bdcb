//! Telephony boundary for the clinic voice agent
//!
//! External notification and termination services, consumed by the tool
//! layer behind traits so tests run against simulated implementations:
//!
//! - [`SmsService`] — outbound confirmation SMS. [`TwilioSmsService`] talks
//!   to the Twilio REST API with credentials from the environment;
//!   [`SimulatedSmsService`] records sends for tests.
//! - [`CallControl`] — hanging up the live call after closing narration.
//!
//! Failures here never crash a live call: the tool layer converts every
//! error into a narration-friendly string.

pub mod call;
pub mod error;
pub mod sms;

pub use call::{CallControl, NoopCallControl, SimulatedCallControl};
pub use error::TelephonyError;
pub use sms::{SimulatedSmsService, SmsReceipt, SmsService, TwilioSmsService};
