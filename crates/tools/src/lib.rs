//! Booking tools for the clinic voice agent
//!
//! The [`Tool`] trait is the invocation surface the policy function sees:
//! named operations with JSON-schema argument descriptions. Every tool
//! receives an explicit [`ToolContext`] with the call's session record and
//! the telephony services; nothing here reaches for global state, and no
//! tool-level failure propagates past the tool boundary.

pub mod booking;
pub mod collect;
pub mod info;
pub mod tool;
pub mod transfer;
pub mod verify;

pub use booking::{CheckBookingCompleteTool, EndCallTool, SendConfirmationSmsTool};
pub use collect::SetFieldTool;
pub use info::{ClinicInfoTool, CurrentDatetimeTool};
pub use tool::{
    InputSchema, PropertySchema, Tool, ToolContext, ToolError, ToolOutput, ToolSchema,
};
pub use transfer::DetectLanguageAndTransferTool;
pub use verify::{ConfirmPhoneVerificationTool, VerifyPhoneTool};
