//! Multi-agent booking orchestration for the clinic voice agent
//!
//! The one subsystem with real control flow: a call starts on the greeting
//! persona, the language-detection tool hands the conversation to the
//! matching booking persona, and the session dispatcher tracks the active
//! persona, the previous persona, and the accumulated booking fields across
//! that hand-off.
//!
//! The speech pipeline and the language model are external collaborators:
//! whatever drives this crate reads [`BookingSession::available_tools`],
//! decides which tool to invoke each turn, and narrates from the returned
//! [`TurnOutcome`].

pub mod persona;
pub mod session;

pub use persona::{build_registry, AgentPersona, PersonaRegistry};
pub use session::{
    BookingSession, DispatchError, HandoffAnnouncement, SessionError, TurnOutcome,
};
