//! Process-wide session state.
//!
//! [`Session`] is the only writer of [`SessionState`]. Readers subscribe to a
//! `watch` channel for the current state and to a broadcast channel for
//! transitions such as a forced logout.

mod session;
mod state;

pub use session::Session;
pub use state::{SessionEvent, SessionState};
