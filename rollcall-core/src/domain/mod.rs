//! Core domain entities
//!
//! Pure data structures and checks - no I/O or external dependencies.

mod activity;
pub mod form;
pub mod result;
mod session;
mod status;
mod user;

pub use activity::{Activity, ActivityCard, ParticipantRow, Roster, NO_PARTICIPANTS};
pub use session::{Session, SessionState, UiMode};
pub use status::{StatusKind, StatusMessage};
pub use user::User;
