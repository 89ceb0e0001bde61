//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on one concern of the controller.

pub mod logging;
mod registration;
mod roster;
mod session;
mod status;

pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use registration::{RegistrationAction, RegistrationService, GENERIC_FAILURE, LOGIN_REQUIRED};
pub use roster::{RosterService, ROSTER_LOAD_FAILED};
pub use session::{SessionManager, LOGIN_FAILED, LOGIN_RETRY};
pub use status::{StatusArea, STATUS_DISMISS_AFTER};
