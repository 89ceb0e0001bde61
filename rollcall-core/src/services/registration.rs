//! Registration service - sign-up and unregister, gated on the session

use std::sync::Arc;

use crate::domain::result::Error;
use crate::domain::StatusMessage;
use crate::ports::{ActivityBackend, View};
use crate::services::logging::{record, LogEvent, LoggingService};
use crate::services::{RosterService, SessionManager, StatusArea};

/// Text of `Error::NotAuthenticated`, shown instead of sending anything
/// while logged out
pub const LOGIN_REQUIRED: &str = "Please login to manage registrations";
/// Shown when the server refused without a detail
pub const GENERIC_FAILURE: &str = "An error occurred";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationAction {
    SignUp,
    Unregister,
}

impl RegistrationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationAction::SignUp => "signup",
            RegistrationAction::Unregister => "unregister",
        }
    }

    /// Message for a request that never completed
    fn transport_failure(&self) -> &'static str {
        match self {
            RegistrationAction::SignUp => "Failed to sign up. Please try again.",
            RegistrationAction::Unregister => "Failed to unregister. Please try again.",
        }
    }

    fn event(&self, succeeded: bool) -> &'static str {
        match (self, succeeded) {
            (RegistrationAction::SignUp, true) => "signup_succeeded",
            (RegistrationAction::SignUp, false) => "signup_failed",
            (RegistrationAction::Unregister, true) => "unregister_succeeded",
            (RegistrationAction::Unregister, false) => "unregister_failed",
        }
    }
}

pub struct RegistrationService {
    backend: Arc<dyn ActivityBackend>,
    session: Arc<SessionManager>,
    roster: Arc<RosterService>,
    status: StatusArea,
    view: Arc<dyn View>,
    logger: Option<Arc<LoggingService>>,
}

impl RegistrationService {
    pub fn new(
        backend: Arc<dyn ActivityBackend>,
        session: Arc<SessionManager>,
        roster: Arc<RosterService>,
        status: StatusArea,
        view: Arc<dyn View>,
        logger: Option<Arc<LoggingService>>,
    ) -> Self {
        Self {
            backend,
            session,
            roster,
            status,
            view,
            logger,
        }
    }

    /// Register `email` for `activity`. Returns the status message shown.
    pub async fn sign_up(&self, email: &str, activity: &str) -> StatusMessage {
        self.run(RegistrationAction::SignUp, email, activity).await
    }

    /// Remove `email` from `activity`. Returns the status message shown.
    pub async fn unregister(&self, email: &str, activity: &str) -> StatusMessage {
        self.run(RegistrationAction::Unregister, email, activity).await
    }

    async fn run(&self, action: RegistrationAction, email: &str, activity: &str) -> StatusMessage {
        let token = match self.session.token() {
            Some(token) if self.session.is_authenticated() => token,
            _ => return self.status.show(StatusMessage::error(Error::NotAuthenticated.to_string())),
        };

        let outcome = match action {
            RegistrationAction::SignUp => self.backend.sign_up(&token, activity, email).await,
            RegistrationAction::Unregister => self.backend.unregister(&token, activity, email).await,
        };

        match outcome {
            Ok(message) => {
                let shown = self.status.show(StatusMessage::success(message));
                if action == RegistrationAction::SignUp {
                    self.view.reset_signup_form();
                }
                record(
                    self.logger.as_deref(),
                    LogEvent::new(action.event(true))
                        .with_command(action.as_str())
                        .with_activity(activity),
                );

                self.roster.refresh().await;
                shown
            }
            Err(e) => {
                let text = match &e {
                    Error::Server { .. } => e.detail().unwrap_or(GENERIC_FAILURE),
                    _ => action.transport_failure(),
                };

                let mut event = LogEvent::new(action.event(false))
                    .with_command(action.as_str())
                    .with_activity(activity)
                    .with_error(e.to_string());
                if let Some(status) = e.status() {
                    event = event.with_error_details(format!("HTTP {}", status));
                }
                record(self.logger.as_deref(), event);

                self.status.show(StatusMessage::error(text))
            }
        }
    }
}
