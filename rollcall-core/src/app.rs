//! The controller: wires the session, roster and registration services to
//! UI events.
//!
//! Handlers take `&self` and hold no lock across an `.await`, so a view may
//! run several of them at once. Nothing is serialized or de-duplicated; two
//! sign-ups for the same student both reach the server and both results are
//! shown in arrival order.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::form;
use crate::domain::result::Result;
use crate::domain::{Roster, SessionState, StatusMessage, User};
use crate::ports::{ActivityBackend, TokenStore, View};
use crate::services::{
    LoggingService, RegistrationService, RosterService, SessionManager, StatusArea,
    STATUS_DISMISS_AFTER,
};

/// Tunables for `App`
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub status_dismiss_after: Duration,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            status_dismiss_after: STATUS_DISMISS_AFTER,
        }
    }
}

/// Abstract UI events, independent of how they were produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    OpenLoginPrompt,
    CloseLoginPrompt,
    SubmitLogin { username: String, password: String },
    Logout,
    SubmitSignup { email: String, activity: String },
    RemoveParticipant { activity: String, email: String },
    Refresh,
}

pub struct App {
    session: Arc<SessionManager>,
    roster: Arc<RosterService>,
    registration: RegistrationService,
    view: Arc<dyn View>,
}

impl App {
    pub fn new(
        backend: Arc<dyn ActivityBackend>,
        tokens: Arc<dyn TokenStore>,
        view: Arc<dyn View>,
        settings: AppSettings,
        logger: Option<Arc<LoggingService>>,
    ) -> Self {
        let session = Arc::new(SessionManager::new(
            Arc::clone(&backend),
            tokens,
            Arc::clone(&view),
            logger.clone(),
        ));
        let roster = Arc::new(RosterService::new(
            Arc::clone(&backend),
            Arc::clone(&view),
            logger.clone(),
        ));
        let status = StatusArea::new(Arc::clone(&view), settings.status_dismiss_after);
        let registration = RegistrationService::new(
            backend,
            Arc::clone(&session),
            Arc::clone(&roster),
            status,
            Arc::clone(&view),
            logger,
        );

        Self {
            session,
            roster,
            registration,
            view,
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn roster(&self) -> &RosterService {
        &self.roster
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Restore the session, then load the roster
    pub async fn initialize(&self) -> SessionState {
        let state = self.session.restore_session().await;
        self.roster.refresh().await;
        state
    }

    pub fn open_login_prompt(&self) {
        self.view.open_login_prompt();
    }

    pub fn close_login_prompt(&self) {
        self.view.close_login_prompt();
        self.view.hide_login_error();
    }

    /// Both fields are required; the request is not sent otherwise
    pub async fn submit_login(&self, username: &str, password: &str) -> Result<User> {
        form::require("Username", username)?;
        form::require("Password", password)?;
        self.session.login(username, password).await
    }

    pub async fn click_logout(&self) {
        self.session.logout().await;
    }

    /// Sign-up form submit. Malformed input is rejected before the
    /// login gate, the way a browser refuses to submit the form.
    pub async fn submit_signup(&self, email: &str, activity: &str) -> Result<StatusMessage> {
        let email = email.trim();
        form::validate_email(email)?;
        form::require("Activity", activity)?;
        Ok(self.registration.sign_up(email, activity).await)
    }

    /// Removal affordance on a participant row
    pub async fn click_remove_participant(&self, activity: &str, email: &str) -> StatusMessage {
        self.registration.unregister(email, activity).await
    }

    pub async fn refresh(&self) -> Option<Roster> {
        self.roster.refresh().await
    }

    pub async fn dispatch(&self, event: UiEvent) -> Result<()> {
        match event {
            UiEvent::OpenLoginPrompt => self.open_login_prompt(),
            UiEvent::CloseLoginPrompt => self.close_login_prompt(),
            UiEvent::SubmitLogin { username, password } => {
                self.submit_login(&username, &password).await?;
            }
            UiEvent::Logout => self.click_logout().await,
            UiEvent::SubmitSignup { email, activity } => {
                self.submit_signup(&email, &activity).await?;
            }
            UiEvent::RemoveParticipant { activity, email } => {
                self.click_remove_participant(&activity, &email).await;
            }
            UiEvent::Refresh => {
                self.refresh().await;
            }
        }
        Ok(())
    }
}
