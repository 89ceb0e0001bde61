//! Session domain model

use serde::Serialize;

use super::User;

/// Whether mutating actions are currently allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

/// The two mutually exclusive presentation modes
///
/// `Staff` shows the user-info control (with logout), `Student` shows the
/// login control. Exactly one of the two is visible at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UiMode {
    Staff,
    Student,
}

impl UiMode {
    pub fn login_control_visible(self) -> bool {
        self == UiMode::Student
    }

    pub fn user_info_visible(self) -> bool {
        self == UiMode::Staff
    }
}

/// Current authentication state
///
/// The token and the user are set and cleared together, so a user is
/// present exactly when a validated token is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: impl Into<String>, user: User) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn state(&self) -> SessionState {
        if self.is_authenticated() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    pub fn mode(&self) -> UiMode {
        match self.state() {
            SessionState::Authenticated => UiMode::Staff,
            SessionState::Anonymous => UiMode::Student,
        }
    }
}
