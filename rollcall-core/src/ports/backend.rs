//! Activity backend port - the sign-up REST API

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::result::Result;
use crate::domain::{Roster, User};

/// Login form contents
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Successful login response
#[derive(Debug, Clone, Deserialize)]
pub struct LoginGrant {
    pub token: String,
    pub user: User,
}

/// Activity backend abstraction
///
/// Every method maps to exactly one HTTP request. Non-2xx responses come
/// back as `Error::Server`, requests that never completed (or whose body
/// could not be read) as `Error::Transport`.
#[async_trait]
pub trait ActivityBackend: Send + Sync {
    /// `GET /activities` (no credentials)
    async fn list_activities(&self) -> Result<Roster>;

    /// `GET /auth/me`
    ///
    /// `Ok(None)` when the server answered 2xx but did not recognise the
    /// token.
    async fn current_user(&self, token: &str) -> Result<Option<User>>;

    /// `POST /auth/login`
    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant>;

    /// `POST /auth/logout`
    async fn logout(&self, token: &str) -> Result<()>;

    /// `POST /activities/{activity}/signup?email={email}`, returns the server's message
    async fn sign_up(&self, token: &str, activity: &str, email: &str) -> Result<String>;

    /// `DELETE /activities/{activity}/unregister?email={email}`, returns the server's message
    async fn unregister(&self, token: &str, activity: &str, email: &str) -> Result<String>;
}
