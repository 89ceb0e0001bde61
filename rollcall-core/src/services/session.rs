//! Session manager - authentication state and the persisted token

use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::result::{Error, Result};
use crate::domain::{Session, SessionState, User};
use crate::ports::{ActivityBackend, Credentials, TokenStore, View};
use crate::services::logging::{record, LogEvent, LoggingService};

/// Shown in the login prompt when the server gave no detail
pub const LOGIN_FAILED: &str = "Login failed";
/// Shown in the login prompt when the request never completed
pub const LOGIN_RETRY: &str = "Login failed. Please try again.";

/// Owns the `Session` and keeps the view's mode in line with it
pub struct SessionManager {
    backend: Arc<dyn ActivityBackend>,
    tokens: Arc<dyn TokenStore>,
    view: Arc<dyn View>,
    logger: Option<Arc<LoggingService>>,
    session: Mutex<Session>,
}

impl SessionManager {
    pub fn new(
        backend: Arc<dyn ActivityBackend>,
        tokens: Arc<dyn TokenStore>,
        view: Arc<dyn View>,
        logger: Option<Arc<LoggingService>>,
    ) -> Self {
        Self {
            backend,
            tokens,
            view,
            logger,
            session: Mutex::new(Session::anonymous()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        // Session is replaced whole, so a poisoned value is still consistent
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, event: LogEvent) {
        record(self.logger.as_deref(), event);
    }

    /// Validate the persisted token, if any, against the server.
    ///
    /// Fails closed: anything but a 2xx carrying a user discards the token
    /// and leaves the session anonymous, as does an unreadable token file.
    /// With no persisted token nothing is sent and the session is left as
    /// it is.
    pub async fn restore_session(&self) -> SessionState {
        let token = match self.tokens.load() {
            Ok(token) => token,
            Err(e) => {
                self.fail_restore(e.to_string(), None);
                None
            }
        };

        if let Some(token) = token {
            match self.backend.current_user(&token).await {
                Ok(Some(user)) => {
                    *self.lock() = Session::authenticated(token, user);
                    self.record(LogEvent::new("session_restored"));
                }
                Ok(None) => self.fail_restore("Token not recognised".to_string(), None),
                Err(e) => self.fail_restore(e.to_string(), e.status()),
            }
        }

        self.sync_view();
        self.state()
    }

    fn fail_restore(&self, reason: String, status: Option<u16>) {
        let mut event = LogEvent::new("session_restore_failed").with_error(reason);
        if let Some(status) = status {
            event = event.with_error_details(format!("HTTP {}", status));
        }
        self.record(event);

        if let Err(e) = self.tokens.clear() {
            self.record(LogEvent::new("session_restore_failed").with_error(e.to_string()));
        }
        *self.lock() = Session::anonymous();
    }

    /// Exchange credentials for a token.
    ///
    /// On failure the message goes to the login prompt's error line and the
    /// previous session (and persisted token) are left untouched.
    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        let credentials = Credentials::new(username, password);

        let grant = match self.backend.login(&credentials).await {
            Ok(grant) => grant,
            Err(e) => {
                let message = match &e {
                    Error::Server { .. } => e.detail().unwrap_or(LOGIN_FAILED),
                    _ => LOGIN_RETRY,
                };
                self.view.show_login_error(message);

                let mut event = LogEvent::new("login_failed").with_error(message);
                if let Some(status) = e.status() {
                    event = event.with_error_details(format!("HTTP {}", status));
                }
                self.record(event);
                return Err(e);
            }
        };

        let mut event = LogEvent::new("login_succeeded");
        if let Err(e) = self.tokens.save(&grant.token) {
            // Still logged in for this process, just not after a restart
            event = event.with_error(e.to_string());
        }
        self.record(event);

        let user = grant.user.clone();
        *self.lock() = Session::authenticated(grant.token, grant.user);
        self.sync_view();
        self.view.close_login_prompt();
        self.view.hide_login_error();

        Ok(user)
    }

    /// Best-effort server logout, then unconditionally forget the session
    pub async fn logout(&self) {
        let token = self.token();
        if let Some(token) = token {
            if let Err(e) = self.backend.logout(&token).await {
                self.record(LogEvent::new("logout_notify_failed").with_error(e.to_string()));
            }
        }

        if let Err(e) = self.tokens.clear() {
            self.record(LogEvent::new("logout_notify_failed").with_error(e.to_string()));
        }
        *self.lock() = Session::anonymous();
        self.record(LogEvent::new("logged_out"));
        self.sync_view();
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated()
    }

    pub fn current_user(&self) -> Option<User> {
        self.lock().user().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.lock().token().map(str::to_string)
    }

    pub fn state(&self) -> SessionState {
        self.lock().state()
    }

    /// Snapshot of the whole session
    pub fn session(&self) -> Session {
        self.lock().clone()
    }

    /// Push the current mode (and user, in staff mode) to the view
    pub fn sync_view(&self) {
        let session = self.session();
        self.view.set_mode(session.mode(), session.user());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::HttpBackend;
    use crate::adapters::mock_server::{MockActivityServer, MockConfig};
    use crate::adapters::recording::RecordingView;
    use crate::adapters::token_store::{FileTokenStore, MemoryTokenStore};
    use crate::domain::UiMode;

    struct Fixture {
        server: MockActivityServer,
        tokens: Arc<MemoryTokenStore>,
        view: Arc<RecordingView>,
        manager: SessionManager,
    }

    fn fixture(tokens: MemoryTokenStore) -> Fixture {
        let server = MockActivityServer::start(MockConfig::default()).unwrap();
        let backend = Arc::new(HttpBackend::new(&server.base_url(), None).unwrap());
        let tokens = Arc::new(tokens);
        let view = Arc::new(RecordingView::new());
        let manager = SessionManager::new(backend, tokens.clone(), view.clone(), None);
        Fixture {
            server,
            tokens,
            view,
            manager,
        }
    }

    #[tokio::test]
    async fn test_restore_without_token_sends_nothing() {
        let f = fixture(MemoryTokenStore::new());

        assert_eq!(f.manager.restore_session().await, SessionState::Anonymous);
        assert_eq!(f.manager.restore_session().await, SessionState::Anonymous);

        assert_eq!(f.server.request_count(), 0);
        assert_eq!(f.view.state().mode, UiMode::Student);
    }

    #[tokio::test]
    async fn test_restore_with_valid_token() {
        let f = fixture(MemoryTokenStore::new());
        let token = f.server.issue_token("teacher");
        f.tokens.save(&token).unwrap();

        assert_eq!(f.manager.restore_session().await, SessionState::Authenticated);

        let requests = f.server.requests_to("GET", "/auth/me");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].bearer.as_deref(), Some(token.as_str()));
        assert_eq!(f.view.state().mode, UiMode::Staff);
        assert_eq!(f.view.state().greeting.as_deref(), Some("Welcome, Ms. Rodriguez"));
    }

    #[tokio::test]
    async fn test_restore_with_unknown_token_fails_closed() {
        let f = fixture(MemoryTokenStore::with_token("expired"));

        assert_eq!(f.manager.restore_session().await, SessionState::Anonymous);
        assert_eq!(f.tokens.load().unwrap(), None);
        assert!(f.manager.token().is_none());
        assert_eq!(f.view.state().mode, UiMode::Student);
    }

    #[tokio::test]
    async fn test_restore_transport_error_fails_closed() {
        let tokens = Arc::new(MemoryTokenStore::with_token("tok"));
        let view = Arc::new(RecordingView::new());
        // Nothing listens on port 9 locally
        let backend = Arc::new(HttpBackend::new("http://127.0.0.1:9", None).unwrap());
        let manager = SessionManager::new(backend, tokens.clone(), view.clone(), None);

        assert_eq!(manager.restore_session().await, SessionState::Anonymous);
        assert_eq!(tokens.load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_restore_unreadable_token_file_is_discarded() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let token_path = temp_dir.path().join("auth_token");
        std::fs::write(&token_path, [0xff, 0xfe, 0x00, 0x41]).unwrap();

        let tokens = Arc::new(FileTokenStore::in_dir(temp_dir.path()));
        let view = Arc::new(RecordingView::new());
        let backend = Arc::new(HttpBackend::new("http://127.0.0.1:9", None).unwrap());
        let manager = SessionManager::new(backend, tokens.clone(), view.clone(), None);

        assert_eq!(manager.restore_session().await, SessionState::Anonymous);
        assert!(!token_path.exists());
        assert_eq!(tokens.load().unwrap(), None);
        assert!(manager.token().is_none());
        assert_eq!(view.state().mode, UiMode::Student);
    }

    #[tokio::test]
    async fn test_login_success_persists_token() {
        let f = fixture(MemoryTokenStore::new());
        f.view.open_login_prompt();

        let user = f.manager.login("teacher", "secret").await.unwrap();
        assert_eq!(user.name, "Ms. Rodriguez");

        let token = f.tokens.load().unwrap().unwrap();
        assert_eq!(f.manager.token().as_deref(), Some(token.as_str()));
        assert!(f.server.is_session_active(&token));

        let state = f.view.state();
        assert_eq!(state.mode, UiMode::Staff);
        assert!(!state.login_prompt_open);
        assert_eq!(state.login_error, None);
    }

    #[tokio::test]
    async fn test_login_rejected_keeps_previous_state() {
        let f = fixture(MemoryTokenStore::with_token("previous"));

        let err = f.manager.login("teacher", "wrongpass").await.unwrap_err();
        assert_eq!(err.status(), Some(401));

        assert_eq!(f.manager.state(), SessionState::Anonymous);
        assert_eq!(f.tokens.load().unwrap().as_deref(), Some("previous"));
        assert_eq!(f.view.state().login_error.as_deref(), Some("Invalid credentials"));
    }

    #[tokio::test]
    async fn test_login_transport_error_message() {
        let view = Arc::new(RecordingView::new());
        let backend = Arc::new(HttpBackend::new("http://127.0.0.1:9", None).unwrap());
        let manager =
            SessionManager::new(backend, Arc::new(MemoryTokenStore::new()), view.clone(), None);

        assert!(manager.login("teacher", "secret").await.is_err());
        assert_eq!(view.state().login_error.as_deref(), Some(LOGIN_RETRY));
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_server_fails() {
        let server = MockActivityServer::start(MockConfig {
            fail_logout: true,
            ..Default::default()
        })
        .unwrap();
        let backend = Arc::new(HttpBackend::new(&server.base_url(), None).unwrap());
        let tokens = Arc::new(MemoryTokenStore::new());
        let view = Arc::new(RecordingView::new());
        let manager = SessionManager::new(backend, tokens.clone(), view.clone(), None);

        manager.login("teacher", "secret").await.unwrap();
        manager.logout().await;

        assert_eq!(server.requests_to("POST", "/auth/logout").len(), 1);
        assert_eq!(manager.state(), SessionState::Anonymous);
        assert_eq!(tokens.load().unwrap(), None);
        assert_eq!(view.state().mode, UiMode::Student);
        assert_eq!(view.state().greeting, None);
    }

    #[tokio::test]
    async fn test_logout_when_anonymous_sends_nothing() {
        let f = fixture(MemoryTokenStore::new());
        f.manager.logout().await;
        assert_eq!(f.server.request_count(), 0);
    }
}
