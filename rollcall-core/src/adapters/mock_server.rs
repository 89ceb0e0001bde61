//! Mock activity API server for testing
//!
//! A small HTTP/1.1 server on a random local port that behaves like the
//! sign-up backend:
//! - GET /activities returns the roster as a JSON object
//! - GET /auth/me returns the user for a known bearer token, `null` otherwise
//! - POST /auth/login returns { token, user } or 401 { detail }
//! - POST /auth/logout drops the session
//! - POST /activities/{name}/signup?email=... and
//!   DELETE /activities/{name}/unregister?email=... mutate the roster
//!
//! Every request is recorded so tests can assert what was (not) sent.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use percent_encoding::percent_decode_str;
use serde_json::json;

use crate::domain::{Activity, Roster, User};

/// Configuration for the mock backend
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// (username, password, display name)
    pub teachers: Vec<(String, String, String)>,
    pub activities: Roster,
    /// Answer GET /activities with a 500
    pub fail_activities: bool,
    /// Answer GET /activities with a 200 whose body is not an activity map
    pub malformed_activities: bool,
    /// Answer POST /auth/logout with a 500
    pub fail_logout: bool,
    /// Delay in milliseconds before responding
    pub delay_ms: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            teachers: vec![(
                "teacher".to_string(),
                "secret".to_string(),
                "Ms. Rodriguez".to_string(),
            )],
            activities: Roster::new(vec![
                Activity::new("Chess Club", 12)
                    .with_description("Learn strategies and compete in chess tournaments")
                    .with_schedule("Fridays, 3:30 PM - 5:00 PM")
                    .with_participants(["michael@mergington.edu", "daniel@mergington.edu"]),
                Activity::new("Programming Class", 20)
                    .with_description("Learn programming fundamentals and build software projects")
                    .with_schedule("Tuesdays and Thursdays, 3:30 PM - 4:30 PM")
                    .with_participants(["emma@mergington.edu", "sophia@mergington.edu"]),
                Activity::new("GitHub Skills", 25)
                    .with_description("Learn practical coding and collaboration skills through GitHub")
                    .with_schedule("Mondays, 3:30 PM - 5:00 PM"),
            ]),
            fail_activities: false,
            malformed_activities: false,
            fail_logout: false,
            delay_ms: 0,
        }
    }
}

/// A request as the mock saw it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    /// Percent-decoded path without the query string
    pub path: String,
    pub email: Option<String>,
    pub bearer: Option<String>,
    pub body: String,
}

#[derive(Debug)]
struct MockState {
    config: MockConfig,
    roster: Roster,
    sessions: HashMap<String, User>,
    next_token: u64,
    requests: Vec<RecordedRequest>,
}

impl MockState {
    fn issue_token(&mut self, user: User) -> String {
        self.next_token += 1;
        let token = format!("mock-token-{}", self.next_token);
        self.sessions.insert(token.clone(), user);
        token
    }

    fn teacher(&self, username: &str) -> Option<User> {
        self.config
            .teachers
            .iter()
            .find(|(u, _, _)| u == username)
            .map(|(u, _, name)| User::new(name.clone()).with_username(u.clone()))
    }
}

/// Mock activity server for testing
pub struct MockActivityServer {
    port: u16,
    running: Arc<AtomicBool>,
    state: Arc<Mutex<MockState>>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl MockActivityServer {
    /// Start a new mock server on a random available port
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let state = Arc::new(Mutex::new(MockState {
            roster: config.activities.clone(),
            config,
            sessions: HashMap::new(),
            next_token: 0,
            requests: Vec::new(),
        }));

        // Non-blocking so the accept loop can notice shutdown
        listener.set_nonblocking(true)?;

        let running_clone = Arc::clone(&running);
        let state_clone = Arc::clone(&state);
        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        // Accepted sockets inherit non-blocking mode on some platforms
                        let _ = stream.set_nonblocking(false);
                        let state = Arc::clone(&state_clone);
                        thread::spawn(move || handle_connection(stream, &state));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            state,
            thread_handle: Some(thread_handle),
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// All requests received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.state).requests.len()
    }

    /// Requests matching a method and decoded path
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    /// Create a valid session as if `username` had logged in elsewhere
    pub fn issue_token(&self, username: &str) -> String {
        let mut state = lock(&self.state);
        let user = state
            .teacher(username)
            .unwrap_or_else(|| User::new(username).with_username(username));
        state.issue_token(user)
    }

    pub fn is_session_active(&self, token: &str) -> bool {
        lock(&self.state).sessions.contains_key(token)
    }

    /// The server-side roster
    pub fn roster(&self) -> Roster {
        lock(&self.state).roster.clone()
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockActivityServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock(state: &Mutex<MockState>) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct ParsedRequest {
    method: String,
    path: String,
    query: String,
    headers: HashMap<String, String>,
    body: String,
}

/// Read one request: headers up to the blank line, then Content-Length bytes
fn read_request(stream: &mut TcpStream) -> Option<ParsedRequest> {
    let mut data = Vec::new();
    let mut buffer = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buffer[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..header_end]).to_string();
    let mut lines = head.lines();
    let request_line = lines.next()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_lowercase(), v.trim().to_string()))
        .collect();

    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    while data.len() < header_end + content_length {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buffer[..n]);
    }
    let body_end = (header_end + content_length).min(data.len());
    let body = String::from_utf8_lossy(&data[header_end..body_end]).to_string();

    let (raw_path, query) = match target.split_once('?') {
        Some((p, q)) => (p.to_string(), q.to_string()),
        None => (target, String::new()),
    };

    Some(ParsedRequest {
        method,
        path: percent_decode_str(&raw_path).decode_utf8_lossy().into_owned(),
        query,
        headers,
        body,
    })
}

fn handle_connection(mut stream: TcpStream, state: &Mutex<MockState>) {
    let Some(request) = read_request(&mut stream) else {
        return;
    };

    let email = url::form_urlencoded::parse(request.query.as_bytes())
        .find(|(k, _)| k == "email")
        .map(|(_, v)| v.to_string());
    let bearer = request
        .headers
        .get("authorization")
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    let delay_ms = {
        let mut state = lock(state);
        state.requests.push(RecordedRequest {
            method: request.method.clone(),
            path: request.path.clone(),
            email: email.clone(),
            bearer: bearer.clone(),
            body: request.body.clone(),
        });
        state.config.delay_ms
    };

    if delay_ms > 0 {
        thread::sleep(std::time::Duration::from_millis(delay_ms));
    }

    let (status, body) = route(state, &request, email.as_deref(), bearer.as_deref());
    send_response(&mut stream, status, &body);
}

fn detail(message: &str) -> String {
    json!({ "detail": message }).to_string()
}

fn route(
    state: &Mutex<MockState>,
    request: &ParsedRequest,
    email: Option<&str>,
    bearer: Option<&str>,
) -> (u16, String) {
    let mut state = lock(state);
    let current_user = bearer.and_then(|t| state.sessions.get(t).cloned());
    let segments: Vec<&str> = request.path.trim_start_matches('/').split('/').collect();

    match (request.method.as_str(), segments.as_slice()) {
        ("GET", ["activities"]) => {
            if state.config.fail_activities {
                return (500, detail("Internal Server Error"));
            }
            if state.config.malformed_activities {
                return (200, json!(["Chess Club", "Drama"]).to_string());
            }
            (200, serde_json::to_string(&state.roster).unwrap_or_default())
        }
        ("GET", ["auth", "me"]) => {
            let body = serde_json::to_string(&current_user).unwrap_or_default();
            (200, body)
        }
        ("POST", ["auth", "login"]) => {
            let form: serde_json::Value =
                serde_json::from_str(&request.body).unwrap_or(serde_json::Value::Null);
            let username = form["username"].as_str().unwrap_or_default();
            let password = form["password"].as_str().unwrap_or_default();
            let valid = state
                .config
                .teachers
                .iter()
                .any(|(u, p, _)| u == username && p == password);
            match (valid, state.teacher(username)) {
                (true, Some(user)) => {
                    let token = state.issue_token(user.clone());
                    (200, json!({ "token": token, "user": user }).to_string())
                }
                _ => (401, detail("Invalid credentials")),
            }
        }
        ("POST", ["auth", "logout"]) => {
            if current_user.is_none() {
                return (401, detail("Authentication required"));
            }
            if state.config.fail_logout {
                return (500, detail("Internal Server Error"));
            }
            if let Some(token) = bearer {
                state.sessions.remove(token);
            }
            (200, json!({ "message": "Logged out successfully" }).to_string())
        }
        ("POST", ["activities", name, "signup"]) => {
            if current_user.is_none() {
                return (401, detail("Authentication required"));
            }
            let Some(email) = email else {
                return (422, json!({ "detail": [{ "loc": ["query", "email"], "msg": "field required" }] }).to_string());
            };
            let Some(activity) = state.roster.get_mut(name) else {
                return (404, detail("Activity not found"));
            };
            if activity.has_participant(email) {
                return (400, detail("Student is already signed up"));
            }
            activity.participants.push(email.to_string());
            (200, json!({ "message": format!("Signed up {} for {}", email, name) }).to_string())
        }
        ("DELETE", ["activities", name, "unregister"]) => {
            if current_user.is_none() {
                return (401, detail("Authentication required"));
            }
            let Some(email) = email else {
                return (422, json!({ "detail": [{ "loc": ["query", "email"], "msg": "field required" }] }).to_string());
            };
            let Some(activity) = state.roster.get_mut(name) else {
                return (404, detail("Activity not found"));
            };
            if !activity.has_participant(email) {
                return (400, detail("Student is not signed up for this activity"));
            }
            activity.participants.retain(|p| p != email);
            (200, json!({ "message": format!("Unregistered {} from {}", email, name) }).to_string())
        }
        _ => (404, detail("Not Found")),
    }
}

fn send_response(stream: &mut TcpStream, status: u16, body: &str) {
    let status_text = match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        _ => "Internal Server Error",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::HttpBackend;
    use crate::domain::result::Error;
    use crate::ports::{ActivityBackend, Credentials};

    /// Same decoding as `parse_request` applies to the request path
    fn percent_decode(s: &str) -> String {
        percent_decode_str(s).decode_utf8_lossy().into_owned()
    }

    fn backend_for(server: &MockActivityServer) -> HttpBackend {
        HttpBackend::new(&server.base_url(), None).unwrap()
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("/activities/Chess%20Club/signup"), "/activities/Chess Club/signup");
        assert_eq!(percent_decode("a%2Fb"), "a/b");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
    }

    #[tokio::test]
    async fn test_list_activities() {
        let server = MockActivityServer::start(MockConfig::default()).unwrap();
        let roster = backend_for(&server).list_activities().await.unwrap();

        assert_eq!(roster.names(), vec!["Chess Club", "Programming Class", "GitHub Skills"]);
        assert_eq!(roster.get("Chess Club").unwrap().spots_left(), 10);
        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].bearer, None);
    }

    #[tokio::test]
    async fn test_list_activities_server_error() {
        let server = MockActivityServer::start(MockConfig {
            fail_activities: true,
            ..Default::default()
        })
        .unwrap();

        let err = backend_for(&server).list_activities().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_login_and_identity() {
        let server = MockActivityServer::start(MockConfig::default()).unwrap();
        let backend = backend_for(&server);

        let grant = backend
            .login(&Credentials::new("teacher", "secret"))
            .await
            .unwrap();
        assert_eq!(grant.user.name, "Ms. Rodriguez");

        let me = backend.current_user(&grant.token).await.unwrap();
        assert_eq!(me.map(|u| u.name), Some("Ms. Rodriguez".to_string()));

        let unknown = backend.current_user("not-a-token").await.unwrap();
        assert!(unknown.is_none());
    }

    #[tokio::test]
    async fn test_login_rejected_carries_detail() {
        let server = MockActivityServer::start(MockConfig::default()).unwrap();

        let err = backend_for(&server)
            .login(&Credentials::new("teacher", "wrongpass"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.detail(), Some("Invalid credentials"));

        let body = &server.requests()[0].body;
        assert!(body.contains(r#""username":"teacher""#));
    }

    #[tokio::test]
    async fn test_signup_encodes_name_and_email() {
        let server = MockActivityServer::start(MockConfig::default()).unwrap();
        let token = server.issue_token("teacher");

        let message = backend_for(&server)
            .sign_up(&token, "GitHub Skills", "new+kid@mergington.edu")
            .await
            .unwrap();
        assert_eq!(message, "Signed up new+kid@mergington.edu for GitHub Skills");

        let request = &server.requests()[0];
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/activities/GitHub Skills/signup");
        assert_eq!(request.email.as_deref(), Some("new+kid@mergington.edu"));
        assert_eq!(request.bearer.as_deref(), Some(token.as_str()));
        assert!(server.roster().get("GitHub Skills").unwrap().has_participant("new+kid@mergington.edu"));
    }

    #[tokio::test]
    async fn test_unregister_unknown_participant() {
        let server = MockActivityServer::start(MockConfig::default()).unwrap();
        let token = server.issue_token("teacher");

        let err = backend_for(&server)
            .unregister(&token, "Chess Club", "nobody@mergington.edu")
            .await
            .unwrap_err();
        assert_eq!(err.detail(), Some("Student is not signed up for this activity"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let mut server = MockActivityServer::start(MockConfig::default()).unwrap();
        let base_url = server.base_url();
        server.stop();
        drop(server);

        let backend = HttpBackend::new(&base_url, Some(std::time::Duration::from_secs(2))).unwrap();
        let err = backend.list_activities().await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)), "got {:?}", err);
    }
}
