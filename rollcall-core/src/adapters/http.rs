//! HTTP client for the activity sign-up API
//!
//! Talks to the REST backend described by `ActivityBackend`. Path segments
//! and the `email` query value are percent-encoded by the `url` crate.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use url::Url;

use crate::domain::result::{Error, Result};
use crate::domain::{Roster, User};
use crate::ports::{ActivityBackend, Credentials, LoginGrant};

/// Error body sent with non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<JsonValue>,
}

/// Body of a successful sign-up or unregister
#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

/// Activity API client
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Create a client for the server at `base_url`.
    ///
    /// `timeout` of `None` leaves reqwest's default (no overall timeout).
    pub fn new(base_url: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let base_url = parse_base_url(base_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// Build `<base>/<segments...>`, encoding each segment on its own
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Cannot use {} as a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn registration_endpoint(&self, activity: &str, action: &str, email: &str) -> Result<Url> {
        let mut url = self.endpoint(&["activities", activity, action])?;
        url.query_pairs_mut().append_pair("email", email);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, token: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(|e| self.map_request_error(e))?;
        check_response_status(response).await
    }

    /// Map request errors to user-friendly messages
    fn map_request_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::transport("Connection timed out")
        } else if error.is_connect() {
            Error::transport(format!("Unable to connect to {}", self.base_url))
        } else {
            // The URL can carry a student email in its query
            Error::transport(format!("{}", error.without_url()))
        }
    }
}

fn parse_base_url(base_url: &str) -> anyhow::Result<Url> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).with_context(|| format!("Invalid server URL: {}", base_url))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("Server URL must use http or https, got {}", parsed.scheme());
    }
    if parsed.cannot_be_a_base() {
        anyhow::bail!("Server URL cannot be used as a base: {}", base_url);
    }

    Ok(parsed)
}

/// Turn a non-2xx response into `Error::Server`, reading `detail` if present
async fn check_response_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.detail)
        .and_then(detail_text);

    Err(Error::Server {
        status: status.as_u16(),
        detail,
    })
}

/// A string detail is shown as-is; structured details (validation error
/// lists) are shown as compact JSON.
fn detail_text(detail: JsonValue) -> Option<String> {
    match detail {
        JsonValue::Null => None,
        JsonValue::String(s) if s.is_empty() => None,
        JsonValue::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| Error::transport(format!("Failed to parse {} response: {}", what, e.without_url())))
}

#[async_trait]
impl ActivityBackend for HttpBackend {
    async fn list_activities(&self) -> Result<Roster> {
        let url = self.endpoint(&["activities"])?;
        let response = self.send(self.request(Method::GET, url, None)).await?;
        read_json(response, "activities").await
    }

    async fn current_user(&self, token: &str) -> Result<Option<User>> {
        let url = self.endpoint(&["auth", "me"])?;
        let response = self.send(self.request(Method::GET, url, Some(token))).await?;
        read_json(response, "identity").await
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant> {
        let url = self.endpoint(&["auth", "login"])?;
        let response = self
            .send(self.request(Method::POST, url, None).json(credentials))
            .await?;
        read_json(response, "login").await
    }

    async fn logout(&self, token: &str) -> Result<()> {
        let url = self.endpoint(&["auth", "logout"])?;
        self.send(self.request(Method::POST, url, Some(token))).await?;
        Ok(())
    }

    async fn sign_up(&self, token: &str, activity: &str, email: &str) -> Result<String> {
        let url = self.registration_endpoint(activity, "signup", email)?;
        let response = self.send(self.request(Method::POST, url, Some(token))).await?;
        let body: MessageBody = read_json(response, "signup").await?;
        Ok(body.message)
    }

    async fn unregister(&self, token: &str, activity: &str, email: &str) -> Result<String> {
        let url = self.registration_endpoint(activity, "unregister", email)?;
        let response = self.send(self.request(Method::DELETE, url, Some(token))).await?;
        let body: MessageBody = read_json(response, "unregister").await?;
        Ok(body.message)
    }
}
