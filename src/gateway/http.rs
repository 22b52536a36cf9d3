//! HTTP adapter and backend-backed auth gateway.
//!
//! ARCHITECTURE
//! ============
//! [`ApiClient`] is the one place outbound requests are built: base URL,
//! JSON content type, request timeout and bearer-token injection from the
//! shared key-value medium. A 401 on an authenticated request wipes the
//! token and session snapshot and broadcasts an [`UnauthorizedSignal`];
//! turning that signal into a logout is the job of
//! [`crate::session::spawn_unauthorized_watch`], not of the store itself.
//!
//! ERROR HANDLING
//! ==============
//! Backend errors carry `{"message": "..."}` when they can; otherwise the
//! status code is reported. Transport failures surface their reqwest text.

use std::time::Duration;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::AuthGateway;
use crate::error::AuthError;
use crate::session::persist::SessionPersistence;
use crate::types::{AuthSession, RegisterRequest, ResetNotice, User, UserPatch};

const SIGNAL_CAPACITY: usize = 8;

/// Broadcast when an authenticated request comes back 401.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnauthorizedSignal;

/// Whether a 401 means "wrong credentials" or "token no longer valid".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Access {
    Anonymous,
    Authenticated,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Deserialize)]
struct ProfileResponse {
    user: User,
}

fn request_failed_message(status: u16) -> String {
    format!("request failed: {status}")
}

fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| request_failed_message(status))
}

// =============================================================================
// API CLIENT
// =============================================================================

/// Shared HTTP client for every call to the console backend.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    persistence: SessionPersistence,
    unauthorized: broadcast::Sender<UnauthorizedSignal>,
}

impl ApiClient {
    /// Build a client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Gateway`] if the underlying HTTP client fails to build.
    pub fn new(base_url: &str, timeout: Duration, persistence: SessionPersistence) -> Result<Self, AuthError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| AuthError::Gateway(format!("http client build failed: {e}")))?;
        let (unauthorized, _) = broadcast::channel(SIGNAL_CAPACITY);
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned(), persistence, unauthorized })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Subscribe to 401s seen on authenticated requests.
    #[must_use]
    pub fn on_unauthorized(&self) -> broadcast::Receiver<UnauthorizedSignal> {
        self.unauthorized.subscribe()
    }

    /// `GET` an authenticated resource.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthorized`] on 401 (after wiping local auth
    /// state and signalling), or [`AuthError::Gateway`] otherwise.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AuthError> {
        self.send_json(Method::GET, path, None, Access::Authenticated)
            .await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        access: Access,
    ) -> Result<T, AuthError> {
        let text = self.send(method, path, body, access).await?;
        serde_json::from_str(&text).map_err(|e| AuthError::Gateway(format!("unexpected response: {e}")))
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>, access: Access) -> Result<String, AuthError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "api request");
        let mut request = self.http.request(method, url);
        if let Some(token) = self.persistence.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AuthError::Gateway(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Gateway(e.to_string()))?;

        if status == 401 {
            return Err(self.reject_unauthorized(access, &text));
        }
        if !(200..300).contains(&status) {
            return Err(AuthError::Gateway(error_message(status, &text)));
        }
        Ok(text)
    }

    fn reject_unauthorized(&self, access: Access, body: &str) -> AuthError {
        match access {
            Access::Anonymous => {
                let message = error_message(401, body);
                if message == request_failed_message(401) {
                    AuthError::InvalidCredentials
                } else {
                    AuthError::Gateway(message)
                }
            }
            Access::Authenticated => {
                warn!("bearer token rejected; clearing local session");
                self.persistence.wipe();
                let _ = self.unauthorized.send(UnauthorizedSignal);
                AuthError::Unauthorized
            }
        }
    }
}

// =============================================================================
// HTTP GATEWAY
// =============================================================================

/// Auth gateway backed by the console REST API.
pub struct HttpAuthGateway {
    api: ApiClient,
    persistence: SessionPersistence,
}

impl HttpAuthGateway {
    #[must_use]
    pub fn new(api: ApiClient, persistence: SessionPersistence) -> Self {
        Self { api, persistence }
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn keep_token(&self, session: AuthSession) -> Result<AuthSession, AuthError> {
        self.persistence
            .set_token(&session.token)
            .map_err(|e| AuthError::Gateway(e.to_string()))?;
        Ok(session)
    }
}

#[async_trait::async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let body = json!({ "email": email, "password": password });
        let session: AuthSession = self
            .api
            .send_json(Method::POST, "/auth/login", Some(body), Access::Anonymous)
            .await?;
        self.keep_token(session)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthSession, AuthError> {
        let body = serde_json::to_value(request).map_err(|e| AuthError::Gateway(e.to_string()))?;
        let session: AuthSession = self
            .api
            .send_json(Method::POST, "/auth/register", Some(body), Access::Anonymous)
            .await?;
        self.keep_token(session)
    }

    async fn forgot_password(&self, email: &str) -> Result<ResetNotice, AuthError> {
        let body = json!({ "email": email });
        self.api
            .send_json(Method::POST, "/auth/forgot-password", Some(body), Access::Anonymous)
            .await
    }

    async fn update_profile(&self, _current: &User, patch: &UserPatch) -> Result<User, AuthError> {
        let body = serde_json::to_value(patch).map_err(|e| AuthError::Gateway(e.to_string()))?;
        let response: ProfileResponse = self
            .api
            .send_json(Method::PUT, "/auth/profile", Some(body), Access::Authenticated)
            .await?;
        Ok(response.user)
    }

    fn logout(&self) {
        self.persistence.clear_token();
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
