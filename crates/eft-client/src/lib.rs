// # Globalscape EFT Admin Session
//
// This crate provides the HTTP session the provider uses to talk to the EFT
// admin REST API.
//
// ## Behaviour
//
// - One login (`POST /admin/v1/authentication`) when the session is built;
//   building fails if it fails
// - Every other call carries `Authorization: EFTAdminAuthToken <token>`
// - A 401 on an authenticated call triggers exactly one re-login and one
//   replay of the original request; a second 401 is final
// - Any status >= 400 becomes `Error::Request` with method, path and the
//   trimmed response body
// - 60 second timeout per HTTP call (a replayed call can take twice that)
// - TLS verification can be turned off for lab servers with self-signed
//   certificates
//
// ## Token lifecycle
//
// ```text
// Unauthenticated --login ok--> Authenticated --401, re-login ok--> Authenticated
//        |                            |
//        +--------login fails---------+--> Failed (terminal)
// ```
//
// A Failed session refuses further calls; build a new one.
//
// ## Security
//
// - Password and token NEVER appear in logs or Debug output
// - `insecure_skip_verify` disables certificate validation entirely
//
// ## API Reference
//
// | Operation | Method | Path |
// |---|---|---|
// | Login | POST | `/admin/v1/authentication` |
// | Server | GET/PATCH | `/admin/v2/server` |
// | Sites | GET | `/admin/v2/sites` |
// | Site users | GET/POST/PATCH/DELETE | `/admin/v2/sites/{site}/users[/{user}]` |
// | Event rules | GET/POST/PATCH/DELETE | `/admin/v2/sites/{site}/event-rules[/{rule}]` |

mod envelope;

use async_trait::async_trait;
use eft_core::models::{
    EventRule, EventRuleRequestData, Server, Site, SmtpSettings, User, UserAttributes,
};
use eft_core::{AdminApi, Error, ProviderConfig, Result};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::Mutex;

use envelope::{AuthRequest, AuthResponse, Envelope};

/// Login endpoint, relative to the base URL
pub const AUTH_PATH: &str = "/admin/v1/authentication";

/// Scheme word of the `Authorization` header
pub const AUTH_SCHEME: &str = "EFTAdminAuthToken";

/// HTTP timeout for a single API request (60 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(60);

const SERVER_PATH: &str = "/admin/v2/server";
const SITES_PATH: &str = "/admin/v2/sites";

/// Where the session is in its token lifecycle
enum TokenState {
    Unauthenticated,
    Authenticated(String),
    Failed,
}

/// Authenticated session against one EFT server
///
/// # Concurrency
///
/// The token is held behind an async mutex. A request that receives a 401
/// takes the lock, and re-authenticates only if no other request has already
/// replaced the token it used; otherwise it replays with the fresh one.
///
/// # Cancellation
///
/// All calls are futures; dropping one aborts the request in flight,
/// including the replay after a re-login.
pub struct Session {
    /// HTTP client (timeout and TLS policy applied)
    client: reqwest::Client,

    /// Base URL without a trailing slash
    base_url: String,

    username: String,

    /// ⚠️ NEVER log this value
    password: String,

    auth_type: String,

    /// Current token, replaced in place on re-login
    state: Mutex<TokenState>,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("auth_type", &self.auth_type)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

impl Session {
    /// Build a session and log in
    ///
    /// The configuration is used as given; call
    /// [`ProviderConfig::validate`] first to reject bad input without
    /// touching the network.
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] if the HTTP client cannot be built
    /// - [`Error::Authentication`] if the login fails
    pub async fn connect(config: &ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .danger_accept_invalid_certs(config.insecure_skip_verify())
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {}", e)))?;

        if config.insecure_skip_verify() {
            tracing::warn!("TLS certificate verification is disabled for {}", config.host());
        }

        let session = Self {
            client,
            base_url: config.host().trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            auth_type: config.auth_type().to_string(),
            state: Mutex::new(TokenState::Unauthenticated),
        };

        {
            let mut state = session.state.lock().await;
            session.login(&mut state).await?;
        }

        Ok(session)
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether the session currently holds a usable token
    pub async fn is_authenticated(&self) -> bool {
        matches!(*self.state.lock().await, TokenState::Authenticated(_))
    }

    /// Authenticated GET, decoding the JSON response
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.execute(Method::GET, path, None).await?;
        decode(response, &Method::GET, path).await
    }

    /// Authenticated call with a JSON body, decoding the JSON response
    pub async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec(body)?;
        let response = self.execute(method.clone(), path, Some(bytes)).await?;
        decode(response, &method, path).await
    }

    /// Authenticated DELETE; the response body is drained and dropped
    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self.execute(Method::DELETE, path, None).await?;
        // Drained, not decoded
        let _ = response.bytes().await;
        Ok(())
    }

    /// POST the credentials and return the token from the response
    async fn authenticate(&self) -> Result<String> {
        let body = serde_json::to_vec(&AuthRequest {
            user_name: &self.username,
            password: &self.password,
            auth_type: &self.auth_type,
        })?;

        // Sent directly: the login never goes through the 401 replay path
        let response = self
            .send_once(&Method::POST, AUTH_PATH, Some(&body), None)
            .await
            .map_err(|e| Error::auth(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::auth(format!(
                "{} {} failed ({}): {}",
                Method::POST,
                AUTH_PATH,
                status.as_u16(),
                text.trim()
            )));
        }

        let auth: AuthResponse = decode(response, &Method::POST, AUTH_PATH).await?;
        Ok(auth.auth_token)
    }

    /// Log in and record the outcome in `state`
    async fn login(&self, state: &mut TokenState) -> Result<String> {
        match self.authenticate().await {
            Ok(token) => {
                tracing::info!("Authenticated to {} as {}", self.base_url, self.username);
                *state = TokenState::Authenticated(token.clone());
                Ok(token)
            }
            Err(e) => {
                tracing::error!("Authentication to {} failed: {}", self.base_url, e);
                *state = TokenState::Failed;
                Err(e)
            }
        }
    }

    /// Token to attach to the next request
    async fn current_token(&self) -> Result<String> {
        let mut state = self.state.lock().await;
        match &*state {
            TokenState::Authenticated(token) => return Ok(token.clone()),
            TokenState::Failed => return Err(failed_session()),
            TokenState::Unauthenticated => {}
        }
        self.login(&mut state).await
    }

    /// Replace `stale` after a 401, unless another request already did
    async fn renew_token(&self, stale: &str) -> Result<String> {
        let mut state = self.state.lock().await;

        if let TokenState::Authenticated(current) = &*state
            && current != stale
        {
            tracing::debug!("Token already renewed by a concurrent request");
            return Ok(current.clone());
        }
        if matches!(*state, TokenState::Failed) {
            return Err(failed_session());
        }

        tracing::warn!("Auth token rejected by {}, re-authenticating", self.base_url);
        self.login(&mut state).await
    }

    fn url_for(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Single HTTP attempt
    async fn send_once(
        &self,
        method: &Method,
        path: &str,
        body: Option<&[u8]>,
        token: Option<&str>,
    ) -> Result<Response> {
        let mut request = self.client.request(method.clone(), self.url_for(path));

        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_vec());
        }

        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("{} {}", AUTH_SCHEME, token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::transport(format!("{} {}: {}", method, path, e)))?;

        tracing::debug!("{} {} -> {}", method, path, response.status());
        Ok(response)
    }

    /// Send an authenticated request, replaying it once after a re-login on 401
    ///
    /// Returns the response only if its status is below 400.
    async fn execute(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<Response> {
        let token = self.current_token().await?;

        let mut response = self
            .send_once(&method, path, body.as_deref(), Some(&token))
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            // The stale response body is discarded
            drop(response);
            let fresh = self.renew_token(&token).await?;
            response = self
                .send_once(&method, path, body.as_deref(), Some(&fresh))
                .await?;
        }

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::request(method.as_str(), path, status.as_u16(), text));
        }

        Ok(response)
    }
}

/// Decode a JSON response body
async fn decode<T: DeserializeOwned>(response: Response, method: &Method, path: &str) -> Result<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::transport(format!("{} {}: reading response: {}", method, path, e)))?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn failed_session() -> Error {
    Error::auth("session is in a failed state after an earlier authentication error; reconnect to continue")
}

/// `base` + `/` + `path` without its leading slashes
fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base, path.trim_start_matches('/'))
}

fn site_users_path(site_id: &str) -> String {
    format!("{}/{}/users", SITES_PATH, site_id)
}

fn site_user_path(site_id: &str, user_id: &str) -> String {
    format!("{}/{}", site_users_path(site_id), user_id)
}

fn event_rules_path(site_id: &str) -> String {
    format!("{}/{}/event-rules", SITES_PATH, site_id)
}

fn event_rule_path(site_id: &str, rule_id: &str) -> String {
    format!("{}/{}", event_rules_path(site_id), rule_id)
}

#[async_trait]
impl AdminApi for Session {
    async fn get_server(&self) -> Result<Server> {
        let envelope: Envelope<Server> = self.get(SERVER_PATH).await?;
        Ok(envelope.into_inner())
    }

    async fn update_server_smtp(&self, smtp: &SmtpSettings) -> Result<Server> {
        let body = envelope::server_smtp_patch(smtp);
        let envelope: Envelope<Server> = self.send_json(Method::PATCH, SERVER_PATH, &body).await?;
        Ok(envelope.into_inner())
    }

    async fn list_sites(&self) -> Result<Vec<Site>> {
        let envelope: Envelope<Vec<Site>> = self.get(SITES_PATH).await?;
        Ok(envelope.into_inner())
    }

    async fn get_site_user(&self, site_id: &str, user_id: &str) -> Result<User> {
        let envelope: Envelope<User> = self.get(&site_user_path(site_id, user_id)).await?;
        Ok(envelope.into_inner())
    }

    async fn create_site_user(&self, site_id: &str, attrs: &UserAttributes) -> Result<User> {
        let body = envelope::user_body(attrs);
        let envelope: Envelope<User> = self
            .send_json(Method::POST, &site_users_path(site_id), &body)
            .await?;
        Ok(envelope.into_inner())
    }

    async fn update_site_user(
        &self,
        site_id: &str,
        user_id: &str,
        attrs: &UserAttributes,
    ) -> Result<User> {
        let body = envelope::user_body(attrs);
        let envelope: Envelope<User> = self
            .send_json(Method::PATCH, &site_user_path(site_id, user_id), &body)
            .await?;
        Ok(envelope.into_inner())
    }

    async fn delete_site_user(&self, site_id: &str, user_id: &str) -> Result<()> {
        self.delete(&site_user_path(site_id, user_id)).await
    }

    async fn get_event_rule(&self, site_id: &str, rule_id: &str) -> Result<EventRule> {
        let envelope: Envelope<EventRule> = self.get(&event_rule_path(site_id, rule_id)).await?;
        Ok(envelope.into_inner())
    }

    async fn create_event_rule(
        &self,
        site_id: &str,
        data: &EventRuleRequestData,
    ) -> Result<EventRule> {
        let envelope: Envelope<EventRule> = self
            .send_json(Method::POST, &event_rules_path(site_id), &Envelope::new(data))
            .await?;
        Ok(envelope.into_inner())
    }

    async fn update_event_rule(
        &self,
        site_id: &str,
        rule_id: &str,
        data: &EventRuleRequestData,
    ) -> Result<EventRule> {
        let envelope: Envelope<EventRule> = self
            .send_json(
                Method::PATCH,
                &event_rule_path(site_id, rule_id),
                &Envelope::new(data),
            )
            .await?;
        Ok(envelope.into_inner())
    }

    async fn delete_event_rule(&self, site_id: &str, rule_id: &str) -> Result<()> {
        self.delete(&event_rule_path(site_id, rule_id)).await
    }
}
