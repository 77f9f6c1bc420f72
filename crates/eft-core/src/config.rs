//! Configuration types for the EFT provider
//!
//! The host hands the provider plain values: base URL, credentials, auth type
//! and a TLS flag. Everything here is validated before any network call.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Auth type forwarded to EFT when the host leaves it unset
pub const DEFAULT_AUTH_TYPE: &str = "EFT";

/// Provider configuration as supplied by the host
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL for the EFT admin API, e.g. `https://eft.example.com:4450/admin`
    #[serde(default)]
    pub host: String,

    /// Admin username with access to the REST API
    #[serde(default)]
    pub username: String,

    /// Admin password
    /// ⚠️ NEVER log this value
    #[serde(default)]
    pub password: String,

    /// Authentication type accepted by EFT (`EFT` or `AD`)
    #[serde(default)]
    pub auth_type: Option<String>,

    /// Skip TLS certificate verification (lab systems with self-signed certs)
    #[serde(default)]
    pub insecure_skip_verify: Option<bool>,
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("auth_type", &self.auth_type)
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .finish()
    }
}

impl ProviderConfig {
    /// Create a configuration from the three required values
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            auth_type: None,
            insecure_skip_verify: None,
        }
    }

    /// Set the auth type
    pub fn with_auth_type(mut self, auth_type: impl Into<String>) -> Self {
        self.auth_type = Some(auth_type.into());
        self
    }

    /// Enable or disable TLS certificate verification
    pub fn with_insecure_skip_verify(mut self, insecure: bool) -> Self {
        self.insecure_skip_verify = Some(insecure);
        self
    }

    /// Load a configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::validation(format!("cannot read config file {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Host with surrounding whitespace removed
    pub fn host(&self) -> &str {
        self.host.trim()
    }

    /// Auth type, falling back to [`DEFAULT_AUTH_TYPE`] when unset or empty
    pub fn auth_type(&self) -> &str {
        match self.auth_type.as_deref() {
            Some(auth_type) if !auth_type.is_empty() => auth_type,
            _ => DEFAULT_AUTH_TYPE,
        }
    }

    /// Whether certificate validation is disabled
    pub fn insecure_skip_verify(&self) -> bool {
        self.insecure_skip_verify.unwrap_or(false)
    }

    /// Validate the configuration
    ///
    /// Fails with [`Error::Validation`] when host, username or password is
    /// missing, or when the host is not an `http://` or `https://` URL.
    pub fn validate(&self) -> Result<()> {
        let host = self.host();
        if host.is_empty() || self.username.is_empty() || self.password.is_empty() {
            return Err(Error::validation(
                "host, username, and password must all be provided",
            ));
        }

        let parsed = url::Url::parse(host)
            .map_err(|e| Error::validation(format!("Invalid host {}: {}", host, e)))?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(Error::validation(format!(
                "Host must use http:// or https:// scheme. Got: {}",
                other
            ))),
        }
    }
}
