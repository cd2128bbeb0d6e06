// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Driver for a local DNS ad-blocking appliance.
//!
//! The appliance exposes two protocol generations:
//!
//! - **Legacy API**: every request carries an API token in the query
//!   string (`/admin/api.php?enable&auth=<token>`).
//! - **Session API**: a login endpoint (`POST /api/auth`) exchanges the
//!   password for a session id and CSRF token, which later requests carry
//!   in headers. A 401 invalidates the session; re-authentication uses
//!   capped exponential backoff.
//!
//! [`BlockingSwitch`] is the app built on top: it mirrors the appliance's
//! blocking state onto a virtual switch child and translates `on`/`off`
//! commands into enable/disable calls.
//!
//! # Examples
//!
//! ```no_run
//! use domo_lib::blocker::{BlockerAuth, BlockerConfig};
//!
//! # async fn example() -> domo_lib::Result<()> {
//! let client = BlockerConfig::new("192.168.1.2")
//!     .with_auth(BlockerAuth::session("hunter2"))
//!     .into_client()?;
//!
//! let state = client.status().await?;
//! println!("blocking is {state}");
//! # Ok(())
//! # }
//! ```

mod api;
mod client;
mod switch;

pub use api::{AuthResponse, BlockingResponse, LegacyStatusResponse, SessionInfo};
pub use client::{BlockerClient, LegacyClient, ReauthPolicy, SessionClient};
pub use switch::{BlockingSwitch, BlockingSwitchConfig};

use std::time::Duration;

use crate::error::{ConfigError, ProtocolError};

/// Credentials for one of the appliance's two protocol generations.
#[derive(Debug, Clone)]
pub enum BlockerAuth {
    /// Legacy API token, sent in the query string of every request.
    Legacy {
        /// The API token.
        token: String,
    },
    /// Session API password, exchanged for a session id at login.
    Session {
        /// The admin password.
        password: String,
    },
}

impl BlockerAuth {
    /// Creates legacy token credentials.
    #[must_use]
    pub fn legacy(token: impl Into<String>) -> Self {
        Self::Legacy {
            token: token.into(),
        }
    }

    /// Creates session password credentials.
    #[must_use]
    pub fn session(password: impl Into<String>) -> Self {
        Self::Session {
            password: password.into(),
        }
    }
}

/// Configuration for the ad-blocking appliance connection.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use domo_lib::blocker::{BlockerAuth, BlockerConfig};
///
/// let config = BlockerConfig::new("192.168.1.2")
///     .with_port(8080)
///     .with_auth(BlockerAuth::legacy("abc123"))
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url(), "http://192.168.1.2:8080");
/// ```
#[derive(Debug, Clone)]
pub struct BlockerConfig {
    host: String,
    port: u16,
    use_https: bool,
    auth: Option<BlockerAuth>,
    timeout: Duration,
    reauth: ReauthPolicy,
}

impl BlockerConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default HTTPS port.
    pub const DEFAULT_HTTPS_PORT: u16 = 443;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a new configuration for the appliance at `host`.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            use_https: false,
            auth: None,
            timeout: Self::DEFAULT_TIMEOUT,
            reauth: ReauthPolicy::default(),
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enables HTTPS.
    ///
    /// If the port hasn't been explicitly set, it is changed to 443.
    #[must_use]
    pub fn with_https(mut self) -> Self {
        self.use_https = true;
        if self.port == Self::DEFAULT_PORT {
            self.port = Self::DEFAULT_HTTPS_PORT;
        }
        self
    }

    /// Sets the credentials.
    #[must_use]
    pub fn with_auth(mut self, auth: BlockerAuth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the re-authentication policy for the session API.
    #[must_use]
    pub fn with_reauth_policy(mut self, policy: ReauthPolicy) -> Self {
        self.reauth = policy;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Builds the base URL from this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        let scheme = if self.use_https { "https" } else { "http" };
        let port_suffix =
            if (self.use_https && self.port == 443) || (!self.use_https && self.port == 80) {
                String::new()
            } else {
                format!(":{}", self.port)
            };
        format!("{scheme}://{}{port_suffix}", self.host)
    }

    /// Creates a [`BlockerClient`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSetting`] if the host or credentials
    /// are absent, and a protocol error if the HTTP client cannot be
    /// created.
    pub fn into_client(self) -> crate::Result<BlockerClient> {
        if self.host.trim().is_empty() {
            tracing::warn!("ad blocker has no host configured; aborting");
            return Err(ConfigError::MissingSetting("host").into());
        }

        let base_url = self.base_url();
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        match self.auth {
            None => {
                tracing::warn!("ad blocker has no credentials configured; aborting");
                Err(ConfigError::MissingSetting("credentials").into())
            }
            Some(BlockerAuth::Legacy { token }) if token.trim().is_empty() => {
                tracing::warn!("ad blocker token is empty; aborting");
                Err(ConfigError::MissingSetting("token").into())
            }
            Some(BlockerAuth::Session { password }) if password.trim().is_empty() => {
                tracing::warn!("ad blocker password is empty; aborting");
                Err(ConfigError::MissingSetting("password").into())
            }
            Some(BlockerAuth::Legacy { token }) => Ok(BlockerClient::Legacy(LegacyClient::new(
                base_url, token, http,
            ))),
            Some(BlockerAuth::Session { password }) => Ok(BlockerClient::Session(
                SessionClient::new(base_url, password, http, self.reauth),
            )),
        }
    }
}
