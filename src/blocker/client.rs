// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP clients for the two generations of the appliance API.

use std::time::Duration;

use parking_lot::Mutex;
use reqwest::StatusCode;

use crate::error::{ParseError, ProtocolError, Result};
use crate::types::PowerState;

use super::api::{AuthRequest, AuthResponse, BlockingRequest, BlockingResponse, LegacyStatusResponse};

/// Session id header.
const HEADER_SID: &str = "X-FTL-SID";

/// CSRF token header, required on mutations.
const HEADER_CSRF: &str = "X-FTL-CSRF";

/// Re-authentication retry policy.
///
/// Login attempts back off exponentially: the delay before attempt `n+1`
/// is `initial_delay * 2^n`, capped at `max_delay`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use domo_lib::blocker::ReauthPolicy;
///
/// let policy = ReauthPolicy::default();
/// assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(1));
/// assert_eq!(policy.delay_for_attempt(3), Duration::from_secs(8));
/// assert_eq!(policy.delay_for_attempt(30), Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct ReauthPolicy {
    /// Maximum number of login attempts before giving up.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Cap on the backoff delay.
    pub max_delay: Duration,
}

impl Default for ReauthPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl ReauthPolicy {
    /// Calculates the backoff delay after a given failed attempt.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

/// Client for the legacy token-in-query-string API.
///
/// Every request is a `GET` against `/admin/api.php` with the action and
/// token in the query string. The endpoint answers a small JSON object
/// whose `status` field reflects the blocking state; a rejected token
/// yields a body with no `status` at all.
#[derive(Debug, Clone)]
pub struct LegacyClient {
    base_url: String,
    token: String,
    http: reqwest::Client,
}

impl LegacyClient {
    pub(crate) fn new(base_url: String, token: String, http: reqwest::Client) -> Self {
        Self {
            base_url,
            token,
            http,
        }
    }

    /// Builds the URL for an action.
    fn url(&self, action: &str) -> String {
        format!(
            "{}/admin/api.php?{action}&auth={}",
            self.base_url,
            urlencoding::encode(&self.token)
        )
    }

    /// Queries the blocking status.
    pub async fn status(&self) -> Result<PowerState> {
        self.call("status").await
    }

    /// Enables blocking.
    pub async fn enable(&self) -> Result<PowerState> {
        self.call("enable").await
    }

    /// Disables blocking, optionally for a limited duration.
    pub async fn disable(&self, for_duration: Option<Duration>) -> Result<PowerState> {
        match for_duration {
            Some(duration) => self.call(&format!("disable={}", duration.as_secs())).await,
            None => self.call("disable").await,
        }
    }

    async fn call(&self, action: &str) -> Result<PowerState> {
        let url = self.url(action);
        tracing::debug!(action, "sending legacy appliance request");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ProtocolError::AuthenticationFailed.into());
        }
        if !response.status().is_success() {
            return Err(ProtocolError::ConnectionFailed(format!(
                "HTTP {}",
                response.status().as_u16()
            ))
            .into());
        }

        let body: LegacyStatusResponse = response.json().await.map_err(ProtocolError::Http)?;
        let Some(status) = body.status else {
            // A rejected token answers without a status field
            return Err(ProtocolError::AuthenticationFailed.into());
        };

        parse_state("status", &status)
    }
}

/// Session held for the session API.
#[derive(Debug, Clone)]
struct Session {
    sid: String,
    csrf: String,
}

/// Client for the session-id/CSRF-token API generation.
///
/// Login exchanges the password for a short-lived session; requests carry
/// the session id (and the CSRF token on mutations) in headers. A 401
/// response invalidates the session and triggers re-authentication with
/// capped exponential backoff before the request is retried once.
#[derive(Debug)]
pub struct SessionClient {
    base_url: String,
    password: String,
    http: reqwest::Client,
    session: Mutex<Option<Session>>,
    policy: ReauthPolicy,
}

impl SessionClient {
    pub(crate) fn new(
        base_url: String,
        password: String,
        http: reqwest::Client,
        policy: ReauthPolicy,
    ) -> Self {
        Self {
            base_url,
            password,
            http,
            session: Mutex::new(None),
            policy,
        }
    }

    /// Replaces the re-authentication policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ReauthPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns `true` if a session is currently held.
    #[must_use]
    pub fn has_session(&self) -> bool {
        self.session.lock().is_some()
    }

    /// Drops the held session; the next request logs in again.
    pub fn invalidate_session(&self) {
        *self.session.lock() = None;
    }

    /// Queries the blocking status.
    pub async fn status(&self) -> Result<PowerState> {
        let response = self.request_blocking(None).await?;
        let Some(state) = response.blocking else {
            return Err(ParseError::MissingField("blocking".to_string()).into());
        };
        parse_state("blocking", &state)
    }

    /// Enables or disables blocking, optionally for a limited duration.
    pub async fn set_blocking(
        &self,
        enabled: bool,
        for_duration: Option<Duration>,
    ) -> Result<PowerState> {
        let body = BlockingRequest {
            blocking: enabled,
            timer: for_duration.map(|d| d.as_secs()),
        };
        let response = self.request_blocking(Some(&body)).await?;
        let Some(state) = response.blocking else {
            return Err(ParseError::MissingField("blocking".to_string()).into());
        };
        parse_state("blocking", &state)
    }

    /// Sends a blocking request, re-authenticating once on a 401.
    async fn request_blocking(&self, body: Option<&BlockingRequest>) -> Result<BlockingResponse> {
        let session = self.ensure_session().await?;
        let response = self.send_blocking(&session, body).await?;

        let response = if response.status() == StatusCode::UNAUTHORIZED {
            tracing::info!("appliance session expired; re-authenticating");
            self.invalidate_session();
            let session = self.login().await?;
            self.send_blocking(&session, body).await?
        } else {
            response
        };

        if !response.status().is_success() {
            return Err(ProtocolError::ConnectionFailed(format!(
                "HTTP {}",
                response.status().as_u16()
            ))
            .into());
        }

        Ok(response.json().await.map_err(ProtocolError::Http)?)
    }

    async fn send_blocking(
        &self,
        session: &Session,
        body: Option<&BlockingRequest>,
    ) -> Result<reqwest::Response> {
        let url = format!("{}/api/dns/blocking", self.base_url);
        let request = match body {
            Some(body) => self
                .http
                .post(&url)
                .header(HEADER_SID, &session.sid)
                .header(HEADER_CSRF, &session.csrf)
                .json(body),
            None => self.http.get(&url).header(HEADER_SID, &session.sid),
        };

        Ok(request.send().await.map_err(ProtocolError::Http)?)
    }

    /// Returns the held session, logging in when none exists.
    async fn ensure_session(&self) -> Result<Session> {
        if let Some(session) = self.session.lock().clone() {
            return Ok(session);
        }
        self.login().await
    }

    /// Logs in with exponential backoff between attempts.
    async fn login(&self) -> Result<Session> {
        for attempt in 0..self.policy.max_attempts {
            if attempt > 0 {
                let delay = self.policy.delay_for_attempt(attempt - 1);
                tracing::debug!(?delay, attempt, "waiting before login retry");
                tokio::time::sleep(delay).await;
            }

            match self.try_login().await {
                Ok(session) => {
                    *self.session.lock() = Some(session.clone());
                    return Ok(session);
                }
                Err(error) => {
                    tracing::warn!(attempt, %error, "appliance login failed");
                }
            }
        }

        Err(ProtocolError::AuthenticationExhausted {
            attempts: self.policy.max_attempts,
        }
        .into())
    }

    async fn try_login(&self) -> Result<Session> {
        let url = format!("{}/api/auth", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&AuthRequest {
                password: &self.password,
            })
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ProtocolError::AuthenticationFailed.into());
        }
        if !response.status().is_success() {
            return Err(ProtocolError::ConnectionFailed(format!(
                "HTTP {}",
                response.status().as_u16()
            ))
            .into());
        }

        let body: AuthResponse = response.json().await.map_err(ProtocolError::Http)?;
        let Some(session) = body.session else {
            return Err(ParseError::MissingField("session".to_string()).into());
        };
        if !session.valid {
            return Err(ProtocolError::AuthenticationFailed.into());
        }
        let Some(sid) = session.sid else {
            return Err(ParseError::MissingField("session.sid".to_string()).into());
        };

        Ok(Session {
            sid,
            csrf: session.csrf.unwrap_or_default(),
        })
    }
}

/// Client for either API generation.
#[derive(Debug)]
pub enum BlockerClient {
    /// Legacy token-in-query-string API.
    Legacy(LegacyClient),
    /// Session-id/CSRF-token API.
    Session(SessionClient),
}

impl BlockerClient {
    /// Queries the blocking status.
    ///
    /// # Errors
    ///
    /// Returns a protocol error on network or authentication failure and
    /// a parse error when the response is malformed.
    pub async fn status(&self) -> Result<PowerState> {
        match self {
            Self::Legacy(client) => client.status().await,
            Self::Session(client) => client.status().await,
        }
    }

    /// Enables blocking.
    ///
    /// # Errors
    ///
    /// See [`status`](Self::status).
    pub async fn enable(&self) -> Result<PowerState> {
        match self {
            Self::Legacy(client) => client.enable().await,
            Self::Session(client) => client.set_blocking(true, None).await,
        }
    }

    /// Disables blocking, optionally for a limited duration.
    ///
    /// # Errors
    ///
    /// See [`status`](Self::status).
    pub async fn disable(&self, for_duration: Option<Duration>) -> Result<PowerState> {
        match self {
            Self::Legacy(client) => client.disable(for_duration).await,
            Self::Session(client) => client.set_blocking(false, for_duration).await,
        }
    }
}

/// Maps an appliance status string onto a power state.
fn parse_state(field: &str, value: &str) -> Result<PowerState> {
    value
        .parse()
        .map_err(|_| {
            ParseError::InvalidValue {
                field: field.to_string(),
                message: format!("unknown state {value:?}"),
            }
            .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = ReauthPolicy::default();
        assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(5), Duration::from_secs(32));
        assert_eq!(policy.delay_for_attempt(6), Duration::from_secs(60));
        assert_eq!(policy.delay_for_attempt(u32::MAX), Duration::from_secs(60));
    }

    #[test]
    fn legacy_url_encodes_token() {
        let client = LegacyClient::new(
            "http://192.168.1.2".to_string(),
            "t?k&n".to_string(),
            reqwest::Client::new(),
        );
        assert_eq!(
            client.url("enable"),
            "http://192.168.1.2/admin/api.php?enable&auth=t%3Fk%26n"
        );
    }

    #[test]
    fn legacy_disable_url_with_duration() {
        let client = LegacyClient::new(
            "http://192.168.1.2".to_string(),
            "tok".to_string(),
            reqwest::Client::new(),
        );
        assert_eq!(
            client.url("disable=300"),
            "http://192.168.1.2/admin/api.php?disable=300&auth=tok"
        );
    }

    #[test]
    fn state_parsing() {
        assert_eq!(parse_state("status", "enabled").unwrap(), PowerState::On);
        assert_eq!(parse_state("status", "disabled").unwrap(), PowerState::Off);
        assert!(parse_state("status", "rebooting").is_err());
    }

    #[test]
    fn session_invalidation() {
        let client = SessionClient::new(
            "http://192.168.1.2".to_string(),
            "pw".to_string(),
            reqwest::Client::new(),
            ReauthPolicy::default(),
        );
        assert!(!client.has_session());
        *client.session.lock() = Some(Session {
            sid: "abc".to_string(),
            csrf: "xyz".to_string(),
        });
        assert!(client.has_session());
        client.invalidate_session();
        assert!(!client.has_session());
    }
}
