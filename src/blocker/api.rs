// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire types for the ad-blocking appliance's REST API.
//!
//! All fields are optional and default-initialized: the appliance's JSON
//! varies between firmware versions, and a missing field should degrade
//! into a parse error at the call site rather than a deserialization
//! failure.

use serde::{Deserialize, Serialize};

/// Response body of the legacy API (`/admin/api.php`).
///
/// The legacy endpoint answers `{"status":"enabled"}` on success and an
/// empty JSON array when the token is rejected, which deserializes here
/// as a missing status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyStatusResponse {
    /// Blocking status, `"enabled"` or `"disabled"`.
    #[serde(rename = "status", default)]
    pub status: Option<String>,
}

/// Login request body for the session API (`POST /api/auth`).
#[derive(Debug, Serialize)]
pub struct AuthRequest<'a> {
    /// The admin password.
    pub password: &'a str,
}

/// Response body of the session API login endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    /// The created session, absent when login failed.
    #[serde(default)]
    pub session: Option<SessionInfo>,
}

/// Session descriptor returned by the login endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionInfo {
    /// Whether the session is usable.
    #[serde(default)]
    pub valid: bool,

    /// Session id, echoed back in the `X-FTL-SID` header.
    #[serde(default)]
    pub sid: Option<String>,

    /// CSRF token, echoed back in the `X-FTL-CSRF` header on mutations.
    #[serde(default)]
    pub csrf: Option<String>,

    /// Session validity in seconds.
    #[serde(default)]
    pub validity: Option<u64>,
}

/// Request body for `POST /api/dns/blocking`.
#[derive(Debug, Serialize)]
pub struct BlockingRequest {
    /// Desired blocking state.
    pub blocking: bool,

    /// Seconds until the state reverts; `None` means permanent.
    pub timer: Option<u64>,
}

/// Response body of `GET|POST /api/dns/blocking`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockingResponse {
    /// Blocking status, `"enabled"` or `"disabled"`.
    #[serde(default)]
    pub blocking: Option<String>,

    /// Seconds remaining on a temporary state, if one is active.
    #[serde(default)]
    pub timer: Option<u64>,
}
