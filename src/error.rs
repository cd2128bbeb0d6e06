// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `domo_lib` library.
//!
//! This module provides an error hierarchy covering the failure classes of
//! the library: value validation, protocol communication, response parsing,
//! app configuration, and device commands.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// App configuration is missing or invalid.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Error occurred while commanding a device.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}

/// Errors related to value validation and constraints.
///
/// These errors occur when attempting to create constrained types
/// with invalid values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// An invalid power state string was provided.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),

    /// An invalid contact state string was provided.
    #[error("invalid contact state: {0}")]
    InvalidContactState(String),

    /// An invalid lock state string was provided.
    #[error("invalid lock state: {0}")]
    InvalidLockState(String),
}

/// Errors related to protocol communication with appliances.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection to the appliance failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Authentication was rejected by the appliance.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Authentication kept failing after the configured number of retries.
    #[error("authentication failed after {attempts} attempts")]
    AuthenticationExhausted {
        /// How many login attempts were made.
        attempts: u32,
    },
}

/// Errors related to parsing appliance responses and history records.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// Unexpected response format.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// Errors related to app configuration.
///
/// Missing configuration aborts the operation early with a logged warning;
/// it never crashes the app task.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting was not provided.
    #[error("missing required setting: {0}")]
    MissingSetting(&'static str),

    /// No devices were configured where at least one is required.
    #[error("no devices configured: {0}")]
    NoDevices(&'static str),

    /// A setting value is invalid.
    #[error("invalid setting {setting}: {message}")]
    InvalidSetting {
        /// The setting that is invalid.
        setting: &'static str,
        /// Description of the problem.
        message: String,
    },
}

/// Errors related to device commands.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Command was rejected by the device.
    #[error("command rejected: {0}")]
    CommandRejected(String),

    /// Device is not reachable.
    #[error("device is unavailable")]
    Unavailable,
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 5,
            max: 180,
            actual: 200,
        };
        assert_eq!(err.to_string(), "value 200 is out of range [5, 180]");
    }

    #[test]
    fn error_from_value_error() {
        let value_err = ValueError::InvalidPowerState("blink".to_string());
        let err: Error = value_err.into();
        assert!(matches!(err, Error::Value(ValueError::InvalidPowerState(_))));
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::MissingSetting("host");
        assert_eq!(err.to_string(), "missing required setting: host");
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("session".to_string());
        assert_eq!(err.to_string(), "missing field in response: session");
    }

    #[test]
    fn auth_exhausted_display() {
        let err = ProtocolError::AuthenticationExhausted { attempts: 5 };
        assert_eq!(err.to_string(), "authentication failed after 5 attempts");
    }
}
