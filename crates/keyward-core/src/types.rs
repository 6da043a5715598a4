// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identifier and opaque-string newtypes.
//!
//! Salts and hashes are all strings on the wire. Each gets its own type so
//! they cannot be passed in each other's place.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Account identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Salt input to the master-password KDF. Stable for the life of the account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MasterPasswordSalt(String);

impl MasterPasswordSalt {
    /// Wrap a salt exactly as stored server-side.
    pub fn new(salt: impl Into<String>) -> Self {
        Self(salt.into())
    }

    /// Build the canonical salt for an account email (trimmed, lowercased).
    pub fn from_email(email: &str) -> Self {
        Self(email.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Base64 hash proving knowledge of the master password to the server.
///
/// Never usable as key material. Debug output is redacted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MasterPasswordAuthenticationHash(String);

impl MasterPasswordAuthenticationHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MasterPasswordAuthenticationHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterPasswordAuthenticationHash([REDACTED])")
    }
}

/// Base64 hash used only for offline re-verification on this device.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalAuthorizationHash(String);

impl LocalAuthorizationHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LocalAuthorizationHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LocalAuthorizationHash([REDACTED])")
    }
}
