// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Keyward key-management core.

use thiserror::Error;

/// The primary error type used across all Keyward crates and collaborator traits.
#[derive(Debug, Error)]
pub enum KeywardError {
    /// A required precondition (active user key, salt, current KDF config)
    /// was missing before the operation started.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// An unrecognized KDF type was encountered while parsing stored or
    /// received parameters.
    #[error("unsupported KDF: {0}")]
    UnsupportedKdf(String),

    /// KDF parameters are outside the accepted bounds.
    #[error("invalid KDF configuration: {0}")]
    InvalidKdfConfig(String),

    /// Wrong password, wrong key, or tampered/incompatible ciphertext.
    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    /// No registered WebAuthn credential with PRF unlock material matched.
    #[error("no WebAuthn PRF credential available for unlock")]
    PrfUnavailable,

    /// The server reported that only part of an atomic update was applied.
    #[error("server applied a partial update: {0}")]
    PartialUpdate(String),

    /// Account API / transport failure, passed through from the collaborator.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// WebAuthn platform failure (user cancelled, no authenticator, timeout).
    #[error("platform error: {message}")]
    Platform {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Key construction or random number generation failed.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Configuration errors (invalid TOML, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl KeywardError {
    /// Convenience constructor for a transport error without an underlying source.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Convenience constructor for a platform error without an underlying source.
    pub fn platform(message: impl Into<String>) -> Self {
        Self::Platform {
            message: message.into(),
            source: None,
        }
    }

    /// Whether this failure most likely means the user typed the wrong password.
    pub fn is_wrong_password(&self) -> bool {
        matches!(self, Self::DecryptionFailed(_))
    }

    /// The message category a UI should show for this error.
    ///
    /// Decryption failures read as a password problem; missing preconditions
    /// and data-model mismatches read as an internal condition.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::DecryptionFailed(_) => "Incorrect password.",
            Self::PrfUnavailable => "Passkey unlock is not available. Use your master password.",
            Self::Transport { .. } => "Could not reach the server. Try again later.",
            Self::Platform { .. } => "The passkey prompt did not complete.",
            Self::InvalidKdfConfig(_) => "The requested key derivation settings are not allowed.",
            Self::Precondition(_)
            | Self::UnsupportedKdf(_)
            | Self::PartialUpdate(_)
            | Self::Crypto(_)
            | Self::Config(_)
            | Self::Internal(_) => {
                "An unexpected error occurred. Log in again or contact support."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decryption_failure_reads_as_password_problem() {
        let err = KeywardError::DecryptionFailed("bad tag".into());
        assert!(err.is_wrong_password());
        assert_eq!(err.user_message(), "Incorrect password.");
    }

    #[test]
    fn precondition_and_unsupported_kdf_read_as_internal() {
        for err in [
            KeywardError::Precondition("no salt".into()),
            KeywardError::UnsupportedKdf("type 9".into()),
        ] {
            assert!(!err.is_wrong_password());
            assert!(err.user_message().contains("unexpected"));
        }
    }

    #[test]
    fn transport_constructor_has_no_source() {
        let err = KeywardError::transport("503 from server");
        assert!(matches!(err, KeywardError::Transport { ref source, .. } if source.is_none()));
        assert_eq!(err.to_string(), "transport error: 503 from server");
    }
}
