// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The platform WebAuthn client.

use async_trait::async_trait;
use keyward_core::KeywardError;
use zeroize::Zeroizing;

/// A `get()` ceremony with the PRF extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrfAssertionRequest {
    /// Credentials the authenticator may answer with.
    pub allowed_credential_ids: Vec<Vec<u8>>,
    /// The PRF `eval.first` input.
    pub prf_salt: [u8; 32],
}

/// A successful assertion.
pub struct PrfAssertion {
    pub credential_id: Vec<u8>,
    pub prf_output: Zeroizing<Vec<u8>>,
}

impl std::fmt::Debug for PrfAssertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrfAssertion")
            .field("credential_id", &self.credential_id)
            .field("prf_output", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
pub trait WebAuthnPlatform: Send + Sync {
    /// Run the assertion. User cancellation and missing PRF support are
    /// reported as [`KeywardError::Platform`].
    async fn get_prf_assertion(
        &self,
        request: PrfAssertionRequest,
    ) -> Result<PrfAssertion, KeywardError>;
}
