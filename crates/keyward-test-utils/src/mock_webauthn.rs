// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;
use keyward_account::{PrfAssertion, PrfAssertionRequest, WebAuthnPlatform};
use keyward_core::KeywardError;
use tokio::sync::Mutex;
use zeroize::Zeroizing;

enum Behavior {
    Respond {
        credential_id: Vec<u8>,
        prf_output: Zeroizing<Vec<u8>>,
    },
    Fail(String),
}

/// A [`WebAuthnPlatform`] that answers every assertion the same way.
///
/// Until configured it fails as if the user cancelled.
pub struct MockWebAuthn {
    behavior: Mutex<Behavior>,
    requests: Mutex<Vec<PrfAssertionRequest>>,
}

impl MockWebAuthn {
    pub fn new() -> Self {
        Self {
            behavior: Mutex::new(Behavior::Fail("user cancelled".to_string())),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub async fn respond_with(&self, credential_id: Vec<u8>, prf_output: &[u8]) {
        *self.behavior.lock().await = Behavior::Respond {
            credential_id,
            prf_output: Zeroizing::new(prf_output.to_vec()),
        };
    }

    pub async fn fail_with(&self, message: &str) {
        *self.behavior.lock().await = Behavior::Fail(message.to_string());
    }

    pub async fn requests(&self) -> Vec<PrfAssertionRequest> {
        self.requests.lock().await.clone()
    }
}

impl Default for MockWebAuthn {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebAuthnPlatform for MockWebAuthn {
    async fn get_prf_assertion(
        &self,
        request: PrfAssertionRequest,
    ) -> Result<PrfAssertion, KeywardError> {
        self.requests.lock().await.push(request);
        match &*self.behavior.lock().await {
            Behavior::Respond {
                credential_id,
                prf_output,
            } => Ok(PrfAssertion {
                credential_id: credential_id.clone(),
                prf_output: prf_output.clone(),
            }),
            Behavior::Fail(message) => Err(KeywardError::platform(message.clone())),
        }
    }
}
