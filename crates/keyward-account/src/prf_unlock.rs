// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passkey unlock through the WebAuthn PRF extension.
//!
//! Each registered credential stores an X25519 private key wrapped under the
//! key derived from that credential's PRF output, and the user key
//! encapsulated to the private key's public half. Unlocking is:
//!
//! 1. assert with the fixed PRF salt;
//! 2. derive the PRF key from the output;
//! 3. unwrap the private key;
//! 4. decapsulate the user key and install it.

use std::sync::Arc;

use keyward_core::{KeywardError, UserId};
use keyward_crypto::{
    PrivateKey, UserKey, decapsulate_key, derive_prf_key, encapsulate_key, prf_salt, symmetric,
};
use tracing::{debug, info, warn};

use crate::lookup::require_user_key;
use crate::traits::{KeyStore, PrfAssertionRequest, PrfCredential, WebAuthnPlatform};

pub struct PrfUnlockService {
    key_store: Arc<dyn KeyStore>,
    webauthn: Arc<dyn WebAuthnPlatform>,
}

impl PrfUnlockService {
    pub fn new(key_store: Arc<dyn KeyStore>, webauthn: Arc<dyn WebAuthnPlatform>) -> Self {
        Self {
            key_store,
            webauthn,
        }
    }

    /// Whether the user has at least one PRF credential registered.
    pub async fn is_prf_unlock_available(&self, user_id: &UserId) -> Result<bool, KeywardError> {
        Ok(!self.key_store.prf_credentials(user_id).await?.is_empty())
    }

    /// Unlock with a passkey. The user key is installed only on success.
    pub async fn unlock_vault_with_prf(&self, user_id: &UserId) -> Result<(), KeywardError> {
        let credentials = self.key_store.prf_credentials(user_id).await?;
        if credentials.is_empty() {
            return Err(KeywardError::PrfUnavailable);
        }

        let request = PrfAssertionRequest {
            allowed_credential_ids: credentials
                .iter()
                .map(|c| c.credential_id.clone())
                .collect(),
            prf_salt: prf_salt(),
        };
        let assertion = self.webauthn.get_prf_assertion(request).await?;

        let Some(credential) = credentials
            .iter()
            .find(|c| c.credential_id == assertion.credential_id)
        else {
            warn!(user_id = %user_id, "assertion returned an unregistered credential");
            return Err(KeywardError::PrfUnavailable);
        };

        let user_key = unwrap_with_prf(credential, &assertion.prf_output)?;
        self.key_store.set_user_key(user_id, user_key).await?;
        info!(user_id = %user_id, "vault unlocked with passkey");
        Ok(())
    }

    /// Register PRF unlock material for a credential. The vault must be unlocked.
    pub async fn enroll_prf_credential(
        &self,
        user_id: &UserId,
        credential_id: Vec<u8>,
        prf_output: &[u8],
    ) -> Result<PrfCredential, KeywardError> {
        let user_key = require_user_key(self.key_store.as_ref(), user_id).await?;
        let credential = build_prf_credential(credential_id, prf_output, &user_key)?;
        self.key_store
            .add_prf_credential(user_id, credential.clone())
            .await?;
        debug!(user_id = %user_id, "PRF credential enrolled");
        Ok(credential)
    }
}

/// Produce the stored material for a credential without touching any store.
pub fn build_prf_credential(
    credential_id: Vec<u8>,
    prf_output: &[u8],
    user_key: &UserKey,
) -> Result<PrfCredential, KeywardError> {
    let prf_key = derive_prf_key(prf_output)?;
    let private_key = PrivateKey::generate()?;

    let encrypted_private_key = symmetric::encrypt(&prf_key, &private_key.to_bytes()[..])?;
    let encrypted_user_key = encapsulate_key(&private_key.public_key(), user_key.as_symmetric())?;

    Ok(PrfCredential {
        credential_id,
        encrypted_private_key,
        encrypted_user_key,
    })
}

fn unwrap_with_prf(credential: &PrfCredential, prf_output: &[u8]) -> Result<UserKey, KeywardError> {
    let prf_key = derive_prf_key(prf_output)?;
    let private_bytes = symmetric::decrypt(&prf_key, &credential.encrypted_private_key)?;
    let private_key = PrivateKey::try_from_slice(&private_bytes)
        .map_err(|_| KeywardError::DecryptionFailed("PRF private key is malformed".to_string()))?;
    let key = decapsulate_key(&private_key, &credential.encrypted_user_key)?;
    Ok(UserKey::new(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_unwraps_with_its_prf_output() {
        let user_key = UserKey::generate().unwrap();
        let credential = build_prf_credential(vec![1, 2, 3], &[7u8; 32], &user_key).unwrap();

        let unwrapped = unwrap_with_prf(&credential, &[7u8; 32]).unwrap();
        assert_eq!(unwrapped.as_bytes(), user_key.as_bytes());
    }

    #[test]
    fn other_prf_output_is_rejected() {
        let user_key = UserKey::generate().unwrap();
        let credential = build_prf_credential(vec![1], &[7u8; 32], &user_key).unwrap();

        let err = unwrap_with_prf(&credential, &[8u8; 32]).unwrap_err();
        assert!(err.is_wrong_password());
    }

    #[test]
    fn swapped_user_key_envelope_is_rejected() {
        let user_key = UserKey::generate().unwrap();
        let mut credential = build_prf_credential(vec![1], &[7u8; 32], &user_key).unwrap();
        let other = build_prf_credential(vec![2], &[9u8; 32], &user_key).unwrap();
        credential.encrypted_user_key = other.encrypted_user_key;

        assert!(unwrap_with_prf(&credential, &[7u8; 32]).unwrap_err().is_wrong_password());
    }
}
