// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user key storage.

use async_trait::async_trait;
use keyward_core::{KeywardError, UserId};
use keyward_crypto::{EncString, UnsignedSharedKey, UserKey};
use serde::{Deserialize, Serialize};

/// A passkey registered for PRF unlock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrfCredential {
    pub credential_id: Vec<u8>,
    /// The X25519 private key, wrapped under the key derived from the PRF output.
    pub encrypted_private_key: EncString,
    /// The user key, encapsulated to that private key's public half.
    pub encrypted_user_key: UnsignedSharedKey,
}

/// Storage for the unlocked user key and the material needed to recover it.
///
/// The unlocked user key is in-memory state. The wrapped key and the PRF
/// credentials are persisted by the implementor.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// The user key if the vault is unlocked.
    async fn user_key(&self, user_id: &UserId) -> Result<Option<UserKey>, KeywardError>;

    async fn set_user_key(&self, user_id: &UserId, key: UserKey) -> Result<(), KeywardError>;

    async fn master_key_wrapped_user_key(
        &self,
        user_id: &UserId,
    ) -> Result<Option<EncString>, KeywardError>;

    async fn set_master_key_wrapped_user_key(
        &self,
        user_id: &UserId,
        wrapped: EncString,
    ) -> Result<(), KeywardError>;

    async fn prf_credentials(&self, user_id: &UserId) -> Result<Vec<PrfCredential>, KeywardError>;

    async fn add_prf_credential(
        &self,
        user_id: &UserId,
        credential: PrfCredential,
    ) -> Result<(), KeywardError>;
}
