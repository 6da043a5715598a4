// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use keyward_account::{KeyStore, PrfCredential};
use keyward_core::{KeywardError, UserId};
use keyward_crypto::{EncString, UserKey};
use tokio::sync::Mutex;

#[derive(Default)]
struct Entry {
    user_key: Option<UserKey>,
    wrapped_user_key: Option<EncString>,
    prf_credentials: Vec<PrfCredential>,
}

/// A [`KeyStore`] held entirely in memory.
///
/// Writes of the wrapped user key can be made to fail, as a full disk would.
#[derive(Default)]
pub struct MemoryKeyStore {
    entries: Mutex<HashMap<UserId, Entry>>,
    fail_wrapped_key_writes: AtomicBool,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the unlocked user key, as a vault lock would.
    pub async fn lock(&self, user_id: &UserId) {
        if let Some(entry) = self.entries.lock().await.get_mut(user_id) {
            entry.user_key = None;
        }
    }

    pub async fn has_user_key(&self, user_id: &UserId) -> bool {
        self.entries
            .lock()
            .await
            .get(user_id)
            .is_some_and(|e| e.user_key.is_some())
    }

    /// Make `set_master_key_wrapped_user_key` fail with `Internal("disk full")`.
    pub fn fail_wrapped_key_writes(&self, fail: bool) {
        self.fail_wrapped_key_writes.store(fail, Ordering::SeqCst);
    }

    /// Replace every stored PRF credential.
    pub async fn replace_prf_credentials(&self, user_id: &UserId, credentials: Vec<PrfCredential>) {
        self.entries
            .lock()
            .await
            .entry(user_id.clone())
            .or_default()
            .prf_credentials = credentials;
    }
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    async fn user_key(&self, user_id: &UserId) -> Result<Option<UserKey>, KeywardError> {
        Ok(self
            .entries
            .lock()
            .await
            .get(user_id)
            .and_then(|e| e.user_key.clone()))
    }

    async fn set_user_key(&self, user_id: &UserId, key: UserKey) -> Result<(), KeywardError> {
        self.entries
            .lock()
            .await
            .entry(user_id.clone())
            .or_default()
            .user_key = Some(key);
        Ok(())
    }

    async fn master_key_wrapped_user_key(
        &self,
        user_id: &UserId,
    ) -> Result<Option<EncString>, KeywardError> {
        Ok(self
            .entries
            .lock()
            .await
            .get(user_id)
            .and_then(|e| e.wrapped_user_key.clone()))
    }

    async fn set_master_key_wrapped_user_key(
        &self,
        user_id: &UserId,
        wrapped: EncString,
    ) -> Result<(), KeywardError> {
        if self.fail_wrapped_key_writes.load(Ordering::SeqCst) {
            return Err(KeywardError::Internal("disk full".to_string()));
        }
        self.entries
            .lock()
            .await
            .entry(user_id.clone())
            .or_default()
            .wrapped_user_key = Some(wrapped);
        Ok(())
    }

    async fn prf_credentials(&self, user_id: &UserId) -> Result<Vec<PrfCredential>, KeywardError> {
        Ok(self
            .entries
            .lock()
            .await
            .get(user_id)
            .map(|e| e.prf_credentials.clone())
            .unwrap_or_default())
    }

    async fn add_prf_credential(
        &self,
        user_id: &UserId,
        credential: PrfCredential,
    ) -> Result<(), KeywardError> {
        self.entries
            .lock()
            .await
            .entry(user_id.clone())
            .or_default()
            .prf_credentials
            .push(credential);
        Ok(())
    }
}
