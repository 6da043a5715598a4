// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Unlocking, verifying and changing the master password.

use std::sync::Arc;

use keyward_core::{KeywardError, LocalAuthorizationHash, UserId};
use keyward_crypto::{
    MasterKey, UserKey, authentication_data_with_master_key, derive_master_key_blocking,
    local_authorization_hash, unlock_data_with_master_key, unwrap_user_key,
};
use secrecy::SecretString;
use tracing::{debug, info};

use crate::lookup::{require_kdf, require_salt};
use crate::request::PasswordRequest;
use crate::staging::submit_with_staged_key;
use crate::traits::{AccountApi, KeyStore};

/// Master-password operations for a set of users.
pub struct MasterPasswordService {
    api: Arc<dyn AccountApi>,
    key_store: Arc<dyn KeyStore>,
}

impl MasterPasswordService {
    pub fn new(api: Arc<dyn AccountApi>, key_store: Arc<dyn KeyStore>) -> Self {
        Self { api, key_store }
    }

    /// Unwrap the stored user key with an already derived master key.
    ///
    /// This is the only local password check: a wrong master key fails AEAD
    /// authentication and yields [`KeywardError::DecryptionFailed`].
    pub async fn decrypt_user_key_with_master_key(
        &self,
        master_key: &MasterKey,
        user_id: &UserId,
    ) -> Result<UserKey, KeywardError> {
        let wrapped = self
            .key_store
            .master_key_wrapped_user_key(user_id)
            .await?
            .ok_or_else(|| {
                KeywardError::Precondition("no master-key-wrapped user key".to_string())
            })?;
        unwrap_user_key(master_key, &wrapped)
    }

    /// Check `password` against the stored wrapped key and return the user key.
    ///
    /// Nothing is installed in the key store.
    pub async fn verify_master_password(
        &self,
        user_id: &UserId,
        password: &SecretString,
    ) -> Result<UserKey, KeywardError> {
        let master_key = self.derive(user_id, password).await?;
        let user_key = self
            .decrypt_user_key_with_master_key(&master_key, user_id)
            .await?;
        debug!(user_id = %user_id, "master password verified");
        Ok(user_key)
    }

    /// Verify `password` and install the user key.
    pub async fn unlock_with_master_password(
        &self,
        user_id: &UserId,
        password: &SecretString,
    ) -> Result<(), KeywardError> {
        let user_key = self.verify_master_password(user_id, password).await?;
        self.key_store.set_user_key(user_id, user_key).await?;
        info!(user_id = %user_id, "vault unlocked with master password");
        Ok(())
    }

    /// The hash kept on-device for offline password re-prompts.
    pub async fn local_authorization_hash(
        &self,
        user_id: &UserId,
        password: &SecretString,
    ) -> Result<LocalAuthorizationHash, KeywardError> {
        let master_key = self.derive(user_id, password).await?;
        Ok(local_authorization_hash(&master_key, password))
    }

    /// Change the master password, keeping the user key and the KDF settings.
    ///
    /// `current` is verified locally first. The new wrapped key is stored
    /// before submitting and put back if the server does not fully apply it.
    pub async fn change_master_password(
        &self,
        user_id: &UserId,
        current: &SecretString,
        new: &SecretString,
        hint: Option<String>,
    ) -> Result<(), KeywardError> {
        let salt = require_salt(self.api.as_ref(), user_id).await?;
        let kdf = require_kdf(self.api.as_ref(), user_id).await?;

        let current_key = derive_master_key_blocking(current, &salt, &kdf).await?;
        let user_key = self
            .decrypt_user_key_with_master_key(&current_key, user_id)
            .await?;
        let current_auth = authentication_data_with_master_key(&current_key, current, &kdf, &salt);
        drop(current_key);

        let new_key = derive_master_key_blocking(new, &salt, &kdf).await?;
        let authentication = authentication_data_with_master_key(&new_key, new, &kdf, &salt);
        let unlock = unlock_data_with_master_key(&new_key, &kdf, &salt, &user_key)?;
        let wrapped = unlock.master_key_wrapped_user_key.clone();

        let request = PasswordRequest::new(
            current_auth.master_password_authentication_hash,
            authentication,
            unlock,
            hint,
        )?;
        submit_with_staged_key(
            self.key_store.as_ref(),
            user_id,
            wrapped,
            self.api.post_password(user_id, request),
        )
        .await?;
        info!(user_id = %user_id, "master password changed");
        Ok(())
    }

    async fn derive(
        &self,
        user_id: &UserId,
        password: &SecretString,
    ) -> Result<MasterKey, KeywardError> {
        let salt = require_salt(self.api.as_ref(), user_id).await?;
        let kdf = require_kdf(self.api.as_ref(), user_id).await?;
        derive_master_key_blocking(password, &salt, &kdf).await
    }
}
