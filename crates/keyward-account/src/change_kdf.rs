// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rotating a user's KDF parameters.

use std::sync::Arc;

use keyward_core::{KdfConfig, KeywardError, UserId};
use keyward_crypto::{
    authentication_data_with_master_key, derive_master_key_blocking, unlock_data_with_master_key,
};
use secrecy::SecretString;
use tracing::{debug, info};

use crate::lookup::{require_kdf, require_salt, require_user_key};
use crate::request::{KdfRequest, PasswordRequest};
use crate::staging::submit_with_staged_key;
use crate::traits::{AccountApi, KeyStore};

/// Re-derives the master key under new KDF parameters and submits the change.
///
/// The password is not checked here. Callers verify it first, for example
/// with [`crate::MasterPasswordService::verify_master_password`]. Calls for
/// the same user must not overlap.
pub struct ChangeKdfService {
    api: Arc<dyn AccountApi>,
    key_store: Arc<dyn KeyStore>,
}

impl ChangeKdfService {
    pub fn new(api: Arc<dyn AccountApi>, key_store: Arc<dyn KeyStore>) -> Self {
        Self { api, key_store }
    }

    /// Switch `user_id` to `new_kdf`, keeping the same password and user key.
    ///
    /// The new wrapped key is stored before submitting and put back if the
    /// submission fails. A partially applied response fails with
    /// [`KeywardError::PartialUpdate`].
    pub async fn update_user_kdf_params(
        &self,
        password: &SecretString,
        new_kdf: &KdfConfig,
        user_id: &UserId,
    ) -> Result<(), KeywardError> {
        new_kdf.validate_for_setting()?;

        let user_key = require_user_key(self.key_store.as_ref(), user_id).await?;
        let salt = require_salt(self.api.as_ref(), user_id).await?;
        let old_kdf = require_kdf(self.api.as_ref(), user_id).await?;

        let old_key = derive_master_key_blocking(password, &salt, &old_kdf).await?;
        let old_auth = authentication_data_with_master_key(&old_key, password, &old_kdf, &salt);
        drop(old_key);

        let new_key = derive_master_key_blocking(password, &salt, new_kdf).await?;
        let authentication = authentication_data_with_master_key(&new_key, password, new_kdf, &salt);
        let unlock = unlock_data_with_master_key(&new_key, new_kdf, &salt, &user_key)?;
        let wrapped = unlock.master_key_wrapped_user_key.clone();
        debug!(user_id = %user_id, from = %old_kdf, to = %new_kdf, "KDF change prepared");

        let request = KdfRequest::new(PasswordRequest::new(
            old_auth.master_password_authentication_hash,
            authentication,
            unlock,
            None,
        )?);
        submit_with_staged_key(
            self.key_store.as_ref(),
            user_id,
            wrapped,
            self.api.post_kdf(user_id, request),
        )
        .await?;
        info!(user_id = %user_id, kdf = %new_kdf, "KDF parameters updated");
        Ok(())
    }
}
