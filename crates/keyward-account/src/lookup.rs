// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fetch-or-fail helpers shared by the services.

use keyward_core::{KdfConfig, KeywardError, MasterPasswordSalt, UserId};
use keyward_crypto::UserKey;

use crate::traits::{AccountApi, KeyStore};

pub(crate) async fn require_salt(
    api: &dyn AccountApi,
    user_id: &UserId,
) -> Result<MasterPasswordSalt, KeywardError> {
    api.salt(user_id)
        .await?
        .ok_or_else(|| KeywardError::Precondition("no salt".to_string()))
}

pub(crate) async fn require_kdf(
    api: &dyn AccountApi,
    user_id: &UserId,
) -> Result<KdfConfig, KeywardError> {
    api.kdf_config(user_id)
        .await?
        .ok_or_else(|| KeywardError::Precondition("no current KDF config".to_string()))
}

pub(crate) async fn require_user_key(
    key_store: &dyn KeyStore,
    user_id: &UserId,
) -> Result<UserKey, KeywardError> {
    key_store
        .user_key(user_id)
        .await?
        .ok_or_else(|| KeywardError::Precondition("no active user key".to_string()))
}
