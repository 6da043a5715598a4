// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication and unlock data derived from the master password.
//!
//! Authentication data goes to the server. Unlock data carries the user key
//! wrapped under the master key. A pair submitted together must come from the
//! same master key and KDF config; [`make_master_password_data`] builds both
//! from one derivation.

use keyward_core::{KdfConfig, KeywardError, MasterPasswordAuthenticationHash, MasterPasswordSalt};
use secrecy::SecretString;
use serde::Serialize;

use crate::enc_string::EncString;
use crate::kdf::{derive_master_key, server_authorization_hash, stretch_key};
use crate::keys::{MasterKey, UserKey};
use crate::symmetric;

/// What the server needs to verify the master password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterPasswordAuthenticationData {
    pub salt: MasterPasswordSalt,
    pub kdf: KdfConfig,
    pub master_password_authentication_hash: MasterPasswordAuthenticationHash,
}

/// What a client needs to reproduce the master key and unwrap the user key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterPasswordUnlockData {
    pub salt: MasterPasswordSalt,
    pub kdf: KdfConfig,
    pub master_key_wrapped_user_key: EncString,
}

/// Derive the master key and return server authentication data.
pub fn make_authentication_data(
    password: &SecretString,
    kdf: &KdfConfig,
    salt: &MasterPasswordSalt,
) -> Result<MasterPasswordAuthenticationData, KeywardError> {
    let master_key = derive_master_key(password, salt, kdf)?;
    Ok(authentication_data_with_master_key(
        &master_key,
        password,
        kdf,
        salt,
    ))
}

/// Derive the master key and wrap `user_key` under it.
pub fn make_unlock_data(
    password: &SecretString,
    kdf: &KdfConfig,
    salt: &MasterPasswordSalt,
    user_key: &UserKey,
) -> Result<MasterPasswordUnlockData, KeywardError> {
    let master_key = derive_master_key(password, salt, kdf)?;
    unlock_data_with_master_key(&master_key, kdf, salt, user_key)
}

/// Both halves from one derivation.
pub fn make_master_password_data(
    password: &SecretString,
    kdf: &KdfConfig,
    salt: &MasterPasswordSalt,
    user_key: &UserKey,
) -> Result<(MasterPasswordAuthenticationData, MasterPasswordUnlockData), KeywardError> {
    let master_key = derive_master_key(password, salt, kdf)?;
    let authentication = authentication_data_with_master_key(&master_key, password, kdf, salt);
    let unlock = unlock_data_with_master_key(&master_key, kdf, salt, user_key)?;
    Ok((authentication, unlock))
}

/// Authentication data from an already derived master key.
///
/// `master_key` must have been derived from `password`, `salt` and `kdf`.
pub fn authentication_data_with_master_key(
    master_key: &MasterKey,
    password: &SecretString,
    kdf: &KdfConfig,
    salt: &MasterPasswordSalt,
) -> MasterPasswordAuthenticationData {
    MasterPasswordAuthenticationData {
        salt: salt.clone(),
        kdf: *kdf,
        master_password_authentication_hash: server_authorization_hash(master_key, password),
    }
}

/// Unlock data from an already derived master key.
pub fn unlock_data_with_master_key(
    master_key: &MasterKey,
    kdf: &KdfConfig,
    salt: &MasterPasswordSalt,
    user_key: &UserKey,
) -> Result<MasterPasswordUnlockData, KeywardError> {
    Ok(MasterPasswordUnlockData {
        salt: salt.clone(),
        kdf: *kdf,
        master_key_wrapped_user_key: wrap_user_key(master_key, user_key)?,
    })
}

/// Wrap the user key under the stretched master key.
pub fn wrap_user_key(master_key: &MasterKey, user_key: &UserKey) -> Result<EncString, KeywardError> {
    let wrapping_key = stretch_key(master_key.as_bytes())?;
    symmetric::wrap_symmetric_key(&wrapping_key, user_key.as_symmetric())
}

/// Unwrap the user key. A wrong master key yields
/// [`KeywardError::DecryptionFailed`], never wrong plaintext.
pub fn unwrap_user_key(master_key: &MasterKey, wrapped: &EncString) -> Result<UserKey, KeywardError> {
    let wrapping_key = stretch_key(master_key.as_bytes())?;
    let key = symmetric::unwrap_symmetric_key(&wrapping_key, wrapped)?;
    Ok(UserKey::new(key))
}
