// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request bodies for password and KDF changes.
//!
//! The server is mid-transition between a flat legacy body and structured
//! authentication/unlock objects, so [`PasswordRequest`] carries both. The
//! legacy fields are copied from the structured data in [`PasswordRequest::new`]
//! and cannot be set independently.

use keyward_core::{KdfConfig, KeywardError, MasterPasswordAuthenticationHash};
use keyward_crypto::{EncString, MasterPasswordAuthenticationData, MasterPasswordUnlockData};
use serde::Serialize;

/// A master-password change (also the base of a KDF change).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordRequest {
    authentication_data: MasterPasswordAuthenticationData,
    unlock_data: MasterPasswordUnlockData,

    /// Legacy: hash proving the current password.
    master_password_hash: MasterPasswordAuthenticationHash,
    /// Legacy: `authentication_data.master_password_authentication_hash`.
    new_master_password_hash: MasterPasswordAuthenticationHash,
    /// Legacy: `unlock_data.master_key_wrapped_user_key`.
    key: EncString,
    #[serde(skip_serializing_if = "Option::is_none")]
    master_password_hint: Option<String>,
}

impl PasswordRequest {
    /// Build a request from the current password's hash and the new data.
    ///
    /// Fails with [`KeywardError::Internal`] if the authentication and unlock
    /// data were not produced under the same salt and KDF.
    pub fn new(
        current_hash: MasterPasswordAuthenticationHash,
        authentication_data: MasterPasswordAuthenticationData,
        unlock_data: MasterPasswordUnlockData,
        hint: Option<String>,
    ) -> Result<Self, KeywardError> {
        if authentication_data.salt != unlock_data.salt {
            return Err(KeywardError::Internal(
                "authentication and unlock data use different salts".to_string(),
            ));
        }
        if authentication_data.kdf != unlock_data.kdf {
            return Err(KeywardError::Internal(
                "authentication and unlock data use different KDF settings".to_string(),
            ));
        }

        Ok(Self {
            new_master_password_hash: authentication_data
                .master_password_authentication_hash
                .clone(),
            key: unlock_data.master_key_wrapped_user_key.clone(),
            master_password_hash: current_hash,
            authentication_data,
            unlock_data,
            master_password_hint: hint,
        })
    }

    pub fn authentication_data(&self) -> &MasterPasswordAuthenticationData {
        &self.authentication_data
    }

    pub fn unlock_data(&self) -> &MasterPasswordUnlockData {
        &self.unlock_data
    }

    pub fn master_password_hash(&self) -> &MasterPasswordAuthenticationHash {
        &self.master_password_hash
    }

    pub fn new_master_password_hash(&self) -> &MasterPasswordAuthenticationHash {
        &self.new_master_password_hash
    }

    pub fn key(&self) -> &EncString {
        &self.key
    }

    pub fn master_password_hint(&self) -> Option<&str> {
        self.master_password_hint.as_deref()
    }
}

/// A KDF change: a password request plus the flat KDF fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KdfRequest {
    #[serde(flatten)]
    password: PasswordRequest,
    kdf: u8,
    kdf_iterations: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    kdf_memory: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kdf_parallelism: Option<u32>,
}

impl KdfRequest {
    /// The KDF fields are taken from the request's unlock data.
    pub fn new(password: PasswordRequest) -> Self {
        let kdf = password.unlock_data.kdf;
        Self {
            kdf: kdf.kdf_type().id(),
            kdf_iterations: kdf.iterations(),
            kdf_memory: kdf.memory_mib(),
            kdf_parallelism: kdf.parallelism(),
            password,
        }
    }

    pub fn password(&self) -> &PasswordRequest {
        &self.password
    }

    pub fn new_kdf(&self) -> KdfConfig {
        self.password.unlock_data.kdf
    }

    pub fn kdf_type_id(&self) -> u8 {
        self.kdf
    }

    pub fn kdf_iterations(&self) -> u32 {
        self.kdf_iterations
    }

    pub fn kdf_memory(&self) -> Option<u32> {
        self.kdf_memory
    }

    pub fn kdf_parallelism(&self) -> Option<u32> {
        self.kdf_parallelism
    }
}

/// How the server answered a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Applied,
    /// The server reports it applied only part of the change.
    PartiallyApplied { detail: String },
}

impl SubmissionOutcome {
    /// `PartiallyApplied` becomes [`KeywardError::PartialUpdate`].
    pub fn into_result(self) -> Result<(), KeywardError> {
        match self {
            SubmissionOutcome::Applied => Ok(()),
            SubmissionOutcome::PartiallyApplied { detail } => {
                Err(KeywardError::PartialUpdate(detail))
            }
        }
    }
}
