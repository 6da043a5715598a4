// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server account API.

use async_trait::async_trait;
use keyward_core::{KdfConfig, KeywardError, MasterPasswordSalt, UserId};

use crate::request::{KdfRequest, PasswordRequest, SubmissionOutcome};

/// The account endpoints the core needs. Transport is the implementor's concern.
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// The user's master-password salt, if the account has one.
    async fn salt(&self, user_id: &UserId) -> Result<Option<MasterPasswordSalt>, KeywardError>;

    /// The user's current KDF parameters.
    async fn kdf_config(&self, user_id: &UserId) -> Result<Option<KdfConfig>, KeywardError>;

    /// False for accounts that unlock only through SSO, passkeys, or trusted devices.
    async fn has_master_password(&self, user_id: &UserId) -> Result<bool, KeywardError>;

    /// Submit a master-password change.
    async fn post_password(
        &self,
        user_id: &UserId,
        request: PasswordRequest,
    ) -> Result<SubmissionOutcome, KeywardError>;

    /// Submit a KDF change. The server applies hash, key, and parameters together.
    async fn post_kdf(
        &self,
        user_id: &UserId,
        request: KdfRequest,
    ) -> Result<SubmissionOutcome, KeywardError>;
}
