// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raise weak PBKDF2 iteration counts at login.

use std::sync::Arc;

use async_trait::async_trait;
use keyward_account::{
    AccountApi, ChangeKdfService, FeatureFlag, FeatureFlagProvider, MasterPasswordService,
};
use keyward_config::MigrationSettings;
use keyward_core::{KdfConfig, KeywardError, UserId};
use secrecy::SecretString;
use tracing::info;

use crate::migration::EncryptedMigration;
use crate::requirement::MigrationRequirement;

/// Upgrades PBKDF2 accounts below `min_iterations` to `target_iterations`.
///
/// Only runs for accounts with a master password, and only while
/// [`FeatureFlag::ForceUpdateKdfSettings`] is on. The flag is read on every
/// check.
pub struct MinimumKdfMigration {
    api: Arc<dyn AccountApi>,
    flags: Arc<dyn FeatureFlagProvider>,
    master_password: Arc<MasterPasswordService>,
    change_kdf: Arc<ChangeKdfService>,
    min_iterations: u32,
    target_iterations: u32,
}

impl MinimumKdfMigration {
    pub const NAME: &'static str = "minimum-kdf";

    pub fn new(
        api: Arc<dyn AccountApi>,
        flags: Arc<dyn FeatureFlagProvider>,
        master_password: Arc<MasterPasswordService>,
        change_kdf: Arc<ChangeKdfService>,
        settings: &MigrationSettings,
    ) -> Self {
        Self {
            api,
            flags,
            master_password,
            change_kdf,
            min_iterations: settings.min_pbkdf2_iterations,
            target_iterations: settings.target_pbkdf2_iterations,
        }
    }

    fn is_below_floor(&self, kdf: &KdfConfig) -> bool {
        matches!(kdf, KdfConfig::Pbkdf2 { iterations } if *iterations < self.min_iterations)
    }
}

#[async_trait]
impl EncryptedMigration for MinimumKdfMigration {
    async fn needs_migration(
        &self,
        user_id: &UserId,
    ) -> Result<MigrationRequirement, KeywardError> {
        if !self.api.has_master_password(user_id).await? {
            return Ok(MigrationRequirement::NoMigrationNeeded);
        }
        let Some(kdf) = self.api.kdf_config(user_id).await? else {
            return Ok(MigrationRequirement::NoMigrationNeeded);
        };
        if !self.is_below_floor(&kdf) {
            return Ok(MigrationRequirement::NoMigrationNeeded);
        }
        if !self
            .flags
            .is_enabled(FeatureFlag::ForceUpdateKdfSettings)
            .await?
        {
            return Ok(MigrationRequirement::NoMigrationNeeded);
        }
        Ok(MigrationRequirement::NeedsMigrationWithMasterPassword)
    }

    async fn run_migrations(
        &self,
        user_id: &UserId,
        master_password: Option<&SecretString>,
    ) -> Result<(), KeywardError> {
        let password = master_password
            .ok_or_else(|| KeywardError::Precondition("master password required".to_string()))?;

        self.master_password
            .verify_master_password(user_id, password)
            .await?;

        let target = KdfConfig::Pbkdf2 {
            iterations: self.target_iterations,
        };
        self.change_kdf
            .update_user_kdf_params(password, &target, user_id)
            .await?;

        info!(user_id = %user_id, iterations = self.target_iterations, "PBKDF2 iterations raised");
        Ok(())
    }
}
