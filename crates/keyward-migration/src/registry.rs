// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The migrations shipped with Keyward, in the order they run.
//!
//! New migrations are appended to [`default_migrations`]. A migration that
//! depends on another's result is listed after it.

use std::sync::Arc;

use keyward_account::{
    AccountApi, ChangeKdfService, FeatureFlagProvider, KeyStore, MasterPasswordService,
};
use keyward_config::KeywardConfig;

use crate::migration::MigrationRecord;
use crate::migrator::EncryptedMigrator;
use crate::minimum_kdf::MinimumKdfMigration;

/// The collaborators the shipped migrations need.
#[derive(Clone)]
pub struct MigrationContext {
    pub api: Arc<dyn AccountApi>,
    pub key_store: Arc<dyn KeyStore>,
    pub flags: Arc<dyn FeatureFlagProvider>,
    pub config: KeywardConfig,
}

pub fn default_migrations(context: &MigrationContext) -> Vec<MigrationRecord> {
    let master_password = Arc::new(MasterPasswordService::new(
        context.api.clone(),
        context.key_store.clone(),
    ));
    let change_kdf = Arc::new(ChangeKdfService::new(
        context.api.clone(),
        context.key_store.clone(),
    ));

    vec![MigrationRecord::new(
        MinimumKdfMigration::NAME,
        Arc::new(MinimumKdfMigration::new(
            context.api.clone(),
            context.flags.clone(),
            master_password,
            change_kdf,
            &context.config.migration,
        )),
    )]
}

impl EncryptedMigrator {
    /// A migrator running [`default_migrations`].
    pub fn with_default_migrations(context: &MigrationContext) -> Self {
        Self::new(default_migrations(context))
    }
}
