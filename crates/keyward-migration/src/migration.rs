// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The unit of migration.

use std::sync::Arc;

use async_trait::async_trait;
use keyward_core::{KeywardError, UserId};
use secrecy::SecretString;

use crate::requirement::MigrationRequirement;

/// One versioned change to a user's encrypted data.
///
/// Implementations must be idempotent: once `run_migrations` has succeeded,
/// `needs_migration` reports `NoMigrationNeeded`.
#[async_trait]
pub trait EncryptedMigration: Send + Sync {
    async fn needs_migration(&self, user_id: &UserId)
    -> Result<MigrationRequirement, KeywardError>;

    /// Apply the migration. `master_password` is `None` when the caller has none.
    async fn run_migrations(
        &self,
        user_id: &UserId,
        master_password: Option<&SecretString>,
    ) -> Result<(), KeywardError>;
}

/// A registered migration and the name it logs under.
#[derive(Clone)]
pub struct MigrationRecord {
    pub name: &'static str,
    pub migration: Arc<dyn EncryptedMigration>,
}

impl MigrationRecord {
    pub fn new(name: &'static str, migration: Arc<dyn EncryptedMigration>) -> Self {
        Self { name, migration }
    }
}

impl std::fmt::Debug for MigrationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationRecord")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
