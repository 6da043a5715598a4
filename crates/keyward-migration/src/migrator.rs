// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runs the registered migrations for a user, one pass at a time.
//!
//! The application builds one migrator at startup and shares it. A pass holds
//! the migrator's run flag for its whole duration; a second pass that starts
//! meanwhile returns immediately instead of waiting. The flag is released by
//! a guard, so an error, a panic or a dropped future all release it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use keyward_core::{KeywardError, UserId};
use secrecy::SecretString;
use tracing::{debug, error, info, warn};

use crate::migration::MigrationRecord;
use crate::requirement::MigrationRequirement;

pub struct EncryptedMigrator {
    migrations: Vec<MigrationRecord>,
    is_running_migration: AtomicBool,
}

/// Clears the run flag on drop.
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| RunGuard(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl EncryptedMigrator {
    /// Migrations run in the order given.
    pub fn new(migrations: Vec<MigrationRecord>) -> Self {
        Self {
            migrations,
            is_running_migration: AtomicBool::new(false),
        }
    }

    pub fn migration_names(&self) -> Vec<&'static str> {
        self.migrations.iter().map(|m| m.name).collect()
    }

    /// Whether a pass is in progress.
    pub fn is_running(&self) -> bool {
        self.is_running_migration.load(Ordering::Acquire)
    }

    /// The most severe requirement across all registered migrations.
    pub async fn needs_migrations(
        &self,
        user_id: &UserId,
    ) -> Result<MigrationRequirement, KeywardError> {
        let mut requirements = Vec::with_capacity(self.migrations.len());
        for record in &self.migrations {
            requirements.push(record.migration.needs_migration(user_id).await?);
        }
        Ok(MigrationRequirement::reduce(requirements))
    }

    /// Run every migration that currently needs to run.
    ///
    /// Returns `Ok(())` without doing anything when nothing is needed, when a
    /// password is needed and none was given, or when another pass holds the
    /// run flag. The first failing migration aborts the pass and its error is
    /// returned; migrations already applied stay applied.
    pub async fn run_migrations(
        &self,
        user_id: &UserId,
        master_password: Option<&SecretString>,
    ) -> Result<(), KeywardError> {
        let requirement = self.needs_migrations(user_id).await?;
        if !requirement.is_needed() {
            return Ok(());
        }
        if requirement.requires_master_password() && master_password.is_none() {
            debug!(user_id = %user_id, "migrations need the master password, deferring");
            return Ok(());
        }

        let Some(_guard) = RunGuard::try_acquire(&self.is_running_migration) else {
            info!(user_id = %user_id, "migration pass already running, skipping");
            return Ok(());
        };

        info!(user_id = %user_id, %requirement, "starting migration pass");
        for record in &self.migrations {
            self.run_one(record, user_id, master_password).await?;
        }
        info!(user_id = %user_id, "migration pass finished");
        Ok(())
    }

    async fn run_one(
        &self,
        record: &MigrationRecord,
        user_id: &UserId,
        master_password: Option<&SecretString>,
    ) -> Result<(), KeywardError> {
        let requirement = record.migration.needs_migration(user_id).await?;
        match requirement {
            MigrationRequirement::NoMigrationNeeded => return Ok(()),
            MigrationRequirement::NeedsMigrationWithMasterPassword
                if master_password.is_none() =>
            {
                warn!(
                    migration = record.name,
                    user_id = %user_id,
                    "skipping migration that needs the master password"
                );
                return Ok(());
            }
            _ => {}
        }

        let started = Instant::now();
        if let Err(e) = record.migration.run_migrations(user_id, master_password).await {
            error!(
                migration = record.name,
                user_id = %user_id,
                error = %e,
                "migration failed, aborting pass"
            );
            return Err(e);
        }
        info!(
            migration = record.name,
            user_id = %user_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "migration applied"
        );
        Ok(())
    }
}

impl std::fmt::Debug for EncryptedMigrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedMigrator")
            .field("migrations", &self.migration_names())
            .field("is_running", &self.is_running())
            .finish()
    }
}
