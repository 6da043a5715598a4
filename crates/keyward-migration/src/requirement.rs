// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use strum::Display;

/// How urgently a migration wants to run, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum MigrationRequirement {
    NoMigrationNeeded,
    NeedsMigration,
    /// Needs to run and cannot without the user's master password.
    NeedsMigrationWithMasterPassword,
}

impl MigrationRequirement {
    /// The most severe requirement, or `NoMigrationNeeded` for none.
    pub fn reduce(requirements: impl IntoIterator<Item = Self>) -> Self {
        requirements
            .into_iter()
            .max()
            .unwrap_or(MigrationRequirement::NoMigrationNeeded)
    }

    pub fn is_needed(self) -> bool {
        self != MigrationRequirement::NoMigrationNeeded
    }

    pub fn requires_master_password(self) -> bool {
        self == MigrationRequirement::NeedsMigrationWithMasterPassword
    }
}

#[cfg(test)]
mod tests {
    use super::MigrationRequirement::*;
    use super::*;

    #[test]
    fn empty_reduces_to_nothing_needed() {
        assert_eq!(
            MigrationRequirement::reduce(Vec::<MigrationRequirement>::new()),
            NoMigrationNeeded
        );
    }

    #[test]
    fn reduce_picks_the_most_severe() {
        assert_eq!(
            MigrationRequirement::reduce([NeedsMigration, NoMigrationNeeded]),
            NeedsMigration
        );
        assert_eq!(
            MigrationRequirement::reduce([
                NeedsMigrationWithMasterPassword,
                NeedsMigration,
                NoMigrationNeeded
            ]),
            NeedsMigrationWithMasterPassword
        );
    }

    #[test]
    fn severity_order_is_total() {
        assert!(NoMigrationNeeded < NeedsMigration);
        assert!(NeedsMigration < NeedsMigrationWithMasterPassword);
    }

    #[test]
    fn displays_snake_case() {
        assert_eq!(
            NeedsMigrationWithMasterPassword.to_string(),
            "needs_migration_with_master_password"
        );
    }
}
