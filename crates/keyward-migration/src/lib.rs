// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Login-time migrations of a user's encrypted data.
//!
//! [`EncryptedMigrator`] walks an ordered list of [`EncryptedMigration`]s.
//! Each migration reports a [`MigrationRequirement`]; the ones that need the
//! master password wait until the caller supplies it.

pub mod migration;
pub mod migrator;
pub mod minimum_kdf;
pub mod registry;
pub mod requirement;

pub use migration::{EncryptedMigration, MigrationRecord};
pub use migrator::EncryptedMigrator;
pub use minimum_kdf::MinimumKdfMigration;
pub use registry::{MigrationContext, default_migrations};
pub use requirement::MigrationRequirement;
