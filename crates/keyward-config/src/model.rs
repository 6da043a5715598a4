// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so that a misspelled key is
//! reported at load time instead of being silently ignored.

use keyward_core::kdf::{
    ARGON2_ITERATIONS_DEFAULT, ARGON2_MEMORY_MIB_DEFAULT, ARGON2_PARALLELISM_DEFAULT,
    PBKDF2_ITERATIONS_DEFAULT, PBKDF2_ITERATIONS_MIN,
};
use keyward_core::{KdfConfig, KdfType};
use serde::{Deserialize, Serialize};

/// Top-level Keyward configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeywardConfig {
    /// KDF parameters for newly created accounts.
    #[serde(default)]
    pub kdf: KdfSettings,

    /// Thresholds for the login-time migrations.
    #[serde(default)]
    pub migration: MigrationSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Default KDF parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KdfSettings {
    /// `pbkdf2` or `argon2id`.
    #[serde(default = "default_kdf_type")]
    pub default_type: KdfType,

    #[serde(default = "default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,

    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2id memory in MiB.
    #[serde(default = "default_argon2_memory_mib")]
    pub argon2_memory_mib: u32,

    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

impl KdfSettings {
    /// The configured default as a [`KdfConfig`].
    ///
    /// Only the fields belonging to `default_type` are used.
    pub fn default_kdf_config(&self) -> KdfConfig {
        match self.default_type {
            KdfType::Pbkdf2 => KdfConfig::Pbkdf2 {
                iterations: self.pbkdf2_iterations,
            },
            KdfType::Argon2id => KdfConfig::Argon2id {
                iterations: self.argon2_iterations,
                memory_mib: self.argon2_memory_mib,
                parallelism: self.argon2_parallelism,
            },
        }
    }
}

impl Default for KdfSettings {
    fn default() -> Self {
        Self {
            default_type: default_kdf_type(),
            pbkdf2_iterations: default_pbkdf2_iterations(),
            argon2_iterations: default_argon2_iterations(),
            argon2_memory_mib: default_argon2_memory_mib(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

fn default_kdf_type() -> KdfType {
    KdfType::Pbkdf2
}

fn default_pbkdf2_iterations() -> u32 {
    PBKDF2_ITERATIONS_DEFAULT
}

fn default_argon2_iterations() -> u32 {
    ARGON2_ITERATIONS_DEFAULT
}

fn default_argon2_memory_mib() -> u32 {
    ARGON2_MEMORY_MIB_DEFAULT
}

fn default_argon2_parallelism() -> u32 {
    ARGON2_PARALLELISM_DEFAULT
}

/// Minimum-KDF migration thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MigrationSettings {
    /// PBKDF2 accounts below this iteration count are upgraded at login.
    #[serde(default = "default_min_pbkdf2_iterations")]
    pub min_pbkdf2_iterations: u32,

    /// Iteration count the upgrade sets.
    #[serde(default = "default_target_pbkdf2_iterations")]
    pub target_pbkdf2_iterations: u32,
}

impl Default for MigrationSettings {
    fn default() -> Self {
        Self {
            min_pbkdf2_iterations: default_min_pbkdf2_iterations(),
            target_pbkdf2_iterations: default_target_pbkdf2_iterations(),
        }
    }
}

fn default_min_pbkdf2_iterations() -> u32 {
    PBKDF2_ITERATIONS_MIN
}

fn default_target_pbkdf2_iterations() -> u32 {
    PBKDF2_ITERATIONS_DEFAULT
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    /// One of trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_kdf_defaults() {
        let config = KeywardConfig::default();
        assert_eq!(config.kdf.default_kdf_config(), KdfConfig::default_pbkdf2());
        assert_eq!(config.migration.min_pbkdf2_iterations, 600_000);
        assert_eq!(config.migration.target_pbkdf2_iterations, 600_000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn argon2_default_type_uses_argon2_fields() {
        let settings = KdfSettings {
            default_type: KdfType::Argon2id,
            ..KdfSettings::default()
        };
        assert_eq!(settings.default_kdf_config(), KdfConfig::default_argon2id());
    }

    #[test]
    fn kdf_type_parses_lowercase_in_toml() {
        let settings: KdfSettings = toml::from_str("default_type = \"argon2id\"").unwrap();
        assert_eq!(settings.default_type, KdfType::Argon2id);
    }
}
