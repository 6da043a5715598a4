// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks run after deserialization. All failures are collected.

use keyward_core::KdfConfig;
use keyward_core::kdf::{PBKDF2_ITERATIONS_MAX, PBKDF2_ITERATIONS_MIN};

use crate::diagnostic::ConfigError;
use crate::model::KeywardConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

pub fn validate_config(config: &KeywardConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.kdf.default_kdf_config().validate_for_setting() {
        errors.push(ConfigError::validation(format!("kdf: {e}")));
    }

    let migration = &config.migration;
    if migration.target_pbkdf2_iterations < migration.min_pbkdf2_iterations {
        errors.push(ConfigError::validation(format!(
            "migration.target_pbkdf2_iterations ({}) must be at least migration.min_pbkdf2_iterations ({})",
            migration.target_pbkdf2_iterations, migration.min_pbkdf2_iterations
        )));
    }
    let target = KdfConfig::Pbkdf2 {
        iterations: migration.target_pbkdf2_iterations,
    };
    if target.validate_for_setting().is_err() {
        errors.push(ConfigError::validation(format!(
            "migration.target_pbkdf2_iterations must be between {PBKDF2_ITERATIONS_MIN} and {PBKDF2_ITERATIONS_MAX}, got {}",
            migration.target_pbkdf2_iterations
        )));
    }

    let level = config.logging.level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "logging.level `{}` is not one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use keyward_core::KdfType;

    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&KeywardConfig::default()).is_ok());
    }

    #[test]
    fn weak_default_kdf_is_rejected() {
        let mut config = KeywardConfig::default();
        config.kdf.pbkdf2_iterations = 100_000;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("kdf"));
    }

    #[test]
    fn argon2_fields_are_only_checked_when_selected() {
        let mut config = KeywardConfig::default();
        config.kdf.argon2_memory_mib = 1;
        assert!(validate_config(&config).is_ok());

        config.kdf.default_type = KdfType::Argon2id;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn target_below_floor_is_rejected() {
        let mut config = KeywardConfig::default();
        config.migration.min_pbkdf2_iterations = 800_000;
        config.migration.target_pbkdf2_iterations = 700_000;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("at least"));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = KeywardConfig::default();
        config.kdf.pbkdf2_iterations = 1;
        config.migration.target_pbkdf2_iterations = 5_000_000;
        config.logging.level = "loud".to_string();
        assert_eq!(validate_config(&config).unwrap_err().len(), 3);
    }
}
