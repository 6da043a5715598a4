// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration for Keyward.
//!
//! TOML files from the system, user and working directories are merged over
//! compiled defaults, then `KEYWARD_*` environment variables are applied.
//! Unknown keys are errors, reported through miette with typo suggestions.
//!
//! ```no_run
//! let config = keyward_config::load_and_validate().expect("config errors");
//! println!("KDF default: {}", config.kdf.default_kdf_config());
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_str};
pub use model::{KdfSettings, KeywardConfig, LoggingSettings, MigrationSettings};

/// Load from the standard hierarchy and validate.
pub fn load_and_validate() -> Result<KeywardConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => finish(config),
        Err(err) => Err(diagnostic::figment_to_config_errors(
            err,
            &collect_toml_sources(),
        )),
    }
}

/// Load from an inline TOML string and validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<KeywardConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => finish(config),
        Err(err) => Err(diagnostic::figment_to_config_errors(
            err,
            &[("<inline>".to_string(), toml_content.to_string())],
        )),
    }
}

/// Load from one file, apply environment overrides, and validate.
pub fn load_config_from_path(path: &Path) -> Result<KeywardConfig, Vec<ConfigError>> {
    match loader::load_config_from_path(path) {
        Ok(config) => finish(config),
        Err(err) => {
            let sources: Vec<_> = std::fs::read_to_string(path)
                .map(|content| vec![(path.display().to_string(), content)])
                .unwrap_or_default();
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

fn finish(config: KeywardConfig) -> Result<KeywardConfig, Vec<ConfigError>> {
    validation::validate_config(&config)?;
    tracing::debug!(
        kdf = %config.kdf.default_kdf_config(),
        min_pbkdf2_iterations = config.migration.min_pbkdf2_iterations,
        "configuration loaded"
    );
    Ok(config)
}

fn collect_toml_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|d| d.join(loader::LOCAL_CONFIG_PATH))
        .unwrap_or_else(|_| loader::LOCAL_CONFIG_PATH.into());

    [
        Some(local),
        loader::user_config_path(),
        Some(loader::SYSTEM_CONFIG_PATH.into()),
    ]
    .into_iter()
    .flatten()
    .filter_map(|path| {
        std::fs::read_to_string(&path)
            .ok()
            .map(|content| (path.display().to_string(), content))
    })
    .collect()
}
