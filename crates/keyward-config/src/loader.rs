// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-based layered loading.
//!
//! Lookup order: `/etc/keyward/keyward.toml`, then
//! `~/.config/keyward/keyward.toml`, then `./keyward.toml`, then `KEYWARD_*`
//! environment variables. Later sources win.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::KeywardConfig;

pub(crate) const SYSTEM_CONFIG_PATH: &str = "/etc/keyward/keyward.toml";
pub(crate) const LOCAL_CONFIG_PATH: &str = "keyward.toml";

/// Sections that `KEYWARD_<SECTION>_<KEY>` variables may address.
const ENV_SECTIONS: &[&str] = &["kdf", "migration", "logging"];

/// The per-user config file, if the platform has a config directory.
pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("keyward").join("keyward.toml"))
}

/// Build the full layered figment without extracting it.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(KeywardConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH));
    if let Some(path) = user_config_path() {
        figment = figment.merge(Toml::file(path));
    }
    figment
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Load from the standard file hierarchy plus environment overrides.
pub fn load_config() -> Result<KeywardConfig, figment::Error> {
    build_figment().extract()
}

/// Load from a TOML string on top of the defaults. No files, no environment.
pub fn load_config_from_str(toml_content: &str) -> Result<KeywardConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KeywardConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load from one explicit file, with environment overrides.
pub fn load_config_from_path(path: &Path) -> Result<KeywardConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KeywardConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// `KEYWARD_MIGRATION_MIN_PBKDF2_ITERATIONS` becomes
/// `migration.min_pbkdf2_iterations`.
///
/// Only the section prefix is split off; the key keeps its underscores.
fn env_provider() -> Env {
    Env::prefixed("KEYWARD_").map(|key| map_env_key(key.as_str()).into())
}

pub(crate) fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_on_section_only() {
        assert_eq!(
            map_env_key("migration_min_pbkdf2_iterations"),
            "migration.min_pbkdf2_iterations"
        );
        assert_eq!(map_env_key("kdf_argon2_memory_mib"), "kdf.argon2_memory_mib");
        assert_eq!(map_env_key("logging_level"), "logging.level");
    }

    #[test]
    fn unknown_section_is_left_alone() {
        assert_eq!(map_env_key("vault_path"), "vault_path");
        assert_eq!(map_env_key("kdfless"), "kdfless");
    }
}
