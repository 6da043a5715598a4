// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-derivation function configuration.
//!
//! [`KdfConfig`] is a plain value type. It serializes to the server's flat
//! `{ kdfType, iterations, memory, parallelism }` shape through [`KdfParams`],
//! which is also where unknown type ids are rejected.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::KeywardError;

/// PBKDF2 iteration floor and ceiling for newly set parameters.
pub const PBKDF2_ITERATIONS_MIN: u32 = 600_000;
pub const PBKDF2_ITERATIONS_MAX: u32 = 2_000_000;
pub const PBKDF2_ITERATIONS_DEFAULT: u32 = 600_000;
/// Lowest PBKDF2 iteration count still accepted when deriving from stored parameters.
pub const PBKDF2_PRELOGIN_ITERATIONS_MIN: u32 = 5_000;

pub const ARGON2_ITERATIONS_MIN: u32 = 2;
pub const ARGON2_ITERATIONS_MAX: u32 = 10;
pub const ARGON2_ITERATIONS_DEFAULT: u32 = 3;
pub const ARGON2_MEMORY_MIB_MIN: u32 = 16;
pub const ARGON2_MEMORY_MIB_MAX: u32 = 1024;
pub const ARGON2_MEMORY_MIB_DEFAULT: u32 = 64;
pub const ARGON2_PARALLELISM_MIN: u32 = 1;
pub const ARGON2_PARALLELISM_MAX: u32 = 16;
pub const ARGON2_PARALLELISM_DEFAULT: u32 = 4;

/// KDF algorithm identifier, with the numeric ids used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum KdfType {
    Pbkdf2,
    Argon2id,
}

impl KdfType {
    pub fn id(self) -> u8 {
        match self {
            KdfType::Pbkdf2 => 0,
            KdfType::Argon2id => 1,
        }
    }
}

impl TryFrom<u8> for KdfType {
    type Error = KeywardError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(KdfType::Pbkdf2),
            1 => Ok(KdfType::Argon2id),
            other => Err(KeywardError::UnsupportedKdf(format!(
                "unknown KDF type id {other}"
            ))),
        }
    }
}

/// A key-derivation function together with its cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "KdfParams", into = "KdfParams")]
pub enum KdfConfig {
    /// PBKDF2-HMAC-SHA256.
    Pbkdf2 { iterations: u32 },
    /// Argon2id v1.3.
    Argon2id {
        iterations: u32,
        memory_mib: u32,
        parallelism: u32,
    },
}

impl Default for KdfConfig {
    fn default() -> Self {
        Self::default_pbkdf2()
    }
}

impl KdfConfig {
    pub fn default_pbkdf2() -> Self {
        KdfConfig::Pbkdf2 {
            iterations: PBKDF2_ITERATIONS_DEFAULT,
        }
    }

    pub fn default_argon2id() -> Self {
        KdfConfig::Argon2id {
            iterations: ARGON2_ITERATIONS_DEFAULT,
            memory_mib: ARGON2_MEMORY_MIB_DEFAULT,
            parallelism: ARGON2_PARALLELISM_DEFAULT,
        }
    }

    pub fn kdf_type(&self) -> KdfType {
        match self {
            KdfConfig::Pbkdf2 { .. } => KdfType::Pbkdf2,
            KdfConfig::Argon2id { .. } => KdfType::Argon2id,
        }
    }

    pub fn iterations(&self) -> u32 {
        match *self {
            KdfConfig::Pbkdf2 { iterations } | KdfConfig::Argon2id { iterations, .. } => {
                iterations
            }
        }
    }

    pub fn memory_mib(&self) -> Option<u32> {
        match *self {
            KdfConfig::Pbkdf2 { .. } => None,
            KdfConfig::Argon2id { memory_mib, .. } => Some(memory_mib),
        }
    }

    pub fn parallelism(&self) -> Option<u32> {
        match *self {
            KdfConfig::Pbkdf2 { .. } => None,
            KdfConfig::Argon2id { parallelism, .. } => Some(parallelism),
        }
    }

    /// Check bounds for parameters a client is about to set.
    pub fn validate_for_setting(&self) -> Result<(), KeywardError> {
        match *self {
            KdfConfig::Pbkdf2 { iterations } => check_range(
                "PBKDF2 iterations",
                iterations,
                PBKDF2_ITERATIONS_MIN,
                PBKDF2_ITERATIONS_MAX,
            ),
            KdfConfig::Argon2id {
                iterations,
                memory_mib,
                parallelism,
            } => {
                check_range(
                    "Argon2id iterations",
                    iterations,
                    ARGON2_ITERATIONS_MIN,
                    ARGON2_ITERATIONS_MAX,
                )?;
                check_range(
                    "Argon2id memory (MiB)",
                    memory_mib,
                    ARGON2_MEMORY_MIB_MIN,
                    ARGON2_MEMORY_MIB_MAX,
                )?;
                check_range(
                    "Argon2id parallelism",
                    parallelism,
                    ARGON2_PARALLELISM_MIN,
                    ARGON2_PARALLELISM_MAX,
                )
            }
        }
    }

    /// Check the looser minimums accepted for parameters already on the account.
    ///
    /// Only lower bounds apply; stored parameters above the setting ceiling
    /// still derive.
    pub fn validate_for_prelogin(&self) -> Result<(), KeywardError> {
        match *self {
            KdfConfig::Pbkdf2 { iterations } => check_min(
                "PBKDF2 iterations",
                iterations,
                PBKDF2_PRELOGIN_ITERATIONS_MIN,
            ),
            KdfConfig::Argon2id {
                iterations,
                memory_mib,
                parallelism,
            } => {
                check_min("Argon2id iterations", iterations, ARGON2_ITERATIONS_MIN)?;
                check_min("Argon2id memory (MiB)", memory_mib, ARGON2_MEMORY_MIB_MIN)?;
                check_min("Argon2id parallelism", parallelism, ARGON2_PARALLELISM_MIN)
            }
        }
    }
}

impl fmt::Display for KdfConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            KdfConfig::Pbkdf2 { iterations } => {
                write!(f, "PBKDF2-SHA256 ({iterations} iterations)")
            }
            KdfConfig::Argon2id {
                iterations,
                memory_mib,
                parallelism,
            } => write!(
                f,
                "Argon2id ({iterations} iterations, {memory_mib} MiB, parallelism {parallelism})"
            ),
        }
    }
}

fn check_range(what: &str, value: u32, min: u32, max: u32) -> Result<(), KeywardError> {
    if value < min || value > max {
        return Err(KeywardError::InvalidKdfConfig(format!(
            "{what} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

fn check_min(what: &str, value: u32, min: u32) -> Result<(), KeywardError> {
    if value < min {
        return Err(KeywardError::InvalidKdfConfig(format!(
            "{what} must be at least {min}, got {value}"
        )));
    }
    Ok(())
}

/// Flat wire representation of a [`KdfConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KdfParams {
    pub kdf_type: u8,
    pub iterations: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<u32>,
}

impl From<KdfConfig> for KdfParams {
    fn from(config: KdfConfig) -> Self {
        KdfParams {
            kdf_type: config.kdf_type().id(),
            iterations: config.iterations(),
            memory: config.memory_mib(),
            parallelism: config.parallelism(),
        }
    }
}

impl TryFrom<KdfParams> for KdfConfig {
    type Error = KeywardError;

    fn try_from(params: KdfParams) -> Result<Self, Self::Error> {
        match KdfType::try_from(params.kdf_type)? {
            KdfType::Pbkdf2 => Ok(KdfConfig::Pbkdf2 {
                iterations: params.iterations,
            }),
            KdfType::Argon2id => {
                let memory_mib = params.memory.ok_or_else(|| {
                    KeywardError::InvalidKdfConfig("Argon2id config is missing memory".into())
                })?;
                let parallelism = params.parallelism.ok_or_else(|| {
                    KeywardError::InvalidKdfConfig(
                        "Argon2id config is missing parallelism".into(),
                    )
                })?;
                Ok(KdfConfig::Argon2id {
                    iterations: params.iterations,
                    memory_mib,
                    parallelism,
                })
            }
        }
    }
}
