// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text envelopes for wrapped keys.
//!
//! - [`EncString`]: `7.<nonce>|<ciphertext+tag>` (AES-256-GCM)
//! - [`UnsignedSharedKey`]: `8.<ephemeral public key>|<nonce>|<ciphertext+tag>`
//!   (X25519 + HKDF-SHA256 + AES-256-GCM)
//!
//! All parts are standard base64. Parse failures are reported as
//! [`KeywardError::DecryptionFailed`] because a malformed envelope cannot
//! be unwrapped.

use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use keyward_core::KeywardError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::keys::KEY_LEN;

/// AES-GCM nonce length (96 bits).
pub const NONCE_LEN: usize = 12;

const ENC_STRING_TYPE: &str = "7";
const SHARED_KEY_TYPE: &str = "8";

/// Symmetrically encrypted payload.
#[derive(Clone, PartialEq, Eq)]
pub struct EncString {
    nonce: [u8; NONCE_LEN],
    data: Vec<u8>,
}

impl EncString {
    pub fn new(nonce: [u8; NONCE_LEN], data: Vec<u8>) -> Self {
        Self { nonce, data }
    }

    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    /// Ciphertext with the 16-byte authentication tag appended.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for EncString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{ENC_STRING_TYPE}.{}|{}",
            STANDARD.encode(self.nonce),
            STANDARD.encode(&self.data)
        )
    }
}

impl fmt::Debug for EncString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncString")
            .field("type", &ENC_STRING_TYPE)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl FromStr for EncString {
    type Err = KeywardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = split_envelope(s, ENC_STRING_TYPE, 2)?;
        let nonce = fixed::<NONCE_LEN>(&parts[0], "nonce")?;
        Ok(Self {
            nonce,
            data: parts[1].clone(),
        })
    }
}

/// A symmetric key encapsulated to an X25519 public key.
#[derive(Clone, PartialEq, Eq)]
pub struct UnsignedSharedKey {
    ephemeral_public: [u8; KEY_LEN],
    nonce: [u8; NONCE_LEN],
    data: Vec<u8>,
}

impl UnsignedSharedKey {
    pub fn new(ephemeral_public: [u8; KEY_LEN], nonce: [u8; NONCE_LEN], data: Vec<u8>) -> Self {
        Self {
            ephemeral_public,
            nonce,
            data,
        }
    }

    pub fn ephemeral_public(&self) -> &[u8; KEY_LEN] {
        &self.ephemeral_public
    }

    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for UnsignedSharedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{SHARED_KEY_TYPE}.{}|{}|{}",
            STANDARD.encode(self.ephemeral_public),
            STANDARD.encode(self.nonce),
            STANDARD.encode(&self.data)
        )
    }
}

impl fmt::Debug for UnsignedSharedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnsignedSharedKey")
            .field("type", &SHARED_KEY_TYPE)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl FromStr for UnsignedSharedKey {
    type Err = KeywardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = split_envelope(s, SHARED_KEY_TYPE, 3)?;
        Ok(Self {
            ephemeral_public: fixed::<KEY_LEN>(&parts[0], "ephemeral public key")?,
            nonce: fixed::<NONCE_LEN>(&parts[1], "nonce")?,
            data: parts[2].clone(),
        })
    }
}

fn split_envelope(s: &str, expected_type: &str, part_count: usize) -> Result<Vec<Vec<u8>>, KeywardError> {
    let (enc_type, body) = s
        .split_once('.')
        .ok_or_else(|| KeywardError::DecryptionFailed("missing envelope type prefix".into()))?;
    if enc_type != expected_type {
        return Err(KeywardError::DecryptionFailed(format!(
            "unsupported envelope type `{enc_type}` (expected `{expected_type}`)"
        )));
    }

    let parts: Vec<&str> = body.split('|').collect();
    if parts.len() != part_count {
        return Err(KeywardError::DecryptionFailed(format!(
            "envelope has {} parts (expected {part_count})",
            parts.len()
        )));
    }

    parts
        .into_iter()
        .map(|part| {
            STANDARD
                .decode(part)
                .map_err(|e| KeywardError::DecryptionFailed(format!("invalid base64 in envelope: {e}")))
        })
        .collect()
}

fn fixed<const N: usize>(bytes: &[u8], what: &str) -> Result<[u8; N], KeywardError> {
    bytes.try_into().map_err(|_| {
        KeywardError::DecryptionFailed(format!(
            "corrupted {what} (expected {N} bytes, got {})",
            bytes.len()
        ))
    })
}

macro_rules! string_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_serde!(EncString);
string_serde!(UnsignedSharedKey);
