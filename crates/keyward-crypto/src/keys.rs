// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory key types.
//!
//! Every key lives in zeroizing memory and prints as `[REDACTED]`.
//! [`MasterKey`] has no `Clone`; it exists only for the length of one
//! derivation chain.

use std::fmt;

use keyward_core::KeywardError;
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::{Zeroize, Zeroizing};

/// Length in bytes of every symmetric key in the system.
pub const KEY_LEN: usize = 32;

/// Fill a fresh 32-byte buffer from the system CSPRNG.
pub(crate) fn random_key_bytes() -> Result<Zeroizing<[u8; KEY_LEN]>, KeywardError> {
    let rng = SystemRandom::new();
    let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
    rng.fill(bytes.as_mut())
        .map_err(|_| KeywardError::Crypto("failed to generate random key".to_string()))?;
    Ok(bytes)
}

/// A 256-bit AES-GCM key.
#[derive(Clone)]
pub struct SymmetricKey(Zeroizing<[u8; KEY_LEN]>);

impl SymmetricKey {
    pub fn generate() -> Result<Self, KeywardError> {
        Ok(Self(random_key_bytes()?))
    }

    pub fn from_bytes(bytes: Zeroizing<[u8; KEY_LEN]>) -> Self {
        Self(bytes)
    }

    /// Build a key from decrypted bytes; anything but 32 bytes is rejected.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, KeywardError> {
        let array: [u8; KEY_LEN] = bytes.try_into().map_err(|_| {
            KeywardError::DecryptionFailed(format!(
                "unexpected key length {} (expected {KEY_LEN})",
                bytes.len()
            ))
        })?;
        Ok(Self(Zeroizing::new(array)))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}

/// The account's root symmetric key. Decrypts every other account secret.
#[derive(Clone)]
pub struct UserKey(SymmetricKey);

impl UserKey {
    pub fn new(key: SymmetricKey) -> Self {
        Self(key)
    }

    pub fn generate() -> Result<Self, KeywardError> {
        Ok(Self(SymmetricKey::generate()?))
    }

    pub fn as_symmetric(&self) -> &SymmetricKey {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserKey([REDACTED])")
    }
}

/// KDF output from the master password. Never persisted, never cloned.
pub struct MasterKey(Zeroizing<[u8; KEY_LEN]>);

impl MasterKey {
    pub(crate) fn from_bytes(bytes: Zeroizing<[u8; KEY_LEN]>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey([REDACTED])")
    }
}

/// X25519 private key used to decapsulate the user key during PRF unlock.
pub struct PrivateKey(x25519_dalek::StaticSecret);

impl PrivateKey {
    pub fn generate() -> Result<Self, KeywardError> {
        let mut bytes = [0u8; KEY_LEN];
        SystemRandom::new()
            .fill(&mut bytes)
            .map_err(|_| KeywardError::Crypto("failed to generate random key".to_string()))?;
        Ok(Self::from_array(bytes))
    }

    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, KeywardError> {
        let array: [u8; KEY_LEN] = bytes.try_into().map_err(|_| {
            KeywardError::DecryptionFailed(format!(
                "unexpected private key length {} (expected {KEY_LEN})",
                bytes.len()
            ))
        })?;
        Ok(Self::from_array(array))
    }

    /// `StaticSecret` only takes the array by value. The caller's copy is
    /// scrubbed once it has been moved in; the secret zeroizes itself on drop.
    fn from_array(mut bytes: [u8; KEY_LEN]) -> Self {
        let secret = x25519_dalek::StaticSecret::from(bytes);
        bytes.zeroize();
        Self(secret)
    }

    pub fn to_bytes(&self) -> Zeroizing<[u8; KEY_LEN]> {
        Zeroizing::new(self.0.to_bytes())
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(x25519_dalek::PublicKey::from(&self.0))
    }

    pub(crate) fn diffie_hellman(&self, public: &PublicKey) -> x25519_dalek::SharedSecret {
        self.0.diffie_hellman(&public.0)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

/// X25519 public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey(x25519_dalek::PublicKey);

impl PublicKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(x25519_dalek::PublicKey::from(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        self.0.as_bytes()
    }
}
