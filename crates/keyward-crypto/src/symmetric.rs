// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM (ring) and the [`EncString`] helpers on top of it.
//!
//! [`seal`] draws a new 96-bit nonce from `SystemRandom` on every call.

use keyward_core::KeywardError;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

use crate::enc_string::{EncString, NONCE_LEN};
use crate::keys::{SymmetricKey, KEY_LEN};

/// Encrypt plaintext with AES-256-GCM using a random 96-bit nonce.
///
/// `aad` is authenticated but not encrypted; the same bytes must be passed
/// to [`open`]. Returns `(ciphertext_with_tag, nonce_bytes)`.
pub fn seal(
    key: &[u8; KEY_LEN],
    plaintext: &[u8],
    aad: &[u8],
) -> Result<(Vec<u8>, [u8; NONCE_LEN]), KeywardError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| KeywardError::Crypto("failed to create AES-256-GCM key".to_string()))?;
    let less_safe = LessSafeKey::new(unbound);

    let rng = SystemRandom::new();
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill(&mut nonce_bytes)
        .map_err(|_| KeywardError::Crypto("failed to generate random nonce".to_string()))?;

    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    let mut in_out = plaintext.to_vec();
    less_safe
        .seal_in_place_append_tag(nonce, Aad::from(aad), &mut in_out)
        .map_err(|_| KeywardError::Crypto("AES-256-GCM encryption failed".to_string()))?;

    Ok((in_out, nonce_bytes))
}

/// Decrypt ciphertext with AES-256-GCM.
///
/// Fails with [`KeywardError::DecryptionFailed`] if the key is wrong, the
/// AAD differs, or the data was tampered with.
pub fn open(
    key: &[u8; KEY_LEN],
    nonce_bytes: &[u8; NONCE_LEN],
    ciphertext: &[u8],
    aad: &[u8],
) -> Result<Zeroizing<Vec<u8>>, KeywardError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| KeywardError::Crypto("failed to create AES-256-GCM key".to_string()))?;
    let less_safe = LessSafeKey::new(unbound);

    let nonce = Nonce::assume_unique_for_key(*nonce_bytes);

    let mut in_out = Zeroizing::new(ciphertext.to_vec());
    let plaintext = less_safe
        .open_in_place(nonce, Aad::from(aad), in_out.as_mut_slice())
        .map_err(|_| {
            KeywardError::DecryptionFailed("wrong key or corrupted data".to_string())
        })?;

    Ok(Zeroizing::new(plaintext.to_vec()))
}

/// Encrypt `plaintext` under `key` into an [`EncString`].
pub fn encrypt(key: &SymmetricKey, plaintext: &[u8]) -> Result<EncString, KeywardError> {
    let (data, nonce) = seal(key.as_bytes(), plaintext, &[])?;
    Ok(EncString::new(nonce, data))
}

/// Decrypt an [`EncString`] produced by [`encrypt`].
pub fn decrypt(key: &SymmetricKey, enc: &EncString) -> Result<Zeroizing<Vec<u8>>, KeywardError> {
    open(key.as_bytes(), enc.nonce(), enc.data(), &[])
}

/// Wrap one symmetric key under another.
pub fn wrap_symmetric_key(
    wrapping_key: &SymmetricKey,
    key: &SymmetricKey,
) -> Result<EncString, KeywardError> {
    encrypt(wrapping_key, key.as_bytes())
}

/// Unwrap a symmetric key wrapped by [`wrap_symmetric_key`].
pub fn unwrap_symmetric_key(
    wrapping_key: &SymmetricKey,
    wrapped: &EncString,
) -> Result<SymmetricKey, KeywardError> {
    let bytes = decrypt(wrapping_key, wrapped)?;
    SymmetricKey::try_from_slice(&bytes)
}
