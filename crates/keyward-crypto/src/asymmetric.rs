// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key encapsulation to an X25519 public key.
//!
//! An ephemeral X25519 secret is agreed with the recipient's public key. The
//! shared secret is run through HKDF-SHA256, with
//! `salt = ephemeral_pub || recipient_pub` and the info string below. The
//! result is an AES-256-GCM key that seals the payload key, with the
//! ephemeral public key as AAD.

use keyward_core::KeywardError;
use ring::hkdf;
use zeroize::Zeroizing;

use crate::enc_string::UnsignedSharedKey;
use crate::kdf::OutputLen;
use crate::keys::{KEY_LEN, PrivateKey, PublicKey, SymmetricKey};
use crate::symmetric;

const ENCAPSULATION_INFO: &[u8] = b"keyward-key-encapsulation";

/// Encapsulate `key` so only the holder of `recipient`'s private key can recover it.
pub fn encapsulate_key(
    recipient: &PublicKey,
    key: &SymmetricKey,
) -> Result<UnsignedSharedKey, KeywardError> {
    let ephemeral = PrivateKey::generate()?;
    let ephemeral_public = ephemeral.public_key();

    let shared = ephemeral.diffie_hellman(recipient);
    if !shared.was_contributory() {
        return Err(KeywardError::Crypto(
            "recipient public key is a low-order point".to_string(),
        ));
    }

    let wrapping_key =
        encapsulation_key(shared.as_bytes(), ephemeral_public.as_bytes(), recipient.as_bytes())?;
    let (data, nonce) = symmetric::seal(
        wrapping_key.as_bytes(),
        key.as_bytes(),
        ephemeral_public.as_bytes(),
    )?;

    Ok(UnsignedSharedKey::new(*ephemeral_public.as_bytes(), nonce, data))
}

/// Recover a key encapsulated by [`encapsulate_key`].
///
/// Fails with [`KeywardError::DecryptionFailed`] for the wrong private key
/// or a tampered envelope.
pub fn decapsulate_key(
    private_key: &PrivateKey,
    encapsulated: &UnsignedSharedKey,
) -> Result<SymmetricKey, KeywardError> {
    let ephemeral_public = PublicKey::from_bytes(*encapsulated.ephemeral_public());
    let recipient_public = private_key.public_key();

    let shared = private_key.diffie_hellman(&ephemeral_public);
    if !shared.was_contributory() {
        return Err(KeywardError::DecryptionFailed(
            "encapsulated key uses a low-order ephemeral key".to_string(),
        ));
    }

    let wrapping_key = encapsulation_key(
        shared.as_bytes(),
        ephemeral_public.as_bytes(),
        recipient_public.as_bytes(),
    )?;
    let plaintext = symmetric::open(
        wrapping_key.as_bytes(),
        encapsulated.nonce(),
        encapsulated.data(),
        ephemeral_public.as_bytes(),
    )?;
    SymmetricKey::try_from_slice(&plaintext)
}

fn encapsulation_key(
    shared_secret: &[u8; KEY_LEN],
    ephemeral_public: &[u8; KEY_LEN],
    recipient_public: &[u8; KEY_LEN],
) -> Result<SymmetricKey, KeywardError> {
    let mut salt_bytes = [0u8; 2 * KEY_LEN];
    salt_bytes[..KEY_LEN].copy_from_slice(ephemeral_public);
    salt_bytes[KEY_LEN..].copy_from_slice(recipient_public);

    let prk = hkdf::Salt::new(hkdf::HKDF_SHA256, &salt_bytes).extract(shared_secret);
    let info = [ENCAPSULATION_INFO];
    let okm = prk
        .expand(&info, OutputLen(KEY_LEN))
        .map_err(|_| KeywardError::Crypto("HKDF expand failed".to_string()))?;

    let mut out = Zeroizing::new([0u8; KEY_LEN]);
    okm.fill(out.as_mut())
        .map_err(|_| KeywardError::Crypto("HKDF output fill failed".to_string()))?;
    Ok(SymmetricKey::from_bytes(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encapsulated_key_decapsulates_with_matching_private_key() {
        let recipient = PrivateKey::generate().unwrap();
        let payload = SymmetricKey::generate().unwrap();

        let encapsulated = encapsulate_key(&recipient.public_key(), &payload).unwrap();
        let recovered = decapsulate_key(&recipient, &encapsulated).unwrap();

        assert_eq!(recovered.as_bytes(), payload.as_bytes());
    }

    #[test]
    fn wrong_private_key_fails() {
        let recipient = PrivateKey::generate().unwrap();
        let other = PrivateKey::generate().unwrap();
        let payload = SymmetricKey::generate().unwrap();

        let encapsulated = encapsulate_key(&recipient.public_key(), &payload).unwrap();
        let err = decapsulate_key(&other, &encapsulated).unwrap_err();

        assert!(err.is_wrong_password());
    }

    #[test]
    fn swapped_ephemeral_key_fails() {
        let recipient = PrivateKey::generate().unwrap();
        let payload = SymmetricKey::generate().unwrap();
        let encapsulated = encapsulate_key(&recipient.public_key(), &payload).unwrap();

        let forged_ephemeral = PrivateKey::generate().unwrap().public_key();
        let forged = UnsignedSharedKey::new(
            *forged_ephemeral.as_bytes(),
            *encapsulated.nonce(),
            encapsulated.data().to_vec(),
        );

        assert!(decapsulate_key(&recipient, &forged).is_err());
    }

    #[test]
    fn all_zero_public_key_is_refused() {
        let payload = SymmetricKey::generate().unwrap();
        let err = encapsulate_key(&PublicKey::from_bytes([0u8; KEY_LEN]), &payload).unwrap_err();
        assert!(matches!(err, KeywardError::Crypto(_)));
    }
}
