// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master-key derivation, key stretching, and master-password hashing.
//!
//! - PBKDF2-HMAC-SHA256 runs over the raw salt bytes.
//! - Argon2id (v0x13) runs over `SHA-256(salt)`. Memory is given in MiB and
//!   converted to KiB.
//! - [`stretch_key`] is HKDF-SHA256-Expand with info `"enc"`.

use std::num::NonZeroU32;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use keyward_core::{
    KdfConfig, KeywardError, LocalAuthorizationHash, MasterPasswordAuthenticationHash,
    MasterPasswordSalt,
};
use ring::{digest, hkdf, pbkdf2};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use zeroize::Zeroizing;

use crate::keys::{KEY_LEN, MasterKey, SymmetricKey};

const STRETCH_INFO: &[u8] = b"enc";

/// Requests an HKDF output of a given length from ring.
pub(crate) struct OutputLen(pub(crate) usize);

impl hkdf::KeyType for OutputLen {
    fn len(&self) -> usize {
        self.0
    }
}

/// Why a master-password hash is being computed.
///
/// The purpose selects the PBKDF2 round count, so the two hashes can never
/// be equal for the same inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashPurpose {
    /// Sent to the server to prove knowledge of the password.
    ServerAuthorization,
    /// Kept on this device for offline re-verification.
    LocalAuthorization,
}

impl HashPurpose {
    fn rounds(self) -> NonZeroU32 {
        match self {
            HashPurpose::ServerAuthorization => NonZeroU32::MIN,
            HashPurpose::LocalAuthorization => NonZeroU32::MIN.saturating_add(1),
        }
    }
}

/// Derive the 32-byte master key from the password, salt and KDF configuration.
///
/// Runs on the calling thread. Async callers should use
/// [`derive_master_key_blocking`].
pub fn derive_master_key(
    password: &SecretString,
    salt: &MasterPasswordSalt,
    kdf: &KdfConfig,
) -> Result<MasterKey, KeywardError> {
    derive_from_bytes(password.expose_secret().as_bytes(), salt.as_bytes(), kdf)
}

/// Derive the master key on tokio's blocking pool.
pub async fn derive_master_key_blocking(
    password: &SecretString,
    salt: &MasterPasswordSalt,
    kdf: &KdfConfig,
) -> Result<MasterKey, KeywardError> {
    let password_bytes = Zeroizing::new(password.expose_secret().as_bytes().to_vec());
    let salt_bytes = salt.as_bytes().to_vec();
    let kdf = *kdf;

    tokio::task::spawn_blocking(move || derive_from_bytes(&password_bytes, &salt_bytes, &kdf))
        .await
        .map_err(|e| KeywardError::Internal(format!("KDF task failed: {e}")))?
}

fn derive_from_bytes(
    password: &[u8],
    salt: &[u8],
    kdf: &KdfConfig,
) -> Result<MasterKey, KeywardError> {
    kdf.validate_for_prelogin()?;

    let mut output = Zeroizing::new([0u8; KEY_LEN]);
    match *kdf {
        KdfConfig::Pbkdf2 { iterations } => {
            let iterations = NonZeroU32::new(iterations).ok_or_else(|| {
                KeywardError::InvalidKdfConfig("PBKDF2 iterations must be non-zero".into())
            })?;
            pbkdf2::derive(
                pbkdf2::PBKDF2_HMAC_SHA256,
                iterations,
                salt,
                password,
                output.as_mut(),
            );
        }
        KdfConfig::Argon2id {
            iterations,
            memory_mib,
            parallelism,
        } => {
            let memory_kib = memory_mib.checked_mul(1024).ok_or_else(|| {
                KeywardError::InvalidKdfConfig(format!("Argon2id memory {memory_mib} MiB overflows"))
            })?;
            let params = argon2::Params::new(memory_kib, iterations, parallelism, Some(KEY_LEN))
                .map_err(|e| {
                    KeywardError::InvalidKdfConfig(format!("invalid Argon2id parameters: {e}"))
                })?;
            let argon2 =
                argon2::Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

            let salt_hash = digest::digest(&digest::SHA256, salt);
            argon2
                .hash_password_into(password, salt_hash.as_ref(), output.as_mut())
                .map_err(|e| KeywardError::Crypto(format!("Argon2id key derivation failed: {e}")))?;
        }
    }

    debug!(kdf = %kdf.kdf_type(), "master key derived");
    Ok(MasterKey::from_bytes(output))
}

/// Expand key material into a 32-byte wrapping key (HKDF-SHA256-Expand, info `"enc"`).
pub fn stretch_key(ikm: &[u8]) -> Result<SymmetricKey, KeywardError> {
    let prk = hkdf::Prk::new_less_safe(hkdf::HKDF_SHA256, ikm);
    let info = [STRETCH_INFO];
    let okm = prk
        .expand(&info, OutputLen(KEY_LEN))
        .map_err(|_| KeywardError::Crypto("HKDF expand failed".to_string()))?;

    let mut out = Zeroizing::new([0u8; KEY_LEN]);
    okm.fill(out.as_mut())
        .map_err(|_| KeywardError::Crypto("HKDF output fill failed".to_string()))?;
    Ok(SymmetricKey::from_bytes(out))
}

/// Hash the master key with the password as salt, for the given purpose.
///
/// Returns standard base64.
pub fn hash_master_key(
    master_key: &MasterKey,
    password: &SecretString,
    purpose: HashPurpose,
) -> String {
    let mut out = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        purpose.rounds(),
        password.expose_secret().as_bytes(),
        master_key.as_bytes(),
        out.as_mut(),
    );
    STANDARD.encode(&out[..])
}

/// The hash sent to the server during login, password change, and KDF change.
pub fn server_authorization_hash(
    master_key: &MasterKey,
    password: &SecretString,
) -> MasterPasswordAuthenticationHash {
    MasterPasswordAuthenticationHash::new(hash_master_key(
        master_key,
        password,
        HashPurpose::ServerAuthorization,
    ))
}

/// The hash kept locally for offline password re-prompts.
pub fn local_authorization_hash(
    master_key: &MasterKey,
    password: &SecretString,
) -> LocalAuthorizationHash {
    LocalAuthorizationHash::new(hash_master_key(
        master_key,
        password,
        HashPurpose::LocalAuthorization,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn password(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    fn fast_pbkdf2() -> KdfConfig {
        KdfConfig::Pbkdf2 { iterations: 5_000 }
    }

    fn fast_argon2() -> KdfConfig {
        KdfConfig::Argon2id {
            iterations: 2,
            memory_mib: 16,
            parallelism: 1,
        }
    }

    #[test]
    fn pbkdf2_is_deterministic() {
        let salt = MasterPasswordSalt::from_email("user@example.com");
        let k1 = derive_master_key(&password("hunter2"), &salt, &fast_pbkdf2()).unwrap();
        let k2 = derive_master_key(&password("hunter2"), &salt, &fast_pbkdf2()).unwrap();
        assert_eq!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn argon2_is_deterministic() {
        let salt = MasterPasswordSalt::from_email("user@example.com");
        let k1 = derive_master_key(&password("hunter2"), &salt, &fast_argon2()).unwrap();
        let k2 = derive_master_key(&password("hunter2"), &salt, &fast_argon2()).unwrap();
        assert_eq!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn kdf_choice_changes_the_key() {
        let salt = MasterPasswordSalt::from_email("user@example.com");
        let pbkdf2 = derive_master_key(&password("hunter2"), &salt, &fast_pbkdf2()).unwrap();
        let argon2 = derive_master_key(&password("hunter2"), &salt, &fast_argon2()).unwrap();
        assert_ne!(pbkdf2.as_bytes(), argon2.as_bytes());
    }

    #[test]
    fn different_salt_produces_different_key() {
        let kdf = fast_pbkdf2();
        let k1 = derive_master_key(&password("same"), &MasterPasswordSalt::new("a@x.io"), &kdf)
            .unwrap();
        let k2 = derive_master_key(&password("same"), &MasterPasswordSalt::new("b@x.io"), &kdf)
            .unwrap();
        assert_ne!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn below_prelogin_minimum_is_rejected_before_deriving() {
        let salt = MasterPasswordSalt::new("user@example.com");
        let err = derive_master_key(&password("pw"), &salt, &KdfConfig::Pbkdf2 { iterations: 1 })
            .unwrap_err();
        assert!(matches!(err, KeywardError::InvalidKdfConfig(_)));
    }

    #[test]
    fn server_and_local_hashes_differ() {
        let salt = MasterPasswordSalt::new("user@example.com");
        let pw = password("correct horse");
        let master_key = derive_master_key(&pw, &salt, &fast_pbkdf2()).unwrap();

        let server = server_authorization_hash(&master_key, &pw);
        let local = local_authorization_hash(&master_key, &pw);
        assert_ne!(server.as_str(), local.as_str());
    }

    #[test]
    fn stretch_key_is_deterministic_and_not_identity() {
        let ikm = [5u8; KEY_LEN];
        let a = stretch_key(&ikm).unwrap();
        let b = stretch_key(&ikm).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_ne!(a.as_bytes(), &ikm);
    }

    #[tokio::test]
    async fn blocking_derivation_matches_inline() {
        let salt = MasterPasswordSalt::new("user@example.com");
        let pw = password("off the executor");
        let inline = derive_master_key(&pw, &salt, &fast_pbkdf2()).unwrap();
        let blocking = derive_master_key_blocking(&pw, &salt, &fast_pbkdf2())
            .await
            .unwrap();
        assert_eq!(inline.as_bytes(), blocking.as_bytes());
    }

    proptest::proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(16))]

        #[test]
        fn derivation_is_deterministic_for_any_password(pw in ".{0,64}", email in "[a-z]{1,12}@[a-z]{1,8}\\.com") {
            let salt = MasterPasswordSalt::from_email(&email);
            let first = derive_master_key(&password(&pw), &salt, &fast_pbkdf2()).unwrap();
            let second = derive_master_key(&password(&pw), &salt, &fast_pbkdf2()).unwrap();
            proptest::prop_assert_eq!(first.as_bytes(), second.as_bytes());
        }
    }
}
