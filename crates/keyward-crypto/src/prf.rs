// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebAuthn PRF key material.

use keyward_core::KeywardError;
use ring::digest;

use crate::kdf::stretch_key;
use crate::keys::{KEY_LEN, SymmetricKey};

const PRF_SALT_INPUT: &[u8] = b"passwordless-login";

/// The fixed PRF evaluation salt sent with every unlock assertion.
pub fn prf_salt() -> [u8; KEY_LEN] {
    let hash = digest::digest(&digest::SHA256, PRF_SALT_INPUT);
    let mut salt = [0u8; KEY_LEN];
    salt.copy_from_slice(hash.as_ref());
    salt
}

/// Turn an authenticator's PRF output into the key that wraps the private key.
pub fn derive_prf_key(prf_output: &[u8]) -> Result<SymmetricKey, KeywardError> {
    if prf_output.len() < KEY_LEN {
        return Err(KeywardError::Crypto(format!(
            "PRF output too short ({} bytes, need {KEY_LEN})",
            prf_output.len()
        )));
    }
    stretch_key(prf_output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prf_salt_is_fixed() {
        assert_eq!(prf_salt(), prf_salt());
        assert_ne!(prf_salt(), [0u8; KEY_LEN]);
    }

    #[test]
    fn short_prf_output_is_rejected() {
        assert!(matches!(
            derive_prf_key(&[1u8; 16]),
            Err(KeywardError::Crypto(_))
        ));
    }

    #[test]
    fn distinct_prf_outputs_give_distinct_keys() {
        let a = derive_prf_key(&[1u8; 32]).unwrap();
        let b = derive_prf_key(&[2u8; 32]).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }
}
