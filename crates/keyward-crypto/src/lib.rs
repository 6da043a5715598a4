// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cryptographic primitives for master-password and passkey unlock.
//!
//! The key hierarchy:
//! - the master key is derived from the password (PBKDF2 or Argon2id) and wraps
//!   the user key;
//! - the PRF key is derived from a WebAuthn PRF output and wraps an X25519
//!   private key, to which the user key is also encapsulated.
//!
//! Nothing here performs I/O. Key types zeroize on drop.

pub mod asymmetric;
pub mod enc_string;
pub mod kdf;
pub mod keys;
pub mod master_password;
pub mod prf;
pub mod symmetric;

pub use asymmetric::{decapsulate_key, encapsulate_key};
pub use enc_string::{EncString, UnsignedSharedKey};
pub use kdf::{
    HashPurpose, derive_master_key, derive_master_key_blocking, local_authorization_hash,
    server_authorization_hash, stretch_key,
};
pub use keys::{MasterKey, PrivateKey, PublicKey, SymmetricKey, UserKey};
pub use master_password::{
    MasterPasswordAuthenticationData, MasterPasswordUnlockData,
    authentication_data_with_master_key, make_authentication_data, make_master_password_data,
    make_unlock_data, unlock_data_with_master_key, unwrap_user_key, wrap_user_key,
};
pub use prf::{derive_prf_key, prf_salt};
