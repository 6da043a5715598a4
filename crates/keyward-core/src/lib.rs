// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core types for the Keyward key-management workspace.
//!
//! This crate provides the error taxonomy, the opaque-string newtypes, and the
//! [`KdfConfig`] value type shared by every other Keyward crate.

pub mod error;
pub mod kdf;
pub mod types;

pub use error::KeywardError;
pub use kdf::{KdfConfig, KdfParams, KdfType};
pub use types::{LocalAuthorizationHash, MasterPasswordAuthenticationHash, MasterPasswordSalt, UserId};
