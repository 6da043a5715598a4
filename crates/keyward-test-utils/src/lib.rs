// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory collaborators for Keyward integration tests.
//!
//! - [`MockAccountApi`]: scripted server responses, recorded requests
//! - [`MemoryKeyStore`]
//! - [`StaticFeatureFlags`]
//! - [`MockWebAuthn`]: fixed PRF assertions
//! - [`TestAccount`]: a user with salt, KDF, wrapped key and optional passkey
//!
//! Use from `tests/` directories only. Unit tests inside the crates these
//! depend on would see a second copy of every type.

pub mod account;
pub mod memory_key_store;
pub mod mock_account_api;
pub mod mock_webauthn;
pub mod static_feature_flags;

pub use account::{FAST_PBKDF2, TestAccount, TestAccountBuilder, secret};
pub use memory_key_store::MemoryKeyStore;
pub use mock_account_api::{MockAccountApi, ScriptedResponse};
pub use mock_webauthn::MockWebAuthn;
pub use static_feature_flags::StaticFeatureFlags;
