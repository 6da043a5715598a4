// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits.
//!
//! Every collaborator is `Send + Sync` and shared as `Arc<dyn Trait>`. All
//! methods return [`keyward_core::KeywardError`] and implementations pass
//! their own failures through as `Transport` or `Platform` errors.

pub mod account_api;
pub mod feature_flags;
pub mod key_store;
pub mod webauthn;

pub use account_api::AccountApi;
pub use feature_flags::{FeatureFlag, FeatureFlagProvider};
pub use key_store::{KeyStore, PrfCredential};
pub use webauthn::{PrfAssertion, PrfAssertionRequest, WebAuthnPlatform};
