// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account-level key operations.
//!
//! - [`MasterPasswordService`]: unlock, verify, change password, local hash.
//! - [`ChangeKdfService`]: rotate KDF parameters under the same password.
//! - [`PrfUnlockService`]: passkey unlock and enrollment.
//!
//! The services talk to the outside world only through the traits in
//! [`traits`]. Request bodies live in [`request`].

pub mod change_kdf;
mod lookup;
pub mod master_password;
pub mod prf_unlock;
pub mod request;
mod staging;
pub mod traits;

pub use change_kdf::ChangeKdfService;
pub use master_password::MasterPasswordService;
pub use prf_unlock::{PrfUnlockService, build_prf_credential};
pub use request::{KdfRequest, PasswordRequest, SubmissionOutcome};
pub use traits::{
    AccountApi, FeatureFlag, FeatureFlagProvider, KeyStore, PrfAssertion, PrfAssertionRequest,
    PrfCredential, WebAuthnPlatform,
};
