// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A ready-made user wired to fresh in-memory collaborators.

use std::sync::Arc;

use keyward_account::{
    ChangeKdfService, KeyStore as _, MasterPasswordService, PrfCredential, PrfUnlockService,
    build_prf_credential,
};
use keyward_core::{KdfConfig, KeywardError, MasterPasswordSalt, UserId};
use keyward_crypto::{UserKey, make_unlock_data};
use secrecy::SecretString;

use crate::{MemoryKeyStore, MockAccountApi, MockWebAuthn, StaticFeatureFlags};

/// Test-speed PBKDF2. Below the setting floor, above the prelogin floor.
pub const FAST_PBKDF2: KdfConfig = KdfConfig::Pbkdf2 { iterations: 5_000 };

pub struct TestAccountBuilder {
    user_id: UserId,
    email: String,
    password: String,
    kdf: KdfConfig,
    has_master_password: bool,
    unlocked: bool,
    prf: Option<(Vec<u8>, Vec<u8>)>,
}

impl TestAccountBuilder {
    fn new(user_id: &str) -> Self {
        Self {
            user_id: UserId::from(user_id),
            email: format!("{user_id}@example.com"),
            password: "correct horse battery staple".to_string(),
            kdf: FAST_PBKDF2,
            has_master_password: true,
            unlocked: true,
            prf: None,
        }
    }

    pub fn email(mut self, email: &str) -> Self {
        self.email = email.to_string();
        self
    }

    pub fn password(mut self, password: &str) -> Self {
        self.password = password.to_string();
        self
    }

    pub fn kdf(mut self, kdf: KdfConfig) -> Self {
        self.kdf = kdf;
        self
    }

    /// Accounts without a master password get no salt, KDF or wrapped key.
    pub fn without_master_password(mut self) -> Self {
        self.has_master_password = false;
        self
    }

    /// Start with the vault locked.
    pub fn locked(mut self) -> Self {
        self.unlocked = false;
        self
    }

    /// Register a PRF credential that unlocks with `prf_output`.
    pub fn with_prf_credential(mut self, credential_id: &[u8], prf_output: &[u8]) -> Self {
        self.prf = Some((credential_id.to_vec(), prf_output.to_vec()));
        self
    }

    pub async fn build(self) -> Result<TestAccount, KeywardError> {
        let api = Arc::new(MockAccountApi::new());
        let key_store = Arc::new(MemoryKeyStore::new());
        let flags = Arc::new(StaticFeatureFlags::new());
        let webauthn = Arc::new(MockWebAuthn::new());

        let salt = MasterPasswordSalt::from_email(&self.email);
        let password = SecretString::from(self.password);
        let user_key = UserKey::generate()?;

        if self.has_master_password {
            let unlock = make_unlock_data(&password, &self.kdf, &salt, &user_key)?;
            api.insert_account(&self.user_id, Some(salt.clone()), Some(self.kdf), true)
                .await;
            key_store
                .set_master_key_wrapped_user_key(&self.user_id, unlock.master_key_wrapped_user_key)
                .await?;
        } else {
            api.insert_account(&self.user_id, None, None, false).await;
        }

        let prf_credential = match self.prf {
            Some((credential_id, prf_output)) => {
                let credential = build_prf_credential(credential_id, &prf_output, &user_key)?;
                key_store
                    .add_prf_credential(&self.user_id, credential.clone())
                    .await?;
                Some(credential)
            }
            None => None,
        };

        if self.unlocked {
            key_store.set_user_key(&self.user_id, user_key.clone()).await?;
        }

        Ok(TestAccount {
            user_id: self.user_id,
            salt,
            password,
            kdf: self.kdf,
            user_key,
            prf_credential,
            api,
            key_store,
            flags,
            webauthn,
        })
    }
}

/// A user plus the collaborators that know about them.
pub struct TestAccount {
    pub user_id: UserId,
    pub salt: MasterPasswordSalt,
    pub password: SecretString,
    /// KDF at construction time.
    pub kdf: KdfConfig,
    pub user_key: UserKey,
    pub prf_credential: Option<PrfCredential>,
    pub api: Arc<MockAccountApi>,
    pub key_store: Arc<MemoryKeyStore>,
    pub flags: Arc<StaticFeatureFlags>,
    pub webauthn: Arc<MockWebAuthn>,
}

impl TestAccount {
    pub fn builder(user_id: &str) -> TestAccountBuilder {
        TestAccountBuilder::new(user_id)
    }

    pub fn master_password_service(&self) -> MasterPasswordService {
        MasterPasswordService::new(self.api.clone(), self.key_store.clone())
    }

    pub fn change_kdf_service(&self) -> ChangeKdfService {
        ChangeKdfService::new(self.api.clone(), self.key_store.clone())
    }

    pub fn prf_unlock_service(&self) -> PrfUnlockService {
        PrfUnlockService::new(self.key_store.clone(), self.webauthn.clone())
    }
}

/// `SecretString` from a literal.
pub fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}
