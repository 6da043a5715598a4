// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scriptable in-memory account server.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use keyward_account::{AccountApi, KdfRequest, PasswordRequest, SubmissionOutcome};
use keyward_core::{KdfConfig, KeywardError, MasterPasswordSalt, UserId};
use tokio::sync::Mutex;

/// What the next submission should return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedResponse {
    Applied,
    PartiallyApplied(String),
    TransportError(String),
}

#[derive(Debug, Clone)]
struct AccountRecord {
    salt: Option<MasterPasswordSalt>,
    kdf: Option<KdfConfig>,
    has_master_password: bool,
}

/// An [`AccountApi`] backed by a map of accounts.
///
/// Submissions are recorded and answered from a FIFO of
/// [`ScriptedResponse`]s, defaulting to `Applied`. An applied KDF change
/// updates the stored KDF so later lookups see the new parameters.
#[derive(Default)]
pub struct MockAccountApi {
    accounts: Mutex<HashMap<UserId, AccountRecord>>,
    responses: Mutex<VecDeque<ScriptedResponse>>,
    kdf_requests: Mutex<Vec<KdfRequest>>,
    password_requests: Mutex<Vec<PasswordRequest>>,
}

impl MockAccountApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_account(
        &self,
        user_id: &UserId,
        salt: Option<MasterPasswordSalt>,
        kdf: Option<KdfConfig>,
        has_master_password: bool,
    ) {
        self.accounts.lock().await.insert(
            user_id.clone(),
            AccountRecord {
                salt,
                kdf,
                has_master_password,
            },
        );
    }

    pub async fn set_salt(&self, user_id: &UserId, salt: Option<MasterPasswordSalt>) {
        if let Some(record) = self.accounts.lock().await.get_mut(user_id) {
            record.salt = salt;
        }
    }

    pub async fn set_kdf(&self, user_id: &UserId, kdf: Option<KdfConfig>) {
        if let Some(record) = self.accounts.lock().await.get_mut(user_id) {
            record.kdf = kdf;
        }
    }

    pub async fn set_has_master_password(&self, user_id: &UserId, value: bool) {
        if let Some(record) = self.accounts.lock().await.get_mut(user_id) {
            record.has_master_password = value;
        }
    }

    /// Queue the answer for the next `post_password` or `post_kdf`.
    pub async fn push_response(&self, response: ScriptedResponse) {
        self.responses.lock().await.push_back(response);
    }

    pub async fn kdf_requests(&self) -> Vec<KdfRequest> {
        self.kdf_requests.lock().await.clone()
    }

    pub async fn password_requests(&self) -> Vec<PasswordRequest> {
        self.password_requests.lock().await.clone()
    }

    async fn next_response(&self) -> ScriptedResponse {
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or(ScriptedResponse::Applied)
    }

    async fn record(&self, user_id: &UserId) -> Option<AccountRecord> {
        self.accounts.lock().await.get(user_id).cloned()
    }
}

fn outcome(response: ScriptedResponse) -> Result<SubmissionOutcome, KeywardError> {
    match response {
        ScriptedResponse::Applied => Ok(SubmissionOutcome::Applied),
        ScriptedResponse::PartiallyApplied(detail) => {
            Ok(SubmissionOutcome::PartiallyApplied { detail })
        }
        ScriptedResponse::TransportError(message) => Err(KeywardError::transport(message)),
    }
}

#[async_trait]
impl AccountApi for MockAccountApi {
    async fn salt(&self, user_id: &UserId) -> Result<Option<MasterPasswordSalt>, KeywardError> {
        Ok(self.record(user_id).await.and_then(|r| r.salt))
    }

    async fn kdf_config(&self, user_id: &UserId) -> Result<Option<KdfConfig>, KeywardError> {
        Ok(self.record(user_id).await.and_then(|r| r.kdf))
    }

    async fn has_master_password(&self, user_id: &UserId) -> Result<bool, KeywardError> {
        Ok(self
            .record(user_id)
            .await
            .is_some_and(|r| r.has_master_password))
    }

    async fn post_password(
        &self,
        _user_id: &UserId,
        request: PasswordRequest,
    ) -> Result<SubmissionOutcome, KeywardError> {
        self.password_requests.lock().await.push(request);
        outcome(self.next_response().await)
    }

    async fn post_kdf(
        &self,
        user_id: &UserId,
        request: KdfRequest,
    ) -> Result<SubmissionOutcome, KeywardError> {
        let new_kdf = request.new_kdf();
        self.kdf_requests.lock().await.push(request);

        let response = self.next_response().await;
        if response == ScriptedResponse::Applied {
            self.set_kdf(user_id, Some(new_kdf)).await;
        }
        outcome(response)
    }
}
