// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keeps the stored wrapped user key in step with the server across a submission.

use std::future::Future;

use keyward_core::{KeywardError, UserId};
use keyward_crypto::EncString;
use tracing::error;

use crate::request::SubmissionOutcome;
use crate::traits::KeyStore;

/// Store `wrapped`, then run `submit`; put the previous key back if `submit`
/// fails or is only partially applied.
///
/// A failing store write returns before `submit` is polled, so the server is
/// never changed without the local key. When no wrapped key was stored
/// before, there is nothing to lock out and the write happens after a
/// successful submission instead.
pub(crate) async fn submit_with_staged_key<F>(
    key_store: &dyn KeyStore,
    user_id: &UserId,
    wrapped: EncString,
    submit: F,
) -> Result<(), KeywardError>
where
    F: Future<Output = Result<SubmissionOutcome, KeywardError>>,
{
    let Some(previous) = key_store.master_key_wrapped_user_key(user_id).await? else {
        submit.await?.into_result()?;
        return key_store
            .set_master_key_wrapped_user_key(user_id, wrapped)
            .await;
    };

    key_store
        .set_master_key_wrapped_user_key(user_id, wrapped)
        .await?;

    let result = match submit.await {
        Ok(outcome) => outcome.into_result(),
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        if let Err(restore) = key_store
            .set_master_key_wrapped_user_key(user_id, previous)
            .await
        {
            error!(
                user_id = %user_id,
                error = %restore,
                "could not restore the previous wrapped user key"
            );
        }
        return Err(e);
    }
    Ok(())
}
