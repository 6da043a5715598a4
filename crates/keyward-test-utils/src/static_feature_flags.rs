// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use keyward_account::{FeatureFlag, FeatureFlagProvider};
use keyward_core::KeywardError;
use tokio::sync::Mutex;

/// Feature flags that change only when a test flips them. Counts lookups.
#[derive(Default)]
pub struct StaticFeatureFlags {
    enabled: Mutex<HashSet<FeatureFlag>>,
    lookups: AtomicUsize,
}

impl StaticFeatureFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, flag: FeatureFlag, enabled: bool) {
        let mut flags = self.enabled.lock().await;
        if enabled {
            flags.insert(flag);
        } else {
            flags.remove(&flag);
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeatureFlagProvider for StaticFeatureFlags {
    async fn is_enabled(&self, flag: FeatureFlag) -> Result<bool, KeywardError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.enabled.lock().await.contains(&flag))
    }
}
