// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;
use keyward_core::KeywardError;
use strum::{AsRefStr, Display, EnumString};

/// Remotely controlled feature switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum FeatureFlag {
    /// Upgrade weak PBKDF2 settings at login.
    ForceUpdateKdfSettings,
}

#[async_trait]
pub trait FeatureFlagProvider: Send + Sync {
    /// Current value of `flag`. Callers do not cache the result.
    async fn is_enabled(&self, flag: FeatureFlag) -> Result<bool, KeywardError>;
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn flag_names_are_kebab_case() {
        assert_eq!(
            FeatureFlag::ForceUpdateKdfSettings.to_string(),
            "force-update-kdf-settings"
        );
        assert_eq!(
            FeatureFlag::from_str("force-update-kdf-settings").unwrap(),
            FeatureFlag::ForceUpdateKdfSettings
        );
    }
}
