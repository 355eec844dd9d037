use serde::{Deserialize, Serialize};

/// Resolved authentication and profile-completeness state for one screen.
///
/// `Checking` is the only valid starting value. Once a resolution settles the
/// verdict is either `Authenticated` or `Unauthenticated`, never `Checking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum AuthVerdict {
    #[default]
    Checking,
    Authenticated,
    Unauthenticated,
}

impl AuthVerdict {
    pub fn is_settled(self) -> bool {
        !matches!(self, AuthVerdict::Checking)
    }

    /// Verdict for a finished lookup chain: a profile means authenticated.
    pub fn from_profile_found(found: bool) -> Self {
        if found {
            AuthVerdict::Authenticated
        } else {
            AuthVerdict::Unauthenticated
        }
    }
}
