//! Player model and host derivation

use serde::{Deserialize, Serialize};

/// A participant in a game session
///
/// `uid` is the auth provider's opaque user id. Host-ness is never stored:
/// it is derived from roster position via [`host_of`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Player {
    pub fn new(uid: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: Some(display_name.into()),
            email: None,
        }
    }

    /// Best available name for display: display name, then email, then uid
    pub fn name(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.uid)
    }
}

/// Derive the host of a roster: by convention the player at position 0
///
/// The roster is an ordered snapshot from the server; this must be
/// recomputed on every roster change rather than cached.
pub fn host_of(roster: &[Player]) -> Option<&str> {
    roster.first().map(|p| p.uid.as_str())
}
