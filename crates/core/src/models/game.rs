//! Game session identifiers and listings
//!
//! A game is addressed by a 6-character human-shareable code, used both as
//! the socket room key and as the lobby URL path segment.

use serde::{Deserialize, Serialize};

use super::player::{host_of, Player};
use crate::error::Error;

/// Number of characters in a game code
pub const GAME_CODE_LEN: usize = 6;

/// A validated 6-character game code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GameCode(String);

impl GameCode {
    /// Parse and validate a code: exactly 6 ASCII alphanumeric characters
    pub fn parse(s: &str) -> Result<Self, Error> {
        let s = s.trim();
        if s.len() != GAME_CODE_LEN {
            return Err(Error::InvalidGameCode(format!(
                "expected {} characters, got {}",
                GAME_CODE_LEN,
                s.len()
            )));
        }
        if !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::InvalidGameCode(format!(
                "non-alphanumeric character in '{}'",
                s
            )));
        }
        Ok(GameCode(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GameCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for GameCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Self::parse(s)
    }
}

impl TryFrom<String> for GameCode {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Error> {
        Self::parse(&s)
    }
}

impl From<GameCode> for String {
    fn from(code: GameCode) -> String {
        code.0
    }
}

/// One entry in the public games listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub id: GameCode,
    #[serde(default)]
    pub players: Vec<Player>,
}

impl GameSummary {
    /// Display name of the host, if the roster is non-empty
    pub fn host_name(&self) -> Option<&str> {
        host_of(&self.players)?;
        self.players.first().map(|p| p.name())
    }
}
