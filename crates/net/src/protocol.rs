//! Socket protocol event types
//!
//! Every frame is a JSON object tagged with the socket event name:
//! `{"event": "joinGame", "data": {...}}`. Field names are camelCase on
//! the wire. The server delivers events for a session in emission order;
//! `playerJoined` may be delivered more than once with the same roster, so
//! consumers must treat it as a full snapshot to replace, never a delta to
//! merge.

use serde::{Deserialize, Serialize};

use blitz_core::{GameCode, Player, QuestionRecord};

/// Events a client sends to the game server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Join a session's lobby
    #[serde(rename = "joinGame", rename_all = "camelCase")]
    JoinGame {
        game_id: GameCode,
        uid: String,
        display_name: String,
    },

    /// Host asks the server to start the session
    #[serde(rename = "startGame", rename_all = "camelCase")]
    StartGame { game_id: GameCode },

    /// Create a session from an already-committed question batch
    #[serde(rename = "createGame", rename_all = "camelCase")]
    CreateGame {
        host_id: String,
        display_name: String,
        is_public: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<String>,
        topic: String,
        questions: Vec<QuestionRecord>,
        count: usize,
    },
}

/// Events the game server sends to a client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Full roster snapshot (not a delta)
    #[serde(rename = "playerJoined")]
    PlayerJoined { players: Vec<Player> },

    /// The session left the lobby phase; exactly once per session, but
    /// duplicate delivery must be tolerated by receivers
    #[serde(rename = "gameStarted")]
    GameStarted {},

    /// Session created; carries the committed question set
    #[serde(rename = "gameCreated", rename_all = "camelCase")]
    GameCreated {
        game_id: GameCode,
        questions: Vec<QuestionRecord>,
    },

    /// Session-scoped fault, terminal for the current lobby view
    #[serde(rename = "error")]
    Error { error: String },
}
