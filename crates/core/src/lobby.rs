//! Lobby state machine
//!
//! The per-client view of one game session, driven entirely by protocol
//! events. Transitions:
//!
//! ```text
//! Waiting ──gameStarted──▶ Started   (terminal; drives navigation)
//! Waiting ──error───────▶ Errored    (terminal; roster frozen)
//! ```
//!
//! Nothing leaves `Started` or `Errored`; recovery means constructing a
//! fresh [`Lobby`] against a (possibly new) game code. Transitions into the
//! already-current state are no-ops, which makes duplicate event delivery
//! harmless.

use tracing::debug;

use crate::models::{host_of, GameCode, Player};

/// Session state as seen by this client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobbyState {
    Waiting,
    Started,
    Errored,
}

/// Transport-independent projection of the session protocol events
///
/// Any transport that can produce these - the real socket or a test
/// double - can drive the machine.
#[derive(Debug, Clone)]
pub enum LobbyEvent {
    /// Full roster snapshot; replaces the local roster wholesale
    Roster(Vec<Player>),
    /// The host started the game
    Started,
    /// Session-scoped fault, already localized for display
    Failed(String),
}

/// One client's view of a game session lobby
#[derive(Debug, Clone)]
pub struct Lobby {
    code: GameCode,
    local_uid: String,
    players: Vec<Player>,
    state: LobbyState,
    error: Option<String>,
}

impl Lobby {
    pub fn new(code: GameCode, local_uid: impl Into<String>) -> Self {
        Self {
            code,
            local_uid: local_uid.into(),
            players: Vec::new(),
            state: LobbyState::Waiting,
            error: None,
        }
    }

    /// Apply one protocol event
    ///
    /// Returns `Some(state)` only when a genuine state transition occurred,
    /// so callers can navigate exactly once even if `Started` is delivered
    /// twice. Roster snapshots never change the state and are ignored once
    /// the lobby is terminal (the roster freezes).
    pub fn apply(&mut self, event: LobbyEvent) -> Option<LobbyState> {
        match event {
            LobbyEvent::Roster(players) => {
                if self.state == LobbyState::Waiting {
                    debug!(code = %self.code, players = players.len(), "Roster updated");
                    self.players = players;
                } else {
                    debug!(code = %self.code, "Ignoring roster update in terminal state");
                }
                None
            }
            LobbyEvent::Started => {
                if self.state == LobbyState::Waiting {
                    self.state = LobbyState::Started;
                    Some(LobbyState::Started)
                } else {
                    None
                }
            }
            LobbyEvent::Failed(reason) => {
                if self.state == LobbyState::Waiting {
                    self.state = LobbyState::Errored;
                    self.error = Some(reason);
                    Some(LobbyState::Errored)
                } else {
                    None
                }
            }
        }
    }

    pub fn code(&self) -> &GameCode {
        &self.code
    }

    pub fn state(&self) -> LobbyState {
        self.state
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Uid of the current host, derived from roster position
    pub fn host_uid(&self) -> Option<&str> {
        host_of(&self.players)
    }

    /// Is the local client the derived host?
    pub fn is_local_host(&self) -> bool {
        self.host_uid() == Some(self.local_uid.as_str())
    }

    /// May the local client start the game right now?
    ///
    /// True iff the lobby is still waiting, the roster is non-empty, and
    /// the local uid equals the derived host uid.
    pub fn can_start(&self) -> bool {
        self.state == LobbyState::Waiting && !self.players.is_empty() && self.is_local_host()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code() -> GameCode {
        GameCode::parse("QWE123").unwrap()
    }

    fn roster(uids: &[&str]) -> Vec<Player> {
        uids.iter().map(|u| Player::new(*u, *u)).collect()
    }

    #[test]
    fn test_roster_replaced_not_merged() {
        let mut lobby = Lobby::new(code(), "a");
        lobby.apply(LobbyEvent::Roster(roster(&["a", "b"])));
        lobby.apply(LobbyEvent::Roster(roster(&["a", "c"])));

        let uids: Vec<&str> = lobby.players().iter().map(|p| p.uid.as_str()).collect();
        assert_eq!(uids, vec!["a", "c"]);
    }

    #[test]
    fn test_started_transition_is_idempotent() {
        let mut lobby = Lobby::new(code(), "a");
        lobby.apply(LobbyEvent::Roster(roster(&["a"])));

        assert_eq!(lobby.apply(LobbyEvent::Started), Some(LobbyState::Started));
        // duplicate delivery must not trigger a second navigation
        assert_eq!(lobby.apply(LobbyEvent::Started), None);
        assert_eq!(lobby.state(), LobbyState::Started);
    }

    #[test]
    fn test_error_freezes_roster() {
        let mut lobby = Lobby::new(code(), "b");
        lobby.apply(LobbyEvent::Roster(roster(&["a", "b"])));

        let transition = lobby.apply(LobbyEvent::Failed("La partida ya ha comenzado.".into()));
        assert_eq!(transition, Some(LobbyState::Errored));
        assert_eq!(lobby.error(), Some("La partida ya ha comenzado."));

        // roster updates after the fault are ignored
        lobby.apply(LobbyEvent::Roster(roster(&["a", "b", "c"])));
        assert_eq!(lobby.players().len(), 2);
    }

    #[test]
    fn test_no_transition_leaves_terminal_states() {
        let mut lobby = Lobby::new(code(), "a");
        lobby.apply(LobbyEvent::Started);
        assert_eq!(lobby.apply(LobbyEvent::Failed("boom".into())), None);
        assert_eq!(lobby.state(), LobbyState::Started);

        let mut errored = Lobby::new(code(), "a");
        errored.apply(LobbyEvent::Failed("boom".into()));
        assert_eq!(errored.apply(LobbyEvent::Started), None);
        assert_eq!(errored.state(), LobbyState::Errored);
    }

    #[test]
    fn test_can_start_only_for_waiting_host() {
        // empty roster: disabled even for would-be host
        let mut lobby = Lobby::new(code(), "a");
        assert!(!lobby.can_start());

        // local client is roster[0]
        lobby.apply(LobbyEvent::Roster(roster(&["a", "b"])));
        assert!(lobby.can_start());

        // non-host client
        let mut guest = Lobby::new(code(), "b");
        guest.apply(LobbyEvent::Roster(roster(&["a", "b"])));
        assert!(!guest.can_start());

        // started lobby: affordance gone
        lobby.apply(LobbyEvent::Started);
        assert!(!lobby.can_start());
    }

    #[test]
    fn test_host_tracks_roster_changes() {
        let mut lobby = Lobby::new(code(), "b");
        lobby.apply(LobbyEvent::Roster(roster(&["a", "b"])));
        assert_eq!(lobby.host_uid(), Some("a"));
        assert!(!lobby.is_local_host());

        // original host left; local client promoted by position
        lobby.apply(LobbyEvent::Roster(roster(&["b"])));
        assert_eq!(lobby.host_uid(), Some("b"));
        assert!(lobby.is_local_host());
        assert!(lobby.can_start());
    }

    #[test]
    fn test_waiting_is_a_valid_long_lived_state() {
        let lobby = Lobby::new(code(), "a");
        assert_eq!(lobby.state(), LobbyState::Waiting);
        assert!(lobby.error().is_none());
    }
}
