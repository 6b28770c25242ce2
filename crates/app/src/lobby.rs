//! Lobby controller
//!
//! Drives one lobby session end to end: join over the socket, translate
//! protocol events into state-machine transitions, gate the start action
//! on derived host-ness, and leave cleanly.

use tracing::{debug, info};

use blitz_core::{GameCode, Lobby, LobbyEvent, LobbyState};
use blitz_net::{ClientEvent, ServerEvent};

use crate::error::{Error, Result};
use crate::messages;
use crate::network::SocketManager;

/// A change the UI must react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyChange {
    /// The roster was replaced with a new snapshot
    RosterUpdated,
    /// The session started; navigate to the game exactly once
    Started,
    /// The session faulted; the message is ready for display
    Errored(String),
}

pub struct LobbyController {
    manager: SocketManager,
    lobby: Lobby,
}

impl LobbyController {
    /// Join a session's lobby
    ///
    /// Sends `joinGame` and returns a controller in the waiting state; the
    /// first roster snapshot arrives through [`LobbyController::next_change`].
    pub async fn join(
        mut manager: SocketManager,
        code: GameCode,
        uid: &str,
        display_name: &str,
    ) -> Result<Self> {
        manager.mark_joined(&code)?;
        let socket = manager.acquire().await?;
        socket
            .send(ClientEvent::JoinGame {
                game_id: code.clone(),
                uid: uid.to_string(),
                display_name: display_name.to_string(),
            })
            .await?;
        info!(code = %code, uid, "Joined lobby");

        Ok(Self {
            manager,
            lobby: Lobby::new(code, uid),
        })
    }

    pub fn lobby(&self) -> &Lobby {
        &self.lobby
    }

    /// Wait for the next change the UI must react to
    ///
    /// Duplicate protocol events are absorbed by the state machine and
    /// produce no change. `None` means the connection is gone.
    pub async fn next_change(&mut self) -> Result<Option<LobbyChange>> {
        loop {
            let socket = self.manager.acquire().await?;
            let Some(event) = socket.next_event().await else {
                return Ok(None);
            };

            match event {
                ServerEvent::PlayerJoined { players } => {
                    self.lobby.apply(LobbyEvent::Roster(players));
                    return Ok(Some(LobbyChange::RosterUpdated));
                }
                ServerEvent::GameStarted {} => {
                    if self.lobby.apply(LobbyEvent::Started) == Some(LobbyState::Started) {
                        return Ok(Some(LobbyChange::Started));
                    }
                    debug!("Duplicate start event absorbed");
                }
                ServerEvent::Error { error } => {
                    let localized = messages::localize_session_error(&error);
                    if self.lobby.apply(LobbyEvent::Failed(localized.clone()))
                        == Some(LobbyState::Errored)
                    {
                        return Ok(Some(LobbyChange::Errored(localized)));
                    }
                    debug!(error, "Fault after terminal state ignored");
                }
                other => {
                    debug!(?other, "Event not relevant to this lobby");
                }
            }
        }
    }

    /// Ask the server to start the game
    ///
    /// Only the derived host of a waiting, non-empty lobby may start.
    pub async fn start(&mut self) -> Result<()> {
        if !self.lobby.can_start() {
            return Err(Error::Blocked(messages::ONLY_HOST_STARTS.to_string()));
        }
        let code = self.lobby.code().clone();
        let socket = self.manager.acquire().await?;
        socket.send(ClientEvent::StartGame { game_id: code }).await?;
        Ok(())
    }

    /// Leave the lobby, releasing the connection and session membership
    pub async fn leave(mut self) -> SocketManager {
        self.manager.release().await;
        self.manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blitz_core::Player;
    use serde::de::DeserializeOwned;
    use serde::Serialize;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    async fn read_wire<T: DeserializeOwned>(stream: &mut TcpStream) -> T {
        let len = stream.read_u32().await.unwrap() as usize;
        let mut buf = vec![0u8; len];
        stream.read_exact(&mut buf).await.unwrap();
        serde_json::from_slice(&buf).unwrap()
    }

    async fn write_wire<T: Serialize>(stream: &mut TcpStream, value: &T) {
        let buf = serde_json::to_vec(value).unwrap();
        stream.write_u32(buf.len() as u32).await.unwrap();
        stream.write_all(&buf).await.unwrap();
    }

    fn roster(uids: &[&str]) -> Vec<Player> {
        uids.iter().map(|u| Player::new(*u, *u)).collect()
    }

    /// Server that accepts one join, replies with a scripted sequence and
    /// closes the connection
    fn scripted_server(
        listener: TcpListener,
        scripted: Vec<ServerEvent>,
    ) -> tokio::task::JoinHandle<ClientEvent> {
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let first: ClientEvent = read_wire(&mut stream).await;
            for event in &scripted {
                write_wire(&mut stream, event).await;
            }
            first
        })
    }

    #[tokio::test]
    async fn test_join_then_roster_then_started_once() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = scripted_server(
            listener,
            vec![
                ServerEvent::PlayerJoined {
                    players: roster(&["host", "me"]),
                },
                // duplicate delivery of the start signal
                ServerEvent::GameStarted {},
                ServerEvent::GameStarted {},
            ],
        );

        let manager = SocketManager::new(addr);
        let code = GameCode::parse("LOBBY1").unwrap();
        let mut controller = LobbyController::join(manager, code, "me", "Me").await.unwrap();

        assert_eq!(
            controller.next_change().await.unwrap(),
            Some(LobbyChange::RosterUpdated)
        );
        assert_eq!(controller.lobby().players().len(), 2);
        assert!(!controller.lobby().is_local_host());

        assert_eq!(
            controller.next_change().await.unwrap(),
            Some(LobbyChange::Started)
        );
        // the duplicate is absorbed; the stream just ends
        assert_eq!(controller.next_change().await.unwrap(), None);

        let sent = controller.leave().await;
        drop(sent);
        match server.await.unwrap() {
            ClientEvent::JoinGame { game_id, uid, .. } => {
                assert_eq!(game_id.as_str(), "LOBBY1");
                assert_eq!(uid, "me");
            }
            other => panic!("Expected joinGame, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_session_fault_is_localized() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = scripted_server(
            listener,
            vec![ServerEvent::Error {
                error: "Game already started".to_string(),
            }],
        );

        let manager = SocketManager::new(addr);
        let code = GameCode::parse("LOBBY2").unwrap();
        let mut controller = LobbyController::join(manager, code, "late", "Late").await.unwrap();

        match controller.next_change().await.unwrap() {
            Some(LobbyChange::Errored(msg)) => {
                assert_eq!(msg, messages::GAME_ALREADY_STARTED);
            }
            other => panic!("Expected Errored, got {:?}", other),
        }
        assert_eq!(controller.lobby().state(), LobbyState::Errored);

        controller.leave().await;
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_guest_cannot_start() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = scripted_server(
            listener,
            vec![ServerEvent::PlayerJoined {
                players: roster(&["host", "guest"]),
            }],
        );

        let manager = SocketManager::new(addr);
        let code = GameCode::parse("LOBBY3").unwrap();
        let mut controller = LobbyController::join(manager, code, "guest", "Guest")
            .await
            .unwrap();
        controller.next_change().await.unwrap();

        match controller.start().await.unwrap_err() {
            Error::Blocked(msg) => assert_eq!(msg, messages::ONLY_HOST_STARTS),
            other => panic!("Expected Blocked, got {:?}", other),
        }

        controller.leave().await;
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_host_start_reaches_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let _join: ClientEvent = read_wire(&mut stream).await;
            write_wire(
                &mut stream,
                &ServerEvent::PlayerJoined {
                    players: roster(&["host"]),
                },
            )
            .await;
            let second: ClientEvent = read_wire(&mut stream).await;
            write_wire(&mut stream, &ServerEvent::GameStarted {}).await;
            second
        });

        let manager = SocketManager::new(addr);
        let code = GameCode::parse("LOBBY4").unwrap();
        let mut controller = LobbyController::join(manager, code, "host", "Hosta")
            .await
            .unwrap();
        controller.next_change().await.unwrap();
        assert!(controller.lobby().can_start());

        controller.start().await.unwrap();
        assert_eq!(
            controller.next_change().await.unwrap(),
            Some(LobbyChange::Started)
        );

        match server.await.unwrap() {
            ClientEvent::StartGame { game_id } => assert_eq!(game_id.as_str(), "LOBBY4"),
            other => panic!("Expected startGame, got {:?}", other),
        }

        controller.leave().await;
    }
}
