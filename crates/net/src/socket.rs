//! Async socket client for the game server
//!
//! One `Socket` owns one connection and is scoped to one session at a
//! time. Events are surfaced to the caller in the exact order the server
//! emitted them; no reordering or batching is applied.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{ReadHalf, WriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::frame::{read_frame, write_frame};
use crate::protocol::{ClientEvent, ServerEvent};

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Socket handle for session protocol exchanges
pub struct Socket {
    state: Arc<RwLock<ConnectionState>>,
    event_rx: mpsc::Receiver<ServerEvent>,
    cmd_tx: mpsc::Sender<SocketCommand>,
}

enum SocketCommand {
    Send(ClientEvent),
    Disconnect,
}

impl Socket {
    /// Connect to the game server
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        info!(addr = %addr, "Connecting to game server");

        let state = Arc::new(RwLock::new(ConnectionState::Connecting));
        let stream = TcpStream::connect(addr).await?;
        let (reader, writer) = tokio::io::split(stream);

        *state.write().await = ConnectionState::Connected;

        let (event_tx, event_rx) = mpsc::channel(64);
        let (cmd_tx, cmd_rx) = mpsc::channel(64);

        // Spawn connection handler
        let state_clone = state.clone();
        tokio::spawn(connection_task(reader, writer, state_clone, event_tx, cmd_rx));

        Ok(Socket {
            state,
            event_rx,
            cmd_tx,
        })
    }

    /// Get the next server event, in emission order
    pub async fn next_event(&mut self) -> Option<ServerEvent> {
        self.event_rx.recv().await
    }

    /// Send an event to the server
    pub async fn send(&self, event: ClientEvent) -> Result<()> {
        self.cmd_tx
            .send(SocketCommand::Send(event))
            .await
            .map_err(|_| Error::NotConnected)
    }

    /// Disconnect from the server
    pub async fn disconnect(&self) {
        let _ = self.cmd_tx.send(SocketCommand::Disconnect).await;
    }

    /// Get current connection state
    pub async fn connection_state(&self) -> ConnectionState {
        *self.state.read().await
    }
}

/// Main connection task: multiplex incoming frames and outgoing commands
async fn connection_task(
    mut reader: ReadHalf<TcpStream>,
    mut writer: WriteHalf<TcpStream>,
    state: Arc<RwLock<ConnectionState>>,
    event_tx: mpsc::Sender<ServerEvent>,
    mut cmd_rx: mpsc::Receiver<SocketCommand>,
) {
    loop {
        tokio::select! {
            // Incoming event from server
            result = read_frame::<_, ServerEvent>(&mut reader) => {
                match result {
                    Ok(event) => {
                        debug!(?event, "Server event");
                        if event_tx.send(event).await.is_err() {
                            debug!("Event receiver dropped");
                            break;
                        }
                    }
                    Err(Error::ConnectionClosed) => {
                        debug!("Server closed connection");
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "Read error");
                        break;
                    }
                }
            }

            // Outgoing command
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(SocketCommand::Send(event)) => {
                        if let Err(e) = write_frame(&mut writer, &event).await {
                            warn!(error = %e, "Write error");
                            break;
                        }
                    }
                    Some(SocketCommand::Disconnect) | None => {
                        debug!("Disconnect requested");
                        break;
                    }
                }
            }
        }
    }

    // Cleanup
    *state.write().await = ConnectionState::Disconnected;
    info!("Disconnected from game server");
}

#[cfg(test)]
mod tests {
    use super::*;
    use blitz_core::{GameCode, Player};
    use tokio::net::TcpListener;

    /// Minimal in-process stand-in for the backend socket server
    async fn fake_server(
        listener: TcpListener,
        scripted: Vec<ServerEvent>,
    ) -> tokio::task::JoinHandle<ClientEvent> {
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (mut reader, mut writer) = tokio::io::split(stream);

            let first: ClientEvent = read_frame(&mut reader).await.unwrap();
            for event in &scripted {
                write_frame(&mut writer, event).await.unwrap();
            }
            first
        })
    }

    fn roster(uids: &[&str]) -> Vec<Player> {
        uids.iter().map(|u| Player::new(*u, *u)).collect()
    }

    #[tokio::test]
    async fn test_join_and_receive_roster() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = fake_server(
            listener,
            vec![ServerEvent::PlayerJoined {
                players: roster(&["host", "me"]),
            }],
        )
        .await;

        let mut socket = Socket::connect(addr).await.unwrap();
        socket
            .send(ClientEvent::JoinGame {
                game_id: GameCode::parse("GAME01").unwrap(),
                uid: "me".to_string(),
                display_name: "Me".to_string(),
            })
            .await
            .unwrap();

        match socket.next_event().await {
            Some(ServerEvent::PlayerJoined { players }) => {
                assert_eq!(players.len(), 2);
                assert_eq!(players[0].uid, "host");
            }
            other => panic!("Expected roster snapshot, got {:?}", other),
        }

        let sent = server.await.unwrap();
        match sent {
            ClientEvent::JoinGame { game_id, uid, .. } => {
                assert_eq!(game_id.as_str(), "GAME01");
                assert_eq!(uid, "me");
            }
            other => panic!("Server saw wrong event: {:?}", other),
        }

        socket.disconnect().await;
    }

    #[tokio::test]
    async fn test_events_delivered_in_emission_order() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // duplicate roster then start, as an at-least-once transport would
        let server = fake_server(
            listener,
            vec![
                ServerEvent::PlayerJoined {
                    players: roster(&["a"]),
                },
                ServerEvent::PlayerJoined {
                    players: roster(&["a", "b"]),
                },
                ServerEvent::PlayerJoined {
                    players: roster(&["a", "b"]),
                },
                ServerEvent::GameStarted {},
            ],
        )
        .await;

        let mut socket = Socket::connect(addr).await.unwrap();
        socket
            .send(ClientEvent::StartGame {
                game_id: GameCode::parse("GAME02").unwrap(),
            })
            .await
            .unwrap();

        let mut roster_sizes = Vec::new();
        loop {
            match socket.next_event().await {
                Some(ServerEvent::PlayerJoined { players }) => roster_sizes.push(players.len()),
                Some(ServerEvent::GameStarted {}) => break,
                other => panic!("Unexpected event: {:?}", other),
            }
        }
        assert_eq!(roster_sizes, vec![1, 2, 2]);

        server.await.unwrap();
        socket.disconnect().await;
    }

    #[tokio::test]
    async fn test_server_close_ends_event_stream() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = fake_server(listener, vec![]).await;

        let mut socket = Socket::connect(addr).await.unwrap();
        socket
            .send(ClientEvent::StartGame {
                game_id: GameCode::parse("GAME03").unwrap(),
            })
            .await
            .unwrap();
        server.await.unwrap();

        assert!(socket.next_event().await.is_none());
        assert_eq!(
            socket.connection_state().await,
            ConnectionState::Disconnected
        );
    }
}
