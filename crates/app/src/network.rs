//! Socket connection management
//!
//! Owns the one socket the client holds at a time and tracks which
//! session it is joined to. A client in a session must leave it before
//! joining another one.

use std::net::SocketAddr;

use tracing::{debug, info};

use blitz_core::GameCode;
use blitz_net::{ClientEvent, ServerEvent, Socket};

use crate::error::{Error, Result};

pub struct SocketManager {
    addr: SocketAddr,
    socket: Option<Socket>,
    joined: Option<GameCode>,
}

impl SocketManager {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            socket: None,
            joined: None,
        }
    }

    /// The socket, connecting on first use
    pub async fn acquire(&mut self) -> Result<&mut Socket> {
        if self.socket.is_none() {
            self.socket = Some(Socket::connect(self.addr).await?);
        }
        self.socket
            .as_mut()
            .ok_or(Error::Net(blitz_net::Error::NotConnected))
    }

    /// Record membership in a session
    ///
    /// Rejoining the same code is a no-op; a different code while joined
    /// is rejected until [`SocketManager::release`] runs.
    pub fn mark_joined(&mut self, code: &GameCode) -> Result<()> {
        match &self.joined {
            Some(current) if current == code => Ok(()),
            Some(current) => Err(Error::AlreadyJoined(current.clone())),
            None => {
                self.joined = Some(code.clone());
                Ok(())
            }
        }
    }

    /// Code of the currently joined session, if any
    pub fn joined(&self) -> Option<&GameCode> {
        self.joined.as_ref()
    }

    /// Drop the connection and clear session membership
    pub async fn release(&mut self) {
        if let Some(socket) = self.socket.take() {
            socket.disconnect().await;
        }
        if let Some(code) = self.joined.take() {
            info!(code = %code, "Left session");
        }
    }

    /// Send a `createGame` event and wait for the server's verdict
    ///
    /// Returns the new session's code and the number of questions the
    /// server acknowledged. Unrelated events arriving first are skipped;
    /// the creator is not yet in a lobby.
    pub async fn create_game(&mut self, event: ClientEvent) -> Result<(GameCode, usize)> {
        let socket = self.acquire().await?;
        socket.send(event).await?;

        loop {
            match socket.next_event().await {
                Some(ServerEvent::GameCreated { game_id, questions }) => {
                    info!(code = %game_id, count = questions.len(), "Game created");
                    return Ok((game_id, questions.len()));
                }
                Some(ServerEvent::Error { error }) => {
                    return Err(Error::CreateRejected(error));
                }
                Some(other) => {
                    debug!(?other, "Ignoring event while awaiting creation verdict");
                }
                None => {
                    return Err(Error::Net(blitz_net::Error::ConnectionClosed));
                }
            }
        }
    }
}
