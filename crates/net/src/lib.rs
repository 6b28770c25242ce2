//! Blitz Network Library
//!
//! Socket protocol client for the game server.
//!
//! # Architecture
//!
//! - **Protocol**: tagged JSON events, length-prefixed on the wire
//! - **Socket**: async client owning one connection, one session at a time
//!
//! # Usage
//!
//! ```ignore
//! let mut socket = Socket::connect(addr).await?;
//! socket.send(ClientEvent::JoinGame { game_id, uid, display_name }).await?;
//!
//! while let Some(event) = socket.next_event().await {
//!     match event {
//!         ServerEvent::PlayerJoined { players } => { /* replace roster */ }
//!         _ => {}
//!     }
//! }
//! ```

pub mod error;
mod frame;
pub mod protocol;
pub mod socket;

pub use error::{Error, Result};
pub use protocol::{ClientEvent, ServerEvent};
pub use socket::{ConnectionState, Socket};

/// Default port for the game server
pub const DEFAULT_PORT: u16 = 5000;
