//! Blitz Core Library
//!
//! Data model, question assembly pipeline, and lobby state machine for the
//! Blitz trivia client.

pub mod assembly;
pub mod error;
pub mod lobby;
pub mod models;

pub use assembly::{assemble, shuffle_answers, BatchMeta};
pub use error::{Error, Result};
pub use lobby::{Lobby, LobbyEvent, LobbyState};
pub use models::*;
