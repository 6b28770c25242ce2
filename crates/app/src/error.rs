//! Application error types

use blitz_core::GameCode;
use thiserror::Error;

use crate::messages;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    /// A local gate rejected the action before any network call; the
    /// message is already localized for display
    #[error("{0}")]
    Blocked(String),

    /// The server reported a failure in its response envelope
    #[error("API error: {0}")]
    Api(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response body")]
    InvalidResponse,

    #[error(transparent)]
    Net(#[from] blitz_net::Error),

    #[error(transparent)]
    Core(#[from] blitz_core::Error),

    #[error("Already joined game {0}")]
    AlreadyJoined(GameCode),

    #[error("Game creation rejected: {0}")]
    CreateRejected(String),
}

impl Error {
    /// Message shown to the user, in the UI language
    pub fn user_message(&self) -> String {
        match self {
            Error::Config(_) => messages::CONFIG_INVALID.to_string(),
            Error::Blocked(msg) => msg.clone(),
            // the backend reports errors in the UI language already
            Error::Api(msg) => msg.clone(),
            Error::Http(_) | Error::Net(_) => messages::CONNECTION_ERROR.to_string(),
            Error::InvalidResponse => messages::INVALID_RESPONSE.to_string(),
            Error::Core(blitz_core::Error::Validation(_)) => {
                messages::INCOMPLETE_QUESTION.to_string()
            }
            Error::Core(blitz_core::Error::InvalidGameCode(_)) => {
                messages::INVALID_CODE.to_string()
            }
            Error::Core(_) => messages::GENERIC.to_string(),
            Error::AlreadyJoined(_) => messages::ALREADY_IN_GAME.to_string(),
            Error::CreateRejected(reason) => {
                format!("{}{}", messages::CREATE_FAILED_PREFIX, reason)
            }
        }
    }
}
