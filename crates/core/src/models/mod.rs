//! Core data models

pub mod batch;
pub mod game;
pub mod player;
pub mod question;

pub use batch::QuestionBatch;
pub use game::{GameCode, GameSummary, GAME_CODE_LEN};
pub use player::{host_of, Player};
pub use question::{Difficulty, Question, QuestionDraft, QuestionRecord};
