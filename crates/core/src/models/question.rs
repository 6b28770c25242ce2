//! Question models
//!
//! Three shapes with different guarantees:
//!
//! - [`Question`]: canonical, fully-formed, metadata stamped
//! - [`QuestionDraft`]: authored in a form, validated before submission,
//!   metadata stamped on ownership transfer to the commit coordinator
//! - [`QuestionRecord`]: lenient wire shape for AI-generated questions and
//!   bulk-save payloads; options/index may be missing or malformed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Question difficulty, serialized lowercase on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fully-formed question ready for play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub text: String,
    /// Display-ordered answer options (at least 2)
    pub options: Vec<String>,
    /// Position of the correct option within `options`
    pub correct_answer_index: usize,
    pub category: String,
    pub difficulty: Difficulty,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// A question authored in the manual form, not yet stamped with metadata
///
/// Owned exclusively by the form until submission; [`QuestionDraft::stamp`]
/// transfers ownership into a [`Question`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuestionDraft {
    /// Check the draft before any network call is made
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(Error::Validation("question text is empty".into()));
        }
        if self.options.len() < 2 {
            return Err(Error::Validation(format!(
                "need at least 2 options, got {}",
                self.options.len()
            )));
        }
        if self.options.iter().any(|o| o.trim().is_empty()) {
            return Err(Error::Validation("all options must be filled in".into()));
        }
        if self.correct_answer_index >= self.options.len() {
            return Err(Error::Validation(format!(
                "correct answer index {} out of range (0..{})",
                self.correct_answer_index,
                self.options.len()
            )));
        }
        if self.category.trim().is_empty() {
            return Err(Error::Validation("category is empty".into()));
        }
        Ok(())
    }

    /// Stamp creator metadata, producing a canonical question
    pub fn stamp(self, created_by: &str, difficulty: Difficulty) -> Question {
        Question {
            text: self.text,
            options: self.options,
            correct_answer_index: self.correct_answer_index,
            category: self.category,
            difficulty,
            created_by: created_by.to_string(),
            created_at: Utc::now(),
            explanation: self.explanation,
        }
    }
}

/// Lenient question shape as it travels over the wire
///
/// AI generation may return questions with missing or malformed options;
/// those pass through the assembly pipeline unmodified and are persisted
/// as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuestionRecord {
    /// Does this record carry a usable options array and correct index?
    pub fn is_well_formed(&self) -> bool {
        match (&self.options, self.correct_answer_index) {
            (Some(options), Some(index)) => options.len() >= 2 && index < options.len(),
            _ => false,
        }
    }
}

impl From<Question> for QuestionRecord {
    fn from(q: Question) -> Self {
        QuestionRecord {
            text: q.text,
            options: Some(q.options),
            correct_answer_index: Some(q.correct_answer_index),
            category: Some(q.category),
            difficulty: Some(q.difficulty),
            created_by: Some(q.created_by),
            created_at: Some(q.created_at),
            explanation: q.explanation,
        }
    }
}
