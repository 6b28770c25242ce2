//! Question batch - the ordered set of questions backing one session
//!
//! Created empty when the user opts into manual or AI authoring, grows by
//! one per manual save or wholesale from one AI call, and is discarded when
//! the flow is cancelled or a session is successfully created. Insertion
//! order is the display order players will see.

use serde::{Deserialize, Serialize};

use super::question::{Difficulty, Question, QuestionRecord};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBatch {
    topic: String,
    difficulty: Difficulty,
    /// Target size for the manual flow; `None` for AI generation
    target: Option<usize>,
    questions: Vec<QuestionRecord>,
}

impl QuestionBatch {
    pub fn new(topic: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            topic: topic.into(),
            difficulty,
            target: None,
            questions: Vec::new(),
        }
    }

    /// Set the number of questions the manual flow intends to author
    pub fn with_target(mut self, target: usize) -> Self {
        self.target = Some(target);
        self
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Has the manual flow produced its full target of questions?
    ///
    /// Always false while no target is set.
    pub fn is_full(&self) -> bool {
        matches!(self.target, Some(t) if self.questions.len() >= t)
    }

    /// Questions still owed by the manual flow
    pub fn remaining(&self) -> usize {
        self.target
            .map(|t| t.saturating_sub(self.questions.len()))
            .unwrap_or(0)
    }

    /// Append one authored question, preserving insertion order
    pub fn push(&mut self, question: Question) {
        self.questions.push(question.into());
    }

    /// Replace the contents wholesale with an assembled set of records
    pub fn replace(&mut self, records: Vec<QuestionRecord>) {
        self.questions = records;
    }

    /// Discard all questions (flow cancelled or session created)
    pub fn discard(&mut self) {
        self.questions.clear();
    }
}
