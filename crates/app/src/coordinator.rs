//! Commit coordinator
//!
//! Owns the rule that a question batch must be durably saved before the
//! game that uses it can be created. The batch is committed all at once;
//! a failed save leaves it intact in memory so the user can retry, and a
//! confirmed creation discards it.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use blitz_core::assembly::{self, BatchMeta};
use blitz_core::{Difficulty, Question, QuestionBatch, QuestionDraft, QuestionRecord};
use blitz_net::ClientEvent;

use crate::error::{Error, Result};
use crate::messages;

/// Durable storage for questions, backed by the REST API in production
#[async_trait]
pub trait QuestionStore: Send + Sync {
    async fn store_question(&self, question: &Question, token: Option<&str>) -> Result<()>;
    async fn store_bulk(&self, questions: &[QuestionRecord], token: Option<&str>) -> Result<()>;
}

/// Outcome of adding one hand-written question to a manual batch
#[derive(Debug, PartialEq, Eq)]
pub enum Progress {
    /// Saved; this many more questions complete the batch
    Accepted { remaining: usize },
    /// The batch reached its target and has been committed
    Completed,
}

pub struct CommitCoordinator<S> {
    store: S,
    batch: QuestionBatch,
    created_by: String,
    committed: bool,
    created: bool,
}

impl<S: QuestionStore> CommitCoordinator<S> {
    /// Coordinator for an AI-generated batch
    pub fn new(store: S, topic: &str, difficulty: Difficulty, created_by: &str) -> Self {
        Self {
            store,
            batch: QuestionBatch::new(topic, difficulty),
            created_by: created_by.to_string(),
            committed: false,
            created: false,
        }
    }

    /// Coordinator for a hand-written batch of `target` questions
    pub fn manual(
        store: S,
        topic: &str,
        difficulty: Difficulty,
        created_by: &str,
        target: usize,
    ) -> Self {
        Self {
            store,
            batch: QuestionBatch::new(topic, difficulty).with_target(target),
            created_by: created_by.to_string(),
            committed: false,
            created: false,
        }
    }

    pub fn batch(&self) -> &QuestionBatch {
        &self.batch
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Whether `create_game_event` would currently succeed
    pub fn ready(&self) -> bool {
        !self.batch.is_empty() && self.committed && !self.created
    }

    /// Assemble a generated question set and save it in one bulk call
    ///
    /// Shuffles answer options and stamps attribution metadata before the
    /// save, so what is stored is exactly what the game will play.
    pub async fn commit_generated(
        &mut self,
        records: Vec<QuestionRecord>,
        token: Option<&str>,
    ) -> Result<()> {
        if records.is_empty() {
            return Err(Error::Blocked(messages::NEED_QUESTIONS.to_string()));
        }

        let assembled = {
            let mut rng = rand::thread_rng();
            let meta = BatchMeta {
                created_by: self.created_by.clone(),
                category: self.batch.topic().to_string(),
                difficulty: self.batch.difficulty(),
            };
            assembly::assemble(&mut rng, records, &meta)
        };
        self.batch.replace(assembled);
        self.committed = false;
        self.created = false;
        self.finalize(token).await
    }

    /// Save the current batch in one bulk call
    ///
    /// Also the retry entry point after a failed save: the batch is still
    /// in memory, untouched.
    pub async fn finalize(&mut self, token: Option<&str>) -> Result<()> {
        if self.batch.is_empty() {
            return Err(Error::Blocked(messages::NEED_QUESTIONS.to_string()));
        }
        match self.store.store_bulk(self.batch.questions(), token).await {
            Ok(()) => {
                info!(count = self.batch.len(), "Question batch saved");
                self.committed = true;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Bulk save failed, batch retained for retry");
                Err(e)
            }
        }
    }

    /// Validate, save and record one hand-written question
    ///
    /// Each question is saved individually as it is entered; when the
    /// batch reaches its target the whole set is committed in bulk.
    pub async fn push_authored(
        &mut self,
        draft: QuestionDraft,
        token: Option<&str>,
    ) -> Result<Progress> {
        draft.validate()?;
        let question = draft.stamp(&self.created_by, self.batch.difficulty());
        self.store.store_question(&question, token).await?;
        self.batch.push(question);
        debug!(count = self.batch.len(), "Authored question accepted");

        if self.batch.is_full() {
            self.finalize(token).await?;
            Ok(Progress::Completed)
        } else {
            Ok(Progress::Accepted {
                remaining: self.batch.remaining(),
            })
        }
    }

    /// Build the `createGame` event, enforcing every pre-creation gate
    pub fn create_game_event(
        &mut self,
        display_name: &str,
        is_public: bool,
        token: Option<&str>,
    ) -> Result<ClientEvent> {
        if self.batch.topic().trim().is_empty() {
            return Err(Error::Blocked(messages::NEED_TOPIC.to_string()));
        }
        if self.batch.is_empty() {
            return Err(Error::Blocked(messages::NEED_QUESTIONS.to_string()));
        }
        if !self.committed {
            return Err(Error::Blocked(messages::BATCH_NOT_SAVED.to_string()));
        }
        if self.created {
            return Err(Error::Blocked(messages::ALREADY_CREATED.to_string()));
        }

        self.created = true;
        Ok(ClientEvent::CreateGame {
            host_id: self.created_by.clone(),
            display_name: display_name.to_string(),
            is_public,
            token: token.map(str::to_string),
            topic: self.batch.topic().to_string(),
            questions: self.batch.questions().to_vec(),
            count: self.batch.len(),
        })
    }

    /// The server rejected the creation; allow another attempt
    pub fn creation_failed(&mut self) {
        self.created = false;
    }

    /// The server confirmed the game; the batch has served its purpose
    pub fn creation_confirmed(&mut self) {
        self.batch.discard();
    }
}
