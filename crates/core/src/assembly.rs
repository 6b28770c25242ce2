//! Question assembly pipeline
//!
//! Normalizes AI-generated or manually authored questions into their final
//! shape before they are committed: each question's answer options are
//! shuffled uniformly at random and the correct-answer index is remapped to
//! follow the originally-correct option. Shuffle and remap happen as one
//! atomic transformation; a record is never left with a permuted options
//! array and a stale index.
//!
//! The pipeline performs no I/O.

use chrono::Utc;
use rand::Rng;
use tracing::debug;

use crate::models::{Difficulty, QuestionRecord};

/// Metadata stamped onto every assembled record
#[derive(Debug, Clone)]
pub struct BatchMeta {
    pub created_by: String,
    pub category: String,
    pub difficulty: Difficulty,
}

/// Shuffle a record's options in place and remap its correct index
///
/// Fisher-Yates over `(option, original_index)` pairs: positions are walked
/// from the last index down to 1, each swapped with a uniformly chosen
/// position in `[0, i]`. Afterwards the correct index points at the
/// position whose original index equals the pre-shuffle correct index.
///
/// Records without a well-formed options array or an in-range correct
/// index pass through unmodified; this returns whether a shuffle was
/// applied.
pub fn shuffle_answers<R: Rng>(rng: &mut R, record: &mut QuestionRecord) -> bool {
    if !record.is_well_formed() {
        return false;
    }
    // is_well_formed guarantees both are present and the index is in range
    let Some(options) = record.options.as_mut() else {
        return false;
    };
    let Some(correct) = record.correct_answer_index else {
        return false;
    };

    let mut pairs: Vec<(String, usize)> = std::mem::take(options)
        .into_iter()
        .enumerate()
        .map(|(i, option)| (option, i))
        .collect();

    for i in (1..pairs.len()).rev() {
        let j = rng.gen_range(0..=i);
        pairs.swap(i, j);
    }

    let new_correct = pairs
        .iter()
        .position(|&(_, original)| original == correct)
        .unwrap_or(correct);

    *options = pairs.into_iter().map(|(option, _)| option).collect();
    record.correct_answer_index = Some(new_correct);
    true
}

/// Assemble a generated question set into a committable batch
///
/// Every record is shuffled independently and stamped with the creator,
/// the selected topic as its category, the selected difficulty, and the
/// current time. Malformed records keep their original shape but still
/// receive the metadata stamp, matching how they are persisted.
pub fn assemble<R: Rng>(
    rng: &mut R,
    records: Vec<QuestionRecord>,
    meta: &BatchMeta,
) -> Vec<QuestionRecord> {
    let now = Utc::now();
    let mut shuffled = 0usize;
    let total = records.len();

    let assembled = records
        .into_iter()
        .map(|mut record| {
            if shuffle_answers(rng, &mut record) {
                shuffled += 1;
            }
            record.created_by = Some(meta.created_by.clone());
            record.created_at = Some(now);
            record.category = Some(meta.category.clone());
            record.difficulty = Some(meta.difficulty);
            record
        })
        .collect();

    debug!(total, shuffled, category = %meta.category, "Assembled question batch");
    assembled
}
