//! Candidate stores
//!
//! The authoritative, read-only source of recent records per category.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, UnitError};
use crate::units::{CandidateRecord, Category, PicturePairRecord, PollRecord, QuizRecord};

// == Candidate Store ==
#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Returns up to `count` of the newest records of `category`, newest first.
    ///
    /// Polls come with their full choice list; flagged picture pairs are
    /// never returned. `Category::Custom` has no records and is an error.
    async fn fetch_recent(&self, category: Category, count: usize) -> Result<Vec<CandidateRecord>>;
}

/// A picture pair as stored, including its moderation flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PictureGameRow {
    #[serde(flatten)]
    pub record: PicturePairRecord,
    #[serde(default)]
    pub flagged: bool,
}

/// Seed document for `MemoryCandidateStore`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSeed {
    #[serde(default)]
    pub polls: Vec<PollRecord>,
    #[serde(default)]
    pub quizzes: Vec<QuizRecord>,
    #[serde(default)]
    pub picture_games: Vec<PictureGameRow>,
}

// == Memory Candidate Store ==
/// Store backed by records held in memory, typically loaded from a JSON seed.
#[derive(Debug, Clone, Default)]
pub struct MemoryCandidateStore {
    seed: StoreSeed,
}

impl MemoryCandidateStore {
    pub fn new(seed: StoreSeed) -> Self {
        Self { seed }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| UnitError::Store(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn with_polls(mut self, polls: Vec<PollRecord>) -> Self {
        self.seed.polls = polls;
        self
    }

    pub fn with_quizzes(mut self, quizzes: Vec<QuizRecord>) -> Self {
        self.seed.quizzes = quizzes;
        self
    }

    pub fn with_picture_games(mut self, rows: Vec<PictureGameRow>) -> Self {
        self.seed.picture_games = rows;
        self
    }
}

/// Sorts newest first by `key` and keeps the first `count`.
fn newest<T>(items: impl Iterator<Item = T>, key: impl Fn(&T) -> u64, count: usize) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    items.sort_by_key(|item| std::cmp::Reverse(key(item)));
    items.truncate(count);
    items
}

#[async_trait]
impl CandidateStore for MemoryCandidateStore {
    async fn fetch_recent(&self, category: Category, count: usize) -> Result<Vec<CandidateRecord>> {
        let records: Vec<CandidateRecord> = match category {
            Category::Poll => newest(self.seed.polls.iter().cloned(), |p: &PollRecord| p.id, count)
                .into_iter()
                .map(CandidateRecord::Poll)
                .collect(),
            Category::Quiz => newest(self.seed.quizzes.iter().cloned(), |q: &QuizRecord| q.id, count)
                .into_iter()
                .map(CandidateRecord::Quiz)
                .collect(),
            Category::PicturePair => newest(
                self.seed
                    .picture_games
                    .iter()
                    .filter(|row| !row.flagged)
                    .map(|row| row.record.clone()),
                |pair: &PicturePairRecord| pair.id,
                count,
            )
            .into_iter()
            .map(CandidateRecord::PicturePair)
            .collect(),
            Category::Custom => {
                return Err(UnitError::InvalidCategory(
                    "custom has no stored candidates".to_string(),
                ))
            }
        };
        Ok(records)
    }
}
