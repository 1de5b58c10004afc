//! Candidate records and candidate sets
//!
//! Each selectable category has its own record shape. `CandidateRecord` is the
//! tagged union over them, and `CandidateSet` is the bounded, newest-first list
//! fetched for one category per cache cycle.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, UnitError};
use crate::units::Category;

// == Poll ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollChoice {
    pub id: u64,
    pub choice: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollRecord {
    pub id: u64,
    /// Page title of the poll; doubles as the question
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub choices: Vec<PollChoice>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// == Quiz ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRecord {
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// == Picture Pair ==
/// Two images competing for a vote. Either image may be blank in stored
/// data; such records are skipped when rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PicturePairRecord {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub img1: String,
    #[serde(default)]
    pub img2: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// == Candidate Record ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CandidateRecord {
    Poll(PollRecord),
    Quiz(QuizRecord),
    PicturePair(PicturePairRecord),
}

impl CandidateRecord {
    pub fn category(&self) -> Category {
        match self {
            CandidateRecord::Poll(_) => Category::Poll,
            CandidateRecord::Quiz(_) => Category::Quiz,
            CandidateRecord::PicturePair(_) => Category::PicturePair,
        }
    }

    /// Category-scoped unique identifier.
    pub fn id(&self) -> u64 {
        match self {
            CandidateRecord::Poll(poll) => poll.id,
            CandidateRecord::Quiz(quiz) => quiz.id,
            CandidateRecord::PicturePair(pair) => pair.id,
        }
    }

    /// Identifiers are assigned in creation order, so they stand in for recency.
    pub fn recency_key(&self) -> u64 {
        self.id()
    }
}

// == Candidate Set ==
/// Up to N records of a single category, newest first, identifiers unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSet {
    category: Category,
    records: Vec<CandidateRecord>,
}

impl CandidateSet {
    pub fn empty(category: Category) -> Self {
        Self {
            category,
            records: Vec::new(),
        }
    }

    /// Builds a set from freshly fetched records, rejecting any that would
    /// break the set invariants for a limit of `limit`.
    pub fn new(category: Category, records: Vec<CandidateRecord>, limit: usize) -> Result<Self> {
        let set = Self { category, records };
        set.validate(limit)?;
        Ok(set)
    }

    /// Checks length, category membership and identifier uniqueness.
    pub fn validate(&self, limit: usize) -> Result<()> {
        if self.records.len() > limit {
            return Err(UnitError::InvalidCandidateSet(format!(
                "{} records for a limit of {}",
                self.records.len(),
                limit
            )));
        }

        let mut seen = HashSet::with_capacity(self.records.len());
        for record in &self.records {
            if record.category() != self.category {
                return Err(UnitError::InvalidCandidateSet(format!(
                    "{} record {} in a {} set",
                    record.category(),
                    record.id(),
                    self.category
                )));
            }
            if !seen.insert(record.id()) {
                return Err(UnitError::InvalidCandidateSet(format!(
                    "duplicate {} id {}",
                    self.category,
                    record.id()
                )));
            }
        }
        Ok(())
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn records(&self) -> &[CandidateRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Picks one record uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&CandidateRecord> {
        self.records.choose(rng)
    }
}
