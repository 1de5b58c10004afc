//! Unit picker
//!
//! One linear pass per request: select a category, obtain its candidate set
//! through the cache, choose one record, hand it to the renderer. A category
//! with no candidates yields empty output; the picker never retries with a
//! different category.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Result, UnitError};
use crate::units::{
    CandidateCache, CandidateRecord, CandidateSet, CandidateStore, Category, CategorySelector,
    DisplayFlags, UnitRenderer,
};

/// Default number of recent candidates considered per category.
pub const DEFAULT_UNIT_COUNT: usize = 10;

/// What a pick produced before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickedUnit {
    Candidate(CandidateRecord),
    /// Output of the extension-supplied custom fallback, used verbatim
    CustomOutput(String),
}

// == Unit Picker ==
#[derive(Clone)]
pub struct UnitPicker {
    selector: CategorySelector,
    candidates: CandidateCache,
    store: Arc<dyn CandidateStore>,
    renderer: Arc<dyn UnitRenderer>,
    count: usize,
}

impl UnitPicker {
    pub fn new(
        selector: CategorySelector,
        candidates: CandidateCache,
        store: Arc<dyn CandidateStore>,
        renderer: Arc<dyn UnitRenderer>,
    ) -> Self {
        Self {
            selector,
            candidates,
            store,
            renderer,
            count: DEFAULT_UNIT_COUNT,
        }
    }

    /// Sets the candidate-set size; zero is bumped to one.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count.max(1);
        self
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn candidate_cache(&self) -> &CandidateCache {
        &self.candidates
    }

    // == Candidates ==
    /// Current candidate set of a built-in category, read through the cache.
    pub async fn candidates(&self, category: Category) -> Result<CandidateSet> {
        let order_field = category.order_field().ok_or_else(|| {
            UnitError::InvalidCategory(format!("{} has no candidate set", category))
        })?;

        let store = Arc::clone(&self.store);
        Ok(self
            .candidates
            .get_or_fetch(category, order_field, self.count, move |count| async move {
                store.fetch_recent(category, count).await
            })
            .await)
    }

    // == Pick ==
    /// Chooses a unit without rendering it. `None` means render nothing.
    pub async fn pick(&self, flags: &DisplayFlags) -> Option<PickedUnit> {
        let selected = self
            .selector
            .select_category(flags, &mut rand::thread_rng())?;

        if selected.category == Category::Custom {
            let fallback = selected.fallback?;
            debug!(count = self.count, "Rendering custom game unit fallback");
            return Some(PickedUnit::CustomOutput(fallback(self.count)));
        }

        // Only Custom lacks a candidate set, so this cannot fail here
        let set = self.candidates(selected.category).await.ok()?;
        if set.is_empty() {
            info!(category = %selected.category, "No candidates available; rendering nothing");
            return None;
        }

        let record = set.choose(&mut rand::thread_rng())?.clone();
        debug!(category = %selected.category, id = record.id(), "Picked game unit");
        Some(PickedUnit::Candidate(record))
    }

    // == Pick And Render ==
    /// Picks a unit and renders it. An empty string means "render nothing".
    pub async fn pick_and_render(&self, flags: &DisplayFlags) -> String {
        match self.pick(flags).await {
            Some(PickedUnit::CustomOutput(output)) => output,
            Some(PickedUnit::Candidate(record)) => self.render(&record),
            None => String::new(),
        }
    }

    pub fn render(&self, record: &CandidateRecord) -> String {
        match record {
            CandidateRecord::Poll(poll) => self.renderer.render_poll(poll),
            CandidateRecord::Quiz(quiz) => self.renderer.render_quiz(quiz),
            CandidateRecord::PicturePair(pair) => self.renderer.render_picture_pair(pair),
        }
    }
}
