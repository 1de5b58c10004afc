//! Game Units Module
//!
//! Selection of one random poll, quiz or picture game among the most recent
//! candidates of a randomly chosen category.
//!
//! # Flow
//! - `CategorySelector` builds the eligible list and draws a category
//! - `CandidateCache` serves the category's recent set, reading through to
//!   the `CandidateStore` on a miss
//! - `UnitPicker` draws one record and hands it to a `UnitRenderer`

mod candidates;
mod category;
mod picker;
mod record;
mod render;
mod store;

pub use candidates::{CandidateCache, CandidateStats, DEFAULT_CANDIDATE_TTL};
pub use category::{
    Category, CategorySelector, CustomFallback, DisplayFlags, Eligibility, FixedMarkupExtension,
    SelectedCategory, UnitExtension,
};
pub use picker::{PickedUnit, UnitPicker, DEFAULT_UNIT_COUNT};
pub use record::{
    CandidateRecord, CandidateSet, PicturePairRecord, PollChoice, PollRecord, QuizRecord,
};
pub use render::{HtmlRenderer, UnitRenderer, MAX_TITLE_CHARS};
pub use store::{CandidateStore, MemoryCandidateStore, PictureGameRow, StoreSeed};
