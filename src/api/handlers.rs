//! API Handlers
//!
//! HTTP request handlers for each game unit endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};

use crate::cache::MemoryCache;
use crate::config::Config;
use crate::error::Result;
use crate::models::{CandidatesResponse, HealthResponse, StatsResponse};
use crate::units::{
    CandidateCache, CandidateStore, Category, CategorySelector, DisplayFlags,
    FixedMarkupExtension, HtmlRenderer, UnitPicker,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Picker wired to the shared candidate cache
    pub picker: Arc<UnitPicker>,
    /// In-process cache backing the picker, kept for stats and cleanup
    pub cache: MemoryCache,
    /// Built-in categories eligible on every request
    pub display: DisplayFlags,
}

impl AppState {
    pub fn new(picker: UnitPicker, cache: MemoryCache, display: DisplayFlags) -> Self {
        Self {
            picker: Arc::new(picker),
            cache,
            display,
        }
    }

    /// Wires cache, selector, renderer and picker from configuration.
    pub fn from_config(config: &Config, store: Arc<dyn CandidateStore>) -> Result<Self> {
        let cache = MemoryCache::new(config.max_entries);
        let candidates = CandidateCache::new(
            Arc::new(cache.clone()),
            config.cache_key_prefix.clone(),
            config.candidate_ttl,
        );

        let mut selector = CategorySelector::new();
        if let Some(markup) = &config.custom_fallback_html {
            selector = selector.with_extension(Arc::new(FixedMarkupExtension::new(markup.clone())));
        }

        let renderer = HtmlRenderer::new(&config.site_url, config.thumbnail_width)?;
        let picker = UnitPicker::new(selector, candidates, store, Arc::new(renderer))
            .with_count(config.unit_count);

        Ok(Self::new(picker, cache, config.display))
    }
}

/// Handler for GET /unit
///
/// Renders one random game unit. An empty body means there is nothing to show.
pub async fn unit_handler(State(state): State<AppState>) -> Html<String> {
    Html(state.picker.pick_and_render(&state.display).await)
}

/// Handler for GET /candidates/:category
///
/// Returns the current candidate set of a built-in category.
pub async fn candidates_handler(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<CandidatesResponse>> {
    let category: Category = category.parse()?;
    let set = state.picker.candidates(category).await?;

    Ok(Json(CandidatesResponse::new(set, state.picker.count())))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.stats().await;
    let candidates = state.picker.candidate_cache().stats();

    Json(StatsResponse::new(&cache, candidates))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
