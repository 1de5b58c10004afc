//! Categories and category selection
//!
//! Builds the per-request list of eligible categories from the display flags
//! and the registered extensions, then picks one entry uniformly at random.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::UnitError;

// == Category ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Poll,
    Quiz,
    PicturePair,
    /// Extension-defined output; has no candidate set
    Custom,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Poll => "poll",
            Category::Quiz => "quiz",
            Category::PicturePair => "picture-pair",
            Category::Custom => "custom",
        }
    }

    /// Field the store orders by; `None` for categories without a candidate set.
    pub fn order_field(&self) -> Option<&'static str> {
        match self {
            Category::Poll => Some("poll_id"),
            Category::Quiz => Some("q_id"),
            Category::PicturePair => Some("id"),
            Category::Custom => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "poll" => Ok(Category::Poll),
            "quiz" => Ok(Category::Quiz),
            "picture-pair" | "picturegame" | "picgame" => Ok(Category::PicturePair),
            "custom" => Ok(Category::Custom),
            other => Err(UnitError::InvalidCategory(other.to_string())),
        }
    }
}

// == Display Flags ==
/// Which built-in categories are eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFlags {
    pub random_poll: bool,
    pub random_quiz: bool,
    pub random_picturegame: bool,
}

impl DisplayFlags {
    pub fn none() -> Self {
        Self {
            random_poll: false,
            random_quiz: false,
            random_picturegame: false,
        }
    }

    /// Enabled built-ins, in a fixed order: poll, quiz, picture-pair.
    pub fn enabled(&self) -> Vec<Category> {
        [
            (self.random_poll, Category::Poll),
            (self.random_quiz, Category::Quiz),
            (self.random_picturegame, Category::PicturePair),
        ]
        .into_iter()
        .filter_map(|(on, category)| on.then_some(category))
        .collect()
    }
}

impl Default for DisplayFlags {
    fn default() -> Self {
        Self {
            random_poll: true,
            random_quiz: true,
            random_picturegame: true,
        }
    }
}

// == Extensions ==
/// Produces the markup of the `custom` category, given the candidate count.
pub type CustomFallback = Arc<dyn Fn(usize) -> String + Send + Sync>;

/// Hook run on every request while the eligible list is being built.
///
/// An extension may append categories and set the custom fallback. Returning
/// `false` reports a failure: it is logged, later extensions are skipped, and
/// whatever has been contributed so far is still used.
pub trait UnitExtension: Send + Sync {
    fn name(&self) -> &str {
        "anonymous"
    }

    fn contribute(
        &self,
        categories: &mut Vec<Category>,
        fallback: &mut Option<CustomFallback>,
    ) -> bool;
}

impl<F> UnitExtension for F
where
    F: Fn(&mut Vec<Category>, &mut Option<CustomFallback>) -> bool + Send + Sync,
{
    fn contribute(
        &self,
        categories: &mut Vec<Category>,
        fallback: &mut Option<CustomFallback>,
    ) -> bool {
        self(categories, fallback)
    }
}

/// Adds the `custom` category rendering a fixed piece of markup.
#[derive(Debug, Clone)]
pub struct FixedMarkupExtension {
    markup: String,
}

impl FixedMarkupExtension {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }
}

impl UnitExtension for FixedMarkupExtension {
    fn name(&self) -> &str {
        "fixed-markup"
    }

    fn contribute(
        &self,
        categories: &mut Vec<Category>,
        fallback: &mut Option<CustomFallback>,
    ) -> bool {
        let markup = self.markup.clone();
        categories.push(Category::Custom);
        *fallback = Some(Arc::new(move |_count: usize| markup.clone()));
        true
    }
}

// == Selection ==
/// The chosen category, plus the custom fallback when extensions set one.
#[derive(Clone)]
pub struct SelectedCategory {
    pub category: Category,
    pub fallback: Option<CustomFallback>,
}

impl fmt::Debug for SelectedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedCategory")
            .field("category", &self.category)
            .field("has_fallback", &self.fallback.is_some())
            .finish()
    }
}

/// Everything eligible for one request.
#[derive(Default)]
pub struct Eligibility {
    pub categories: Vec<Category>,
    pub fallback: Option<CustomFallback>,
}

// == Category Selector ==
#[derive(Default, Clone)]
pub struct CategorySelector {
    extensions: Vec<Arc<dyn UnitExtension>>,
}

impl CategorySelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an extension; extensions run in registration order.
    pub fn with_extension(mut self, extension: Arc<dyn UnitExtension>) -> Self {
        self.extensions.push(extension);
        self
    }

    /// Builds the eligible list: enabled built-ins, then extension contributions.
    pub fn eligible(&self, flags: &DisplayFlags) -> Eligibility {
        let mut eligibility = Eligibility {
            categories: flags.enabled(),
            fallback: None,
        };

        for extension in &self.extensions {
            if !extension.contribute(&mut eligibility.categories, &mut eligibility.fallback) {
                warn!(
                    extension = extension.name(),
                    categories = eligibility.categories.len(),
                    "Game unit extension reported failure; keeping categories contributed so far"
                );
                break;
            }
        }

        eligibility
    }

    /// Picks one eligible category uniformly at random, or `None` when nothing
    /// is eligible.
    pub fn select_category<R: Rng + ?Sized>(
        &self,
        flags: &DisplayFlags,
        rng: &mut R,
    ) -> Option<SelectedCategory> {
        let Eligibility {
            categories,
            fallback,
        } = self.eligible(flags);

        let category = *categories.choose(rng)?;
        debug!(%category, eligible = categories.len(), "Selected game unit category");

        Some(SelectedCategory { category, fallback })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_from_str_accepts_aliases() {
        assert_eq!("quiz".parse::<Category>().unwrap(), Category::Quiz);
        assert_eq!("picgame".parse::<Category>().unwrap(), Category::PicturePair);
        assert_eq!(" Poll ".parse::<Category>().unwrap(), Category::Poll);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let result = "trivia".parse::<Category>();
        assert!(matches!(result, Err(UnitError::InvalidCategory(_))));
    }

    #[test]
    fn test_display_roundtrips_through_from_str() {
        for category in [
            Category::Poll,
            Category::Quiz,
            Category::PicturePair,
            Category::Custom,
        ] {
            assert_eq!(category.to_string().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_enabled_order() {
        let flags = DisplayFlags {
            random_poll: true,
            random_quiz: false,
            random_picturegame: true,
        };
        assert_eq!(flags.enabled(), vec![Category::Poll, Category::PicturePair]);
    }

    #[test]
    fn test_no_categories_selects_none() {
        let selector = CategorySelector::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(selector
            .select_category(&DisplayFlags::none(), &mut rng)
            .is_none());
    }

    #[test]
    fn test_extension_appends_category() {
        let selector =
            CategorySelector::new().with_extension(Arc::new(FixedMarkupExtension::new("X")));
        let mut rng = StdRng::seed_from_u64(1);

        let selected = selector
            .select_category(&DisplayFlags::none(), &mut rng)
            .unwrap();
        assert_eq!(selected.category, Category::Custom);
        let fallback = selected.fallback.unwrap();
        assert_eq!(fallback(10), "X");
    }

    #[test]
    fn test_failing_extension_keeps_partial_contribution() {
        let failing = |categories: &mut Vec<Category>, _: &mut Option<CustomFallback>| {
            categories.push(Category::Quiz);
            false
        };
        let never_run = |categories: &mut Vec<Category>, _: &mut Option<CustomFallback>| {
            categories.push(Category::Poll);
            true
        };
        let selector = CategorySelector::new()
            .with_extension(Arc::new(failing))
            .with_extension(Arc::new(never_run));

        let eligibility = selector.eligible(&DisplayFlags::none());
        assert_eq!(eligibility.categories, vec![Category::Quiz]);
    }

    #[test]
    fn test_selection_is_uniform() {
        // Chi-square goodness of fit, 2 degrees of freedom, p = 0.001 cutoff
        const TRIALS: usize = 12_000;
        let selector = CategorySelector::new();
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut counts = [0usize; 3];

        for _ in 0..TRIALS {
            let selected = selector
                .select_category(&DisplayFlags::default(), &mut rng)
                .unwrap();
            let slot = match selected.category {
                Category::Poll => 0,
                Category::Quiz => 1,
                Category::PicturePair => 2,
                Category::Custom => unreachable!("no extension registered"),
            };
            counts[slot] += 1;
        }

        let expected = TRIALS as f64 / 3.0;
        let chi_square: f64 = counts
            .iter()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();
        assert!(chi_square < 13.816, "chi-square {} for {:?}", chi_square, counts);
    }

    proptest! {
        #[test]
        fn prop_selected_category_is_eligible(
            random_poll in any::<bool>(),
            random_quiz in any::<bool>(),
            random_picturegame in any::<bool>(),
            seed in any::<u64>(),
        ) {
            let flags = DisplayFlags { random_poll, random_quiz, random_picturegame };
            let mut rng = StdRng::seed_from_u64(seed);

            match CategorySelector::new().select_category(&flags, &mut rng) {
                Some(selected) => prop_assert!(flags.enabled().contains(&selected.category)),
                None => prop_assert!(flags.enabled().is_empty()),
            }
        }
    }
}
