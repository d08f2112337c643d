use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::source::ArticleSource;
use crate::types::Article;

/// Number of distinct leading letters produced by [`CyclingArticleSource`].
pub const CYCLE_LETTERS: u8 = 13;

/// Produces articles whose first letter cycles through `a..=m`.
///
/// Every article is `"<letter><n> article"` where `n` counts generated articles across all clones,
/// starting at zero. Classified by a thirteen-category first-letter classifier, one crawler
/// publishing in generation order fills every category evenly.
#[derive(Debug, Clone, Default)]
pub struct CyclingArticleSource {
    generated: Arc<AtomicU64>,
}

impl CyclingArticleSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many articles were generated so far.
    pub fn generated(&self) -> u64 {
        self.generated.load(Ordering::Acquire)
    }
}

impl ArticleSource for CyclingArticleSource {
    fn generate(&self) -> Article {
        let index = self.generated.fetch_add(1, Ordering::AcqRel);
        let letter = char::from(b'a' + (index % u64::from(CYCLE_LETTERS)) as u8);

        Article::new(format!("{letter}{index} article"))
    }
}

/// Produces the same article over and over.
#[derive(Debug, Clone)]
pub struct FixedArticleSource {
    content: String,
}

impl FixedArticleSource {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl ArticleSource for FixedArticleSource {
    fn generate(&self) -> Article {
        Article::new(self.content.clone())
    }
}

/// Produces articles numbered in generation order, all starting with the same letter.
///
/// Content is `"<letter> <n>"` so consumers can check the order articles were produced in.
#[derive(Debug, Clone)]
pub struct CountingSource {
    letter: char,
    generated: Arc<AtomicU64>,
}

impl CountingSource {
    pub fn new(letter: char) -> Self {
        Self {
            letter,
            generated: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn generated(&self) -> u64 {
        self.generated.load(Ordering::Acquire)
    }
}

impl ArticleSource for CountingSource {
    fn generate(&self) -> Article {
        let index = self.generated.fetch_add(1, Ordering::AcqRel);

        Article::new(format!("{} {index}", self.letter))
    }
}
