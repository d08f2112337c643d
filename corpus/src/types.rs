//! Core value types moved through the pipeline.

use std::fmt;

/// Zero-based identifier of a crawler within a pipeline run.
pub type CrawlerId = usize;

/// A generated text article.
///
/// An [`Article`] is owned by exactly one actor at a time: the crawler that generated it, then
/// the ring buffer, then the classifier, which consumes it into a [`CorpusRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article(String);

impl Article {
    /// Wraps generated text into an [`Article`].
    pub fn new(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    /// Returns the article text.
    pub fn content(&self) -> &str {
        &self.0
    }

    /// Consumes the article returning its text.
    pub fn into_content(self) -> String {
        self.0
    }
}

impl From<String> for Article {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Article {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Category assigned to an article by a classifier, in `1..=K`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CategoryLabel(u8);

impl CategoryLabel {
    /// Creates a label, returning [`None`] for `0` or values above `num_categories`.
    pub fn new(value: u8, num_categories: u8) -> Option<Self> {
        (1..=num_categories).contains(&value).then_some(Self(value))
    }

    /// Returns the numeric label.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Returns the zero-based index of this label, used to address tallies.
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl fmt::Display for CategoryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A classified article as persisted in the corpus log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusRecord {
    /// Value of the article counter once this article was classified, starting at 1.
    pub sequence: u64,
    /// Category assigned by the classifier.
    pub label: CategoryLabel,
    /// Article text.
    pub content: String,
}

impl fmt::Display for CorpusRecord {
    /// Renders the record as a single corpus line: `<sequence> <label> <content>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.sequence, self.label, self.content)
    }
}
