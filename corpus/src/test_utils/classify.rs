use std::sync::atomic::{AtomicU64, Ordering};

use crate::bail;
use crate::classify::{Classifier, FirstLetterClassifier};
use crate::error::{CorpusResult, ErrorKind};
use crate::types::{Article, CategoryLabel};

/// Classifier delegating to [`FirstLetterClassifier`] that fails on the `fail_at`-th article.
#[derive(Debug)]
pub struct FailingClassifier {
    inner: FirstLetterClassifier,
    fail_at: u64,
    classified: AtomicU64,
}

impl FailingClassifier {
    /// Creates a classifier failing on call number `fail_at`, counting from one.
    pub fn new(num_categories: u8, fail_at: u64) -> Self {
        Self {
            inner: FirstLetterClassifier::new(num_categories),
            fail_at,
            classified: AtomicU64::new(0),
        }
    }
}

impl Classifier for FailingClassifier {
    fn num_categories(&self) -> u8 {
        self.inner.num_categories()
    }

    fn classify(&self, article: &Article) -> CorpusResult<CategoryLabel> {
        let call = self.classified.fetch_add(1, Ordering::AcqRel) + 1;
        if call == self.fail_at {
            bail!(
                ErrorKind::ClassificationFailed,
                "Injected classification failure",
                format!("call {call}")
            );
        }

        self.inner.classify(article)
    }
}

/// Classifier that claims `num_categories` but labels every article with a wider
/// [`FirstLetterClassifier`].
#[derive(Debug)]
pub struct MislabelingClassifier {
    inner: FirstLetterClassifier,
    num_categories: u8,
}

impl MislabelingClassifier {
    /// Creates a classifier reporting `num_categories` while labelling over `labelled_categories`.
    pub fn new(num_categories: u8, labelled_categories: u8) -> Self {
        Self {
            inner: FirstLetterClassifier::new(labelled_categories),
            num_categories,
        }
    }
}

impl Classifier for MislabelingClassifier {
    fn num_categories(&self) -> u8 {
        self.num_categories
    }

    fn classify(&self, article: &Article) -> CorpusResult<CategoryLabel> {
        self.inner.classify(article)
    }
}
