//! Classification rules mapping an article to a category.

use crate::bail;
use crate::error::{CorpusResult, ErrorKind};
use crate::types::{Article, CategoryLabel};

/// A pure rule assigning a [`CategoryLabel`] to an [`Article`].
///
/// Implementations must not depend on shared mutable state: the classifier worker calls them
/// without any lock.
pub trait Classifier {
    /// Returns the number of categories `K` this classifier produces labels for.
    fn num_categories(&self) -> u8;

    /// Classifies an article.
    fn classify(&self, article: &Article) -> CorpusResult<CategoryLabel>;
}

/// Classifies articles by their first ASCII letter.
///
/// The letter offset from `a` (or `A` for uppercase) is folded into `K` categories:
/// `label = offset % K + 1`.
#[derive(Debug, Clone, Copy)]
pub struct FirstLetterClassifier {
    num_categories: u8,
}

impl FirstLetterClassifier {
    /// Creates a classifier producing labels in `1..=num_categories`.
    ///
    /// # Panics
    ///
    /// Panics if `num_categories` is zero.
    pub fn new(num_categories: u8) -> Self {
        assert!(num_categories > 0, "classifier needs at least one category");

        Self { num_categories }
    }
}

impl Classifier for FirstLetterClassifier {
    fn num_categories(&self) -> u8 {
        self.num_categories
    }

    fn classify(&self, article: &Article) -> CorpusResult<CategoryLabel> {
        let Some(letter) = article
            .content()
            .bytes()
            .find(|byte| byte.is_ascii_alphabetic())
        else {
            bail!(
                ErrorKind::ClassificationFailed,
                "Article contains no ASCII letter to classify by",
                format!("{:?}", article.content())
            );
        };

        let base = if letter.is_ascii_uppercase() { b'A' } else { b'a' };
        let value = (letter - base) % self.num_categories + 1;

        match CategoryLabel::new(value, self.num_categories) {
            Some(label) => Ok(label),
            None => bail!(
                ErrorKind::InvalidState,
                "Computed label is out of range",
                format!("label {value}, categories {}", self.num_categories)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(classifier: &FirstLetterClassifier, text: &str) -> u8 {
        classifier.classify(&Article::from(text)).unwrap().get()
    }

    #[test]
    fn lowercase_a_maps_to_first_category() {
        let classifier = FirstLetterClassifier::new(13);
        assert_eq!(label(&classifier, "apple pie"), 1);
    }

    #[test]
    fn letters_wrap_around_categories() {
        let classifier = FirstLetterClassifier::new(13);

        assert_eq!(label(&classifier, "m"), 13);
        assert_eq!(label(&classifier, "n"), 1);
        assert_eq!(label(&classifier, "z"), 13);
    }

    #[test]
    fn case_is_ignored() {
        let classifier = FirstLetterClassifier::new(13);
        assert_eq!(label(&classifier, "Crawler"), label(&classifier, "crawler"));
    }

    #[test]
    fn leading_non_letters_are_skipped() {
        let classifier = FirstLetterClassifier::new(13);
        assert_eq!(label(&classifier, "  42 -- bytes"), 2);
    }

    #[test]
    fn article_without_letters_fails() {
        let classifier = FirstLetterClassifier::new(13);
        let err = classifier.classify(&Article::from("1234 !!")).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ClassificationFailed);
    }
}
