//! Article sources used by crawlers.

use rand::Rng;

use crate::types::Article;

/// Produces freshly generated articles.
///
/// Sources are shared by every crawler of a pipeline, so generation takes `&self`.
pub trait ArticleSource {
    /// Generates one article.
    fn generate(&self) -> Article;
}

/// Generates articles made of random lowercase words.
#[derive(Debug, Clone)]
pub struct RandomArticleSource {
    min_words: usize,
    max_words: usize,
}

impl RandomArticleSource {
    /// Default minimum number of words per article.
    pub const DEFAULT_MIN_WORDS: usize = 4;

    /// Default maximum number of words per article.
    pub const DEFAULT_MAX_WORDS: usize = 12;

    const MIN_WORD_LEN: usize = 2;
    const MAX_WORD_LEN: usize = 9;

    /// Creates a source producing between `min_words` and `max_words` words per article.
    ///
    /// # Panics
    ///
    /// Panics if `min_words` is zero or greater than `max_words`.
    pub fn new(min_words: usize, max_words: usize) -> Self {
        assert!(
            min_words > 0 && min_words <= max_words,
            "invalid word count range {min_words}..={max_words}"
        );

        Self {
            min_words,
            max_words,
        }
    }
}

impl Default for RandomArticleSource {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_WORDS, Self::DEFAULT_MAX_WORDS)
    }
}

impl ArticleSource for RandomArticleSource {
    fn generate(&self) -> Article {
        let mut rng = rand::thread_rng();
        let words = rng.gen_range(self.min_words..=self.max_words);

        let mut content = String::new();
        for index in 0..words {
            if index > 0 {
                content.push(' ');
            }

            let len = rng.gen_range(Self::MIN_WORD_LEN..=Self::MAX_WORD_LEN);
            content.extend((0..len).map(|_| char::from(rng.gen_range(b'a'..=b'z'))));
        }

        Article::new(content)
    }
}
