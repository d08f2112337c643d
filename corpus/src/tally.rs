//! Per-category counts of classified articles and the collection goal.

use crate::bail;
use crate::error::{CorpusResult, ErrorKind};
use crate::types::CategoryLabel;

/// Number of classified articles per category.
///
/// Owned by the classifier worker. It is the only writer and the tally is never shared, so
/// it needs no synchronization. Running several classifiers would require a lock around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTally {
    counts: Vec<u64>,
    threshold: u64,
}

impl CategoryTally {
    /// Creates an empty tally over `num_categories` categories.
    ///
    /// The goal is reached once every category holds at least `threshold` articles.
    pub fn new(num_categories: u8, threshold: u64) -> Self {
        Self {
            counts: vec![0; usize::from(num_categories)],
            threshold,
        }
    }

    /// Counts one more article in `label`'s category.
    ///
    /// Fails with [`ErrorKind::InvalidState`] if `label` lies outside the tally's categories.
    pub fn record(&mut self, label: CategoryLabel) -> CorpusResult<()> {
        let num_categories = self.counts.len();
        let Some(count) = self.counts.get_mut(label.index()) else {
            bail!(
                ErrorKind::InvalidState,
                "Category label is out of the tally range",
                format!("label {label}, categories {num_categories}")
            );
        };
        *count += 1;

        Ok(())
    }

    /// Returns the count of every category, indexed by `label - 1`.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Returns whether every category reached the threshold.
    pub fn goal_reached(&self) -> bool {
        self.counts.iter().all(|count| *count >= self.threshold)
    }
}
