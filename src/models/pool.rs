//! Author pool (multiset) model.
//!
//! Writer and editor slots are drawn from pools in which every author
//! appears `num_writes` times. Pools are drained as posts are assigned;
//! a generation attempt succeeds only when both pools are empty.

use rand::seq::{index, SliceRandom};
use rand::Rng;

/// A multiset of author slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorPool {
    slots: Vec<String>,
}

impl AuthorPool {
    /// Creates a pool containing every author `copies` times.
    pub fn filled(authors: &[String], copies: usize) -> Self {
        let mut slots = Vec::with_capacity(authors.len().saturating_mul(copies));
        for author in authors {
            slots.extend(std::iter::repeat_n(author.clone(), copies));
        }
        Self { slots }
    }

    /// Number of remaining slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether all slots have been consumed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Author occupying the slot at `idx`.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.slots.get(idx).map(String::as_str)
    }

    /// Remaining slots held by the given author.
    #[cfg(test)]
    fn count(&self, author: &str) -> usize {
        self.slots.iter().filter(|s| *s == author).count()
    }

    /// Shuffles slot order in place.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.slots.shuffle(rng);
    }

    /// Samples up to `amount` distinct slot indices (without replacement).
    ///
    /// Returns `min(len, amount)` indices in random order. Distinct slots
    /// may still hold the same author.
    pub fn sample<R: Rng>(&self, amount: usize, rng: &mut R) -> Vec<usize> {
        let amount = amount.min(self.slots.len());
        index::sample(rng, self.slots.len(), amount).into_vec()
    }

    /// Authors at the given slot indices, in index order.
    pub fn authors_at<'a>(&'a self, indices: &'a [usize]) -> impl Iterator<Item = &'a str> + 'a {
        indices.iter().filter_map(|&i| self.get(i))
    }

    /// Removes the slots at the given (distinct) indices.
    ///
    /// Returns the removed authors in the order the indices were given.
    pub fn take(&mut self, indices: &[usize]) -> Vec<String> {
        let taken: Vec<String> = self.authors_at(indices).map(str::to_string).collect();

        let mut order: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.slots.len())
            .collect();
        order.sort_unstable_by(|a, b| b.cmp(a));
        order.dedup();
        // Descending removal keeps the not-yet-removed indices stable.
        for i in order {
            self.slots.swap_remove(i);
        }
        taken
    }
}
