//! Queue/beyond post selection.
//!
//! # Algorithm
//!
//! For each full block (partial blocks are skipped):
//! 1. Sample `num_queue + num_beyond` distinct posts; the first
//!    `num_queue` become queue posts, the rest beyond posts.
//! 2. Fairness gate, only when `num_queue + num_beyond < num_writes`:
//!    reject the sample if any selected writer would then hold more than
//!    `max(num_writes, 1)` special posts.
//! 3. On rejection, resample. All blocks share one `max_iter` budget;
//!    when it runs out, selection stops and the blocks committed so far
//!    are returned with a [`SelectionExhausted`] diagnostic.
//!
//! The gate counts the candidate posts into the running tally, so no
//! writer ever ends above the cap. Since every author writes exactly
//! `num_writes` posts in a valid schedule, the gate only rejects samples
//! on schedules that skipped validation.

use rand::seq::index;
use rand::Rng;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::{Result, RotaError, SelectionExhausted};
use crate::models::{BlockSelection, Post, Schedule, Selection, SpecialTally};
use crate::validation::validate_special_counts;

/// Picks queue and beyond posts from the full blocks of a schedule.
///
/// # Example
///
/// ```
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
/// use u_rota::models::{Block, Schedule};
/// use u_rota::scheduler::QueueBeyondSelector;
///
/// let schedule = Schedule::from_blocks(vec![
///     Block::pair(["A", "B", "C"], ["D", "E", "F"]),
///     Block::pair(["D"], ["A"]),
/// ]);
/// let selector = QueueBeyondSelector::new(3).with_queue(1).with_beyond(1);
/// let mut rng = SmallRng::seed_from_u64(7);
/// let selection = selector.select(&schedule, &mut rng).unwrap();
///
/// // The partial second block is skipped.
/// assert_eq!(selection.blocks.len(), 1);
/// assert_eq!(selection.queue_posts().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct QueueBeyondSelector {
    block_size: usize,
    num_queue: usize,
    num_beyond: usize,
    num_writes: usize,
    max_iter: usize,
}

impl QueueBeyondSelector {
    /// Creates a selector for blocks of `block_size` posts.
    ///
    /// Defaults: one queue post, one beyond post, three writes per author.
    pub fn new(block_size: usize) -> Self {
        Self {
            block_size,
            num_queue: 1,
            num_beyond: 1,
            num_writes: 3,
            max_iter: super::generator::DEFAULT_MAX_ITER,
        }
    }

    /// Sets queue posts per block.
    pub fn with_queue(mut self, num_queue: usize) -> Self {
        self.num_queue = num_queue;
        self
    }

    /// Sets beyond posts per block.
    pub fn with_beyond(mut self, num_beyond: usize) -> Self {
        self.num_beyond = num_beyond;
        self
    }

    /// Sets posts per author (drives the fairness gate).
    pub fn with_num_writes(mut self, num_writes: usize) -> Self {
        self.num_writes = num_writes;
        self
    }

    /// Sets the shared resampling budget.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Whether the fairness gate applies.
    ///
    /// Only with slack: fewer special posts per block than writes per
    /// author.
    pub fn fairness_enforced(&self) -> bool {
        self.num_queue.saturating_add(self.num_beyond) < self.num_writes
    }

    /// Special posts an author may hold before being excluded.
    pub fn special_cap(&self) -> usize {
        self.num_writes.max(1)
    }

    /// Selects queue and beyond posts.
    ///
    /// `schedule` is expected to have passed
    /// [`validate_schedule`](crate::validation::validate_schedule); on
    /// other input the fairness gate may exhaust the budget early.
    ///
    /// # Errors
    /// `InvalidConfiguration` if the special posts do not fit in a block.
    /// An exhausted budget is not an error: see [`Selection::exhausted`].
    pub fn select<R: Rng>(&self, schedule: &Schedule, rng: &mut R) -> Result<Selection> {
        validate_special_counts(self.block_size, self.num_queue, self.num_beyond)
            .map_err(|e| RotaError::InvalidConfiguration(vec![e]))?;
        Ok(self.run(schedule, rng))
    }

    /// Runs selection without input validation.
    pub(crate) fn run<R: Rng>(&self, schedule: &Schedule, rng: &mut R) -> Selection {
        let per_block = self.num_queue + self.num_beyond;
        let eligible_blocks = schedule.full_blocks(self.block_size).count();

        let mut selection = Selection::new();
        let mut tally: HashMap<&str, SpecialTally> = HashMap::new();
        let mut iterations = 0usize;

        'blocks: for (block_index, block) in schedule.full_blocks(self.block_size) {
            loop {
                if iterations > self.max_iter {
                    let exhausted = SelectionExhausted {
                        iterations,
                        completed_blocks: selection.blocks.len(),
                        eligible_blocks,
                    };
                    warn!(%exhausted, "unable to determine queue/beyond posts");
                    selection.exhausted = Some(exhausted);
                    break 'blocks;
                }

                let picked: Vec<&Post> = index::sample(rng, block.len(), per_block)
                    .into_iter()
                    .map(|i| &block.posts[i])
                    .collect();
                let (queue, beyond) = picked.split_at(self.num_queue);

                if self.admits(&tally, &picked) {
                    for post in queue {
                        tally.entry(post.writer.as_str()).or_default().queue += 1;
                    }
                    for post in beyond {
                        tally.entry(post.writer.as_str()).or_default().beyond += 1;
                    }
                    selection.blocks.push(BlockSelection::new(
                        block_index,
                        queue.iter().map(|p| (*p).clone()).collect(),
                        beyond.iter().map(|p| (*p).clone()).collect(),
                    ));
                    debug!(block_index, iterations, "queue/beyond posts selected");
                    break;
                }
                iterations += 1;
            }
        }

        selection
    }

    /// Fairness gate: the tally after committing `picked` stays within the cap.
    fn admits(&self, tally: &HashMap<&str, SpecialTally>, picked: &[&Post]) -> bool {
        if !self.fairness_enforced() {
            return true;
        }
        let cap = self.special_cap();
        let mut after: HashMap<&str, usize> = HashMap::new();
        for post in picked {
            let writer = post.writer.as_str();
            *after
                .entry(writer)
                .or_insert_with(|| tally.get(writer).map_or(0, SpecialTally::total)) += 1;
        }
        after.values().all(|&total| total <= cap)
    }
}
