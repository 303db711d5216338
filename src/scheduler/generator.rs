//! Randomized block generator.
//!
//! # Algorithm
//!
//! 1. Fill a writer pool and an editor pool with every author
//!    `num_writes` times, then shuffle both.
//! 2. Until the pools are empty:
//!    a. Sample `min(pool_len, block_size)` slots from each pool.
//!    b. Accept the sample only if every sampled author is distinct across
//!       both roles, no writer wrote in the previous block, and no editor
//!       edited in the previous block. Otherwise resample.
//!    c. Pair writers with editors positionally, drain the slots, and
//!       append the block.
//! 3. Validate the finished schedule.
//!
//! Every sample counts against `max_iter` for the whole attempt. An
//! attempt that wedges (e.g. the last few slots all belong to one author)
//! fails once the budget runs out; recovery is a fresh attempt, not
//! local repair.
//!
//! Shuffling the pools is not needed for correctness; it diversifies the
//! samples and lowers the expected number of retries.

use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, trace};

use crate::error::{GenerationFailure, Result, RotaError};
use crate::models::{AuthorPool, Block, Schedule};
use crate::validation::{validate_generation, validate_schedule};

/// Default resampling budget per attempt.
pub const DEFAULT_MAX_ITER: usize = 200_000;

/// Generates one schedule per call by bounded generate-and-test.
///
/// # Example
///
/// ```
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
/// use u_rota::scheduler::BlockGenerator;
///
/// let authors: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
/// let generator = BlockGenerator::new(2).with_num_writes(2);
///
/// let mut rng = SmallRng::seed_from_u64(1);
/// // A single attempt may fail; callers retry with fresh attempts.
/// if let Ok(schedule) = generator.generate(&authors, &mut rng) {
///     assert_eq!(schedule.post_count(), 8);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BlockGenerator {
    block_size: usize,
    num_writes: usize,
    max_iter: usize,
}

impl BlockGenerator {
    /// Creates a generator for blocks of `block_size` posts.
    pub fn new(block_size: usize) -> Self {
        Self {
            block_size,
            num_writes: 3,
            max_iter: DEFAULT_MAX_ITER,
        }
    }

    /// Sets how many posts each author writes (and edits).
    pub fn with_num_writes(mut self, num_writes: usize) -> Self {
        self.num_writes = num_writes;
        self
    }

    /// Sets the resampling budget.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Validates inputs, then runs a single generation attempt.
    ///
    /// # Errors
    /// - `InvalidConfiguration` if the request can never succeed.
    /// - `GenerationFailed` if this attempt ran out of iterations.
    pub fn generate<R: Rng>(&self, authors: &[String], rng: &mut R) -> Result<Schedule> {
        validate_generation(authors, self.num_writes, self.block_size, self.max_iter)
            .map_err(RotaError::InvalidConfiguration)?;
        self.attempt(authors, rng).map_err(RotaError::from)
    }

    /// Runs one attempt without input validation.
    pub(crate) fn attempt<R: Rng>(
        &self,
        authors: &[String],
        rng: &mut R,
    ) -> std::result::Result<Schedule, GenerationFailure> {
        let mut writers = AuthorPool::filled(authors, self.num_writes);
        let mut editors = AuthorPool::filled(authors, self.num_writes);
        writers.shuffle(rng);
        editors.shuffle(rng);

        let mut schedule = Schedule::new();
        let mut iterations = 0usize;
        let mut prev_writers: HashSet<String> = HashSet::new();
        let mut prev_editors: HashSet<String> = HashSet::new();

        while !writers.is_empty() {
            debug!(remaining = writers.len(), iterations, "sampling block");

            let (writer_slots, editor_slots) = loop {
                iterations += 1;
                if iterations > self.max_iter {
                    debug!(
                        remaining = writers.len(),
                        blocks = schedule.block_count(),
                        "iteration budget exhausted"
                    );
                    return Err(GenerationFailure::IterationsExhausted {
                        max_iter: self.max_iter,
                        remaining: writers.len(),
                    });
                }

                let w = writers.sample(self.block_size, rng);
                let e = editors.sample(self.block_size, rng);
                if admissible(
                    writers.authors_at(&w),
                    editors.authors_at(&e),
                    &prev_writers,
                    &prev_editors,
                ) {
                    break (w, e);
                }
            };

            let block_writers = writers.take(&writer_slots);
            let block_editors = editors.take(&editor_slots);
            trace!(?block_writers, ?block_editors, "block accepted");

            let block = Block::pair(block_writers.iter().cloned(), block_editors.iter().cloned());
            prev_writers = block_writers.into_iter().collect();
            prev_editors = block_editors.into_iter().collect();
            schedule.push_block(block);
        }

        // Pools start equal and drain in lockstep.
        debug_assert!(editors.is_empty());

        validate_schedule(&schedule, authors, self.num_writes)
            .map_err(GenerationFailure::Rejected)?;

        debug!(
            blocks = schedule.block_count(),
            iterations, "schedule generated"
        );
        Ok(schedule)
    }
}

/// Whether a sampled block satisfies uniqueness and adjacency.
///
/// Every author may appear at most once across both roles of the block.
/// Writers must not have written, and editors must not have edited, in
/// the previous block.
fn admissible<'a>(
    writers: impl Iterator<Item = &'a str>,
    editors: impl Iterator<Item = &'a str>,
    prev_writers: &HashSet<String>,
    prev_editors: &HashSet<String>,
) -> bool {
    let mut seen: HashSet<&str> = HashSet::new();
    for w in writers {
        if !seen.insert(w) || prev_writers.contains(w) {
            return false;
        }
    }
    for e in editors {
        if !seen.insert(e) || prev_editors.contains(e) {
            return false;
        }
    }
    true
}
