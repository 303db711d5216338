//! Rota orchestration.
//!
//! Drives whole-schedule generation trials until one passes, then picks
//! queue/beyond posts. There are two retry levels: per-block resampling
//! inside an attempt, and fresh attempts here. An attempt can drain its
//! pools into a state the last block cannot satisfy, and abandoning it
//! is cheaper than repairing it.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{BlockGenerator, QueueBeyondSelector};
use crate::config::RotaConfig;
use crate::error::{Result, RotaError};
use crate::models::{Post, Schedule, Selection};
use crate::validation::{
    validate_config, validate_generation, validate_schedule, validate_selection, validate_trials,
};

/// A finished rota: the validated schedule plus its special posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rota {
    /// Accepted schedule.
    pub schedule: Schedule,
    /// Queue/beyond posts of the full blocks.
    pub selection: Selection,
}

/// Generates rotas from a [`RotaConfig`].
///
/// # Example
///
/// ```
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
/// use u_rota::config::RotaConfig;
/// use u_rota::scheduler::RotaScheduler;
///
/// let authors: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
/// let config = RotaConfig {
///     max_iter: 1_000,
///     ..RotaConfig::default()
/// };
/// let scheduler = RotaScheduler::new(config);
/// let mut rng = SmallRng::seed_from_u64(5);
///
/// let pairs = scheduler.gift_exchange(&authors, &mut rng).unwrap();
/// assert_eq!(pairs.len(), 3);
/// assert!(pairs.iter().all(|p| p.writer != p.editor));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RotaScheduler {
    config: RotaConfig,
}

impl Rota {
    /// Whether every full block received queue/beyond posts.
    pub fn is_complete(&self) -> bool {
        self.selection.is_complete()
    }
}

impl RotaScheduler {
    /// Creates a scheduler.
    pub fn new(config: RotaConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &RotaConfig {
        &self.config
    }

    /// Builds a complete rota.
    ///
    /// # Errors
    /// - `InvalidConfiguration` before any random work if the request is
    ///   impossible.
    /// - `ExhaustedTrials` if no attempt succeeds within `max_trials`.
    ///   No partial schedule is returned.
    ///
    /// An exhausted queue/beyond budget is reported on the returned
    /// selection, not as an error.
    pub fn schedule<R: Rng>(&self, authors: &[String], rng: &mut R) -> Result<Rota> {
        validate_config(&self.config, authors).map_err(RotaError::InvalidConfiguration)?;

        let c = &self.config;
        let generator = BlockGenerator::new(c.block_size())
            .with_num_writes(c.num_writes)
            .with_max_iter(c.max_iter);
        let schedule = self.run_trials(&generator, authors, rng)?;

        let selector = QueueBeyondSelector::new(c.block_size())
            .with_queue(c.num_queue)
            .with_beyond(c.num_beyond)
            .with_num_writes(c.num_writes)
            .with_max_iter(c.max_iter);
        let selection = selector.run(&schedule, rng);

        validate_schedule(&schedule, authors, c.num_writes).map_err(RotaError::Validation)?;
        validate_selection(&schedule, &selection, c.block_size(), c.num_queue, c.num_beyond)
            .map_err(RotaError::Validation)?;

        info!(
            blocks = schedule.block_count(),
            posts = schedule.post_count(),
            selected_blocks = selection.blocks.len(),
            complete = selection.is_complete(),
            "rota ready"
        );
        Ok(Rota {
            schedule,
            selection,
        })
    }

    /// Builds a validated schedule without queue/beyond selection.
    ///
    /// Same errors as [`schedule`](Self::schedule); the selector's
    /// settings are not checked.
    pub fn blocks<R: Rng>(&self, authors: &[String], rng: &mut R) -> Result<Schedule> {
        let c = &self.config;
        self.check_generation(authors, c.num_writes, c.block_size())?;

        let generator = BlockGenerator::new(c.block_size())
            .with_num_writes(c.num_writes)
            .with_max_iter(c.max_iter);
        self.run_trials(&generator, authors, rng)
    }

    /// Pairs every author with a distinct other author, one to one.
    ///
    /// Each author gives (writes) once and receives (edits) once; nobody
    /// is paired with themselves. Uses the configured `max_trials` and
    /// `max_iter`.
    pub fn gift_exchange<R: Rng>(&self, authors: &[String], rng: &mut R) -> Result<Vec<Post>> {
        self.check_generation(authors, 1, 1)?;

        let generator = BlockGenerator::new(1)
            .with_num_writes(1)
            .with_max_iter(self.config.max_iter);
        let schedule = self.run_trials(&generator, authors, rng)?;
        Ok(schedule.blocks.into_iter().flat_map(|b| b.posts).collect())
    }

    /// Generator and trial budget checks, all issues at once.
    fn check_generation(
        &self,
        authors: &[String],
        num_writes: usize,
        block_size: usize,
    ) -> Result<()> {
        let c = &self.config;
        let mut errors = validate_generation(authors, num_writes, block_size, c.max_iter)
            .err()
            .unwrap_or_default();
        errors.extend(validate_trials(c.max_trials).err());
        if errors.is_empty() {
            Ok(())
        } else {
            Err(RotaError::InvalidConfiguration(errors))
        }
    }

    /// Runs up to `max_trials` fresh generation attempts.
    fn run_trials<R: Rng>(
        &self,
        generator: &BlockGenerator,
        authors: &[String],
        rng: &mut R,
    ) -> Result<Schedule> {
        let max_trials = self.config.max_trials;
        for trial in 1..=max_trials {
            debug!(trial, max_trials, "starting generation trial");
            match generator.attempt(authors, rng) {
                Ok(schedule) => {
                    info!(trial, blocks = schedule.block_count(), "schedule generated");
                    return Ok(schedule);
                }
                Err(failure) => debug!(trial, %failure, "trial failed"),
            }
        }
        Err(RotaError::ExhaustedTrials { trials: max_trials })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PostCategory;
    use crate::validation::ValidationErrorKind;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn roster(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn numbered(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("AU{i:02}")).collect()
    }

    /// Small budgets: cheap failed attempts, many of them.
    fn fast_config() -> RotaConfig {
        RotaConfig {
            max_trials: 1_000,
            max_iter: 5_000,
            ..RotaConfig::default()
        }
    }

    #[test]
    fn test_four_authors_two_posts_each() {
        let config = RotaConfig {
            num_writes: 2,
            num_regular: 2,
            num_queue: 0,
            num_beyond: 0,
            ..fast_config()
        };
        let authors = roster(&["A", "B", "C", "D"]);
        let mut rng = SmallRng::seed_from_u64(4);

        let rota = RotaScheduler::new(config).schedule(&authors, &mut rng).unwrap();
        assert_eq!(rota.schedule.post_count(), 8);
        let writes = rota.schedule.write_counts();
        let edits = rota.schedule.edit_counts();
        for a in &authors {
            assert_eq!(writes[a.as_str()], 2);
            assert_eq!(edits[a.as_str()], 2);
        }
    }

    #[test]
    fn test_full_rota_with_selection() {
        let config = RotaConfig {
            num_writes: 2,
            num_regular: 2,
            num_queue: 1,
            num_beyond: 1,
            ..fast_config()
        };
        let authors = numbered(16);
        let mut rng = SmallRng::seed_from_u64(2021);

        let rota = RotaScheduler::new(config.clone())
            .schedule(&authors, &mut rng)
            .unwrap();
        // 32 posts in blocks of 4: eight full blocks.
        assert_eq!(rota.schedule.block_count(), 8);
        assert!(rota.is_complete());
        assert_eq!(rota.selection.blocks.len(), 8);
        assert_eq!(rota.selection.queue_posts().len(), 8);
        assert_eq!(rota.selection.beyond_posts().len(), 8);

        for chosen in &rota.selection.blocks {
            let block = &rota.schedule.blocks[chosen.block_index];
            let q: HashSet<_> = chosen.queue.iter().collect();
            let b: HashSet<_> = chosen.beyond.iter().collect();
            assert!(q.is_disjoint(&b));
            assert!(chosen.special_posts().all(|p| block.contains(p)));
        }
        for tally in rota.selection.tally().values() {
            assert!(tally.total() <= config.num_writes.max(1));
        }
    }

    #[test]
    fn test_partial_final_block_is_uncategorized() {
        let config = RotaConfig {
            num_writes: 1,
            num_regular: 1,
            num_queue: 1,
            num_beyond: 1,
            ..fast_config()
        };
        // 8 posts in blocks of 3: two full blocks and one of 2.
        let authors = numbered(8);
        let mut rng = SmallRng::seed_from_u64(77);

        let rota = RotaScheduler::new(config).schedule(&authors, &mut rng).unwrap();
        assert_eq!(rota.schedule.block_count(), 3);
        let last = rota.schedule.block_count() - 1;
        assert_eq!(rota.schedule.blocks[last].len(), 2);
        for post in &rota.schedule.blocks[last] {
            assert_eq!(rota.selection.category_of(last, post), None);
        }
        let first = &rota.schedule.blocks[0];
        let categories: Vec<PostCategory> = first
            .iter()
            .filter_map(|p| rota.selection.category_of(0, p))
            .collect();
        assert_eq!(categories.len(), 3);
        assert!(categories.contains(&PostCategory::Queue));
        assert!(categories.contains(&PostCategory::Beyond));
        assert!(categories.contains(&PostCategory::Regular));
    }

    #[test]
    fn test_seeded_rota_is_reproducible() {
        let config = RotaConfig {
            num_writes: 2,
            num_regular: 1,
            ..fast_config()
        };
        let authors = numbered(10);
        let scheduler = RotaScheduler::new(config);

        let a = scheduler
            .schedule(&authors, &mut SmallRng::seed_from_u64(9))
            .unwrap();
        let b = scheduler
            .schedule(&authors, &mut SmallRng::seed_from_u64(9))
            .unwrap();
        assert_eq!(a.schedule, b.schedule);
        assert_eq!(a.selection.blocks, b.selection.blocks);
    }

    #[test]
    fn test_config_is_exposed() {
        let config = RotaConfig {
            num_regular: 2,
            ..fast_config()
        };
        let scheduler = RotaScheduler::new(config.clone());
        assert_eq!(scheduler.config(), &config);
        assert_eq!(scheduler.config().block_size(), 4);
    }

    #[test]
    fn test_single_author_is_invalid() {
        let authors = roster(&["A"]);
        let mut rng = SmallRng::seed_from_u64(0);
        let err = RotaScheduler::new(fast_config())
            .schedule(&authors, &mut rng)
            .unwrap_err();
        match err {
            RotaError::InvalidConfiguration(errors) => assert!(errors
                .iter()
                .any(|e| e.kind == ValidationErrorKind::TooFewAuthors)),
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn test_exhausted_trials_returns_no_schedule() {
        // Two authors, one post each, blocks of one: the only valid
        // pairing is A->B then B->A. A one-iteration budget can never
        // place the second block.
        let config = RotaConfig {
            num_writes: 1,
            num_regular: 1,
            num_queue: 0,
            num_beyond: 0,
            max_trials: 5,
            max_iter: 1,
            ..RotaConfig::default()
        };
        let authors = roster(&["A", "B"]);
        let mut rng = SmallRng::seed_from_u64(1);
        let err = RotaScheduler::new(config)
            .schedule(&authors, &mut rng)
            .unwrap_err();
        assert!(matches!(err, RotaError::ExhaustedTrials { trials: 5 }));
    }

    #[test]
    fn test_blocks_skip_selection() {
        // num_queue + num_beyond exceeds the block, but blocks() never selects.
        let config = RotaConfig {
            num_writes: 1,
            num_regular: 0,
            num_queue: 2,
            num_beyond: 0,
            ..fast_config()
        };
        let authors = numbered(6);
        let scheduler = RotaScheduler::new(config);
        let mut rng = SmallRng::seed_from_u64(8);

        let schedule = scheduler.blocks(&authors, &mut rng).unwrap();
        assert_eq!(schedule.post_count(), 6);
        assert_eq!(schedule.block_count(), 3);
        assert!(validate_schedule(&schedule, &authors, 1).is_ok());
    }

    #[test]
    fn test_gift_exchange_three_authors() {
        let authors = roster(&["A", "B", "C"]);
        let scheduler = RotaScheduler::new(fast_config());
        let mut rng = SmallRng::seed_from_u64(12);

        let pairs = scheduler.gift_exchange(&authors, &mut rng).unwrap();
        assert_eq!(pairs.len(), 3);
        let givers: HashSet<&str> = pairs.iter().map(|p| p.writer.as_str()).collect();
        let receivers: HashSet<&str> = pairs.iter().map(|p| p.editor.as_str()).collect();
        assert_eq!(givers, HashSet::from(["A", "B", "C"]));
        assert_eq!(receivers, HashSet::from(["A", "B", "C"]));
        assert!(pairs.iter().all(|p| !p.is_self_edited()));
    }

    #[test]
    fn test_gift_exchange_validates_inputs() {
        let mut rng = SmallRng::seed_from_u64(0);
        let scheduler = RotaScheduler::new(fast_config());
        assert!(matches!(
            scheduler.gift_exchange(&roster(&["A"]), &mut rng),
            Err(RotaError::InvalidConfiguration(_))
        ));

        let no_trials = RotaScheduler::new(RotaConfig {
            max_trials: 0,
            ..fast_config()
        });
        assert!(matches!(
            no_trials.gift_exchange(&roster(&["A", "B"]), &mut rng),
            Err(RotaError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_rota_serializes() {
        let config = RotaConfig {
            num_writes: 1,
            num_regular: 0,
            num_queue: 1,
            num_beyond: 0,
            ..fast_config()
        };
        let authors = roster(&["A", "B", "C"]);
        let mut rng = SmallRng::seed_from_u64(5);
        let rota = RotaScheduler::new(config).schedule(&authors, &mut rng).unwrap();

        let json = serde_json::to_value(&rota).unwrap();
        assert_eq!(json["schedule"]["blocks"].as_array().unwrap().len(), 3);
        assert_eq!(json["selection"]["blocks"].as_array().unwrap().len(), 3);
    }
}
