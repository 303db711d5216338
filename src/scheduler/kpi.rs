//! Rota quality metrics (KPIs).
//!
//! Summarizes a finished rota: how many blocks and posts it spans and how
//! the workload and the special posts fall on each author.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Blocks | Total blocks, and how many are full |
//! | Posts | Total posts |
//! | Writes / Edits | Posts written / edited per author |
//! | Queue / Beyond | Special posts written per author |
//! | Max special | Largest queue + beyond count of any author |
//! | Special spread | Max minus min queue + beyond count over all authors |

use std::collections::BTreeMap;

use super::Rota;

/// Rota performance indicators.
///
/// Per-author maps are keyed by author and sorted for stable output.
#[derive(Debug, Clone)]
pub struct RotaKpi {
    /// Number of blocks.
    pub block_count: usize,
    /// Blocks holding exactly `block_size` posts.
    pub full_block_count: usize,
    /// Number of posts.
    pub post_count: usize,
    /// Posts written per author.
    pub writes: BTreeMap<String, usize>,
    /// Posts edited per author.
    pub edits: BTreeMap<String, usize>,
    /// Queue posts written per author.
    pub queue: BTreeMap<String, usize>,
    /// Beyond posts written per author.
    pub beyond: BTreeMap<String, usize>,
    /// Largest queue + beyond count held by one author.
    pub max_special_per_author: usize,
    /// Whether every full block received special posts.
    pub selection_complete: bool,
}

impl RotaKpi {
    /// Computes KPIs for a rota whose nominal block size is `block_size`.
    pub fn calculate(rota: &Rota, block_size: usize) -> Self {
        let schedule = &rota.schedule;

        let mut writes = BTreeMap::new();
        let mut edits = BTreeMap::new();
        for (_, post) in schedule.posts() {
            *writes.entry(post.writer.clone()).or_insert(0) += 1;
            *edits.entry(post.editor.clone()).or_insert(0) += 1;
        }

        let mut queue = BTreeMap::new();
        let mut beyond = BTreeMap::new();
        for (author, tally) in rota.selection.tally() {
            if tally.queue > 0 {
                queue.insert(author.to_string(), tally.queue);
            }
            if tally.beyond > 0 {
                beyond.insert(author.to_string(), tally.beyond);
            }
        }

        let max_special_per_author = writes
            .keys()
            .map(|a| special_count(&queue, &beyond, a))
            .max()
            .unwrap_or(0);

        Self {
            block_count: schedule.block_count(),
            full_block_count: schedule.full_blocks(block_size).count(),
            post_count: schedule.post_count(),
            writes,
            edits,
            queue,
            beyond,
            max_special_per_author,
            selection_complete: rota.is_complete(),
        }
    }

    /// Queue + beyond posts written by `author`.
    pub fn special_for(&self, author: &str) -> usize {
        special_count(&self.queue, &self.beyond, author)
    }

    /// Difference between the most and least special posts held by any
    /// author who writes.
    pub fn special_spread(&self) -> usize {
        let counts: Vec<usize> = self.writes.keys().map(|a| self.special_for(a)).collect();
        match (counts.iter().max(), counts.iter().min()) {
            (Some(max), Some(min)) => max - min,
            _ => 0,
        }
    }

    /// Whether the rota is complete and nobody holds more than
    /// `max_special` special posts.
    pub fn meets_thresholds(&self, max_special: usize) -> bool {
        self.selection_complete && self.max_special_per_author <= max_special
    }
}

fn special_count(
    queue: &BTreeMap<String, usize>,
    beyond: &BTreeMap<String, usize>,
    author: &str,
) -> usize {
    queue.get(author).copied().unwrap_or(0) + beyond.get(author).copied().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SelectionExhausted;
    use crate::models::{Block, BlockSelection, Post, Schedule, Selection};

    fn sample_rota() -> Rota {
        let schedule = Schedule::from_blocks(vec![
            Block::pair(["A", "B"], ["C", "D"]),
            Block::pair(["C", "D"], ["A", "B"]),
            Block::pair(["A"], ["B"]),
        ]);
        let mut selection = Selection::new();
        selection.blocks.push(BlockSelection::new(
            0,
            vec![Post::new("A", "C")],
            vec![Post::new("B", "D")],
        ));
        selection.blocks.push(BlockSelection::new(
            1,
            vec![Post::new("C", "A")],
            vec![Post::new("D", "B")],
        ));
        Rota {
            schedule,
            selection,
        }
    }

    #[test]
    fn test_kpi_basic() {
        let kpi = RotaKpi::calculate(&sample_rota(), 2);
        assert_eq!(kpi.block_count, 3);
        assert_eq!(kpi.full_block_count, 2);
        assert_eq!(kpi.post_count, 5);
        assert_eq!(kpi.writes["A"], 2);
        assert_eq!(kpi.writes["D"], 1);
        assert_eq!(kpi.edits["B"], 2);
        assert!(kpi.selection_complete);
    }

    #[test]
    fn test_kpi_special_counts() {
        let kpi = RotaKpi::calculate(&sample_rota(), 2);
        assert_eq!(kpi.queue["A"], 1);
        assert_eq!(kpi.queue["C"], 1);
        assert_eq!(kpi.beyond["B"], 1);
        assert!(!kpi.beyond.contains_key("A"));
        assert_eq!(kpi.special_for("A"), 1);
        assert_eq!(kpi.max_special_per_author, 1);
        assert_eq!(kpi.special_spread(), 0);
    }

    #[test]
    fn test_kpi_spread_counts_authors_without_specials() {
        let mut rota = sample_rota();
        rota.selection.blocks.truncate(1);
        let kpi = RotaKpi::calculate(&rota, 2);
        // C and D write but hold no special post.
        assert_eq!(kpi.special_for("C"), 0);
        assert_eq!(kpi.special_spread(), 1);
    }

    #[test]
    fn test_kpi_empty() {
        let rota = Rota {
            schedule: Schedule::new(),
            selection: Selection::new(),
        };
        let kpi = RotaKpi::calculate(&rota, 3);
        assert_eq!(kpi.block_count, 0);
        assert_eq!(kpi.post_count, 0);
        assert_eq!(kpi.max_special_per_author, 0);
        assert_eq!(kpi.special_spread(), 0);
        assert!(kpi.meets_thresholds(0));
    }

    #[test]
    fn test_meets_thresholds() {
        let kpi = RotaKpi::calculate(&sample_rota(), 2);
        assert!(kpi.meets_thresholds(1));
        assert!(!kpi.meets_thresholds(0));

        let mut rota = sample_rota();
        rota.selection.exhausted = Some(SelectionExhausted {
            iterations: 10,
            completed_blocks: 2,
            eligible_blocks: 2,
        });
        let kpi = RotaKpi::calculate(&rota, 2);
        assert!(!kpi.selection_complete);
        assert!(!kpi.meets_thresholds(1));
    }
}
