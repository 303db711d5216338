//! Queue/beyond selection model.
//!
//! After a schedule is accepted, each full block gets a fixed number of
//! queue and beyond posts. The selection is kept beside the schedule
//! rather than written into it, so the validated schedule never changes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Post, PostCategory};
use crate::error::SelectionExhausted;

/// Queue and beyond posts chosen from one full block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSelection {
    /// Index of the block in the schedule.
    pub block_index: usize,
    /// Posts marked as queue posts.
    pub queue: Vec<Post>,
    /// Posts marked as beyond posts (disjoint from `queue`).
    pub beyond: Vec<Post>,
}

/// Per-author special post counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialTally {
    /// Queue posts written.
    pub queue: usize,
    /// Beyond posts written.
    pub beyond: usize,
}

/// Result of queue/beyond selection over a whole schedule.
///
/// `exhausted` is set when the shared iteration budget ran out; blocks
/// after the last committed one then have no selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Selection {
    /// Committed selections, in block order.
    pub blocks: Vec<BlockSelection>,
    /// Set when selection stopped early.
    #[serde(skip)]
    pub exhausted: Option<SelectionExhausted>,
}

impl BlockSelection {
    /// Creates a block selection.
    pub fn new(block_index: usize, queue: Vec<Post>, beyond: Vec<Post>) -> Self {
        Self {
            block_index,
            queue,
            beyond,
        }
    }

    /// Category of a post within this block.
    pub fn category_of(&self, post: &Post) -> PostCategory {
        if self.queue.contains(post) {
            PostCategory::Queue
        } else if self.beyond.contains(post) {
            PostCategory::Beyond
        } else {
            PostCategory::Regular
        }
    }

    /// Queue and beyond posts together.
    pub fn special_posts(&self) -> impl Iterator<Item = &Post> {
        self.queue.iter().chain(self.beyond.iter())
    }
}

impl SpecialTally {
    /// Queue plus beyond count.
    #[inline]
    pub fn total(&self) -> usize {
        self.queue + self.beyond
    }
}

impl Selection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether every eligible block received a selection.
    pub fn is_complete(&self) -> bool {
        self.exhausted.is_none()
    }

    /// Selection for the given block, if one was committed.
    pub fn for_block(&self, block_index: usize) -> Option<&BlockSelection> {
        self.blocks.iter().find(|b| b.block_index == block_index)
    }

    /// Category of a post, or `None` if its block has no selection.
    pub fn category_of(&self, block_index: usize, post: &Post) -> Option<PostCategory> {
        self.for_block(block_index).map(|b| b.category_of(post))
    }

    /// All queue posts, in block order.
    pub fn queue_posts(&self) -> Vec<&Post> {
        self.blocks.iter().flat_map(|b| b.queue.iter()).collect()
    }

    /// All beyond posts, in block order.
    pub fn beyond_posts(&self) -> Vec<&Post> {
        self.blocks.iter().flat_map(|b| b.beyond.iter()).collect()
    }

    /// Special post counts per writer.
    pub fn tally(&self) -> HashMap<&str, SpecialTally> {
        let mut tally: HashMap<&str, SpecialTally> = HashMap::new();
        for block in &self.blocks {
            for post in &block.queue {
                tally.entry(post.writer.as_str()).or_default().queue += 1;
            }
            for post in &block.beyond {
                tally.entry(post.writer.as_str()).or_default().beyond += 1;
            }
        }
        tally
    }
}
