//! Schedule (solution) model.
//!
//! A schedule is the ordered list of blocks produced by one successful
//! generation attempt. Block order matters: adjacency constraints and
//! the calendar layout are both defined on consecutive blocks.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Block, Post};

/// A complete rota: blocks of writer/editor posts in period order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Blocks in period order.
    pub blocks: Vec<Block>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a schedule from blocks.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Appends a block.
    pub fn push_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Total number of posts across all blocks.
    pub fn post_count(&self) -> usize {
        self.blocks.iter().map(Block::len).sum()
    }

    /// Iterates every post together with its block index.
    pub fn posts(&self) -> impl Iterator<Item = (usize, &Post)> {
        self.blocks
            .iter()
            .enumerate()
            .flat_map(|(i, b)| b.iter().map(move |p| (i, p)))
    }

    /// Number of posts each author writes.
    pub fn write_counts(&self) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for (_, post) in self.posts() {
            *counts.entry(post.writer.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of posts each author edits.
    pub fn edit_counts(&self) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for (_, post) in self.posts() {
            *counts.entry(post.editor.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Blocks of exactly `block_size` posts, with their indices.
    pub fn full_blocks(&self, block_size: usize) -> impl Iterator<Item = (usize, &Block)> {
        self.blocks
            .iter()
            .enumerate()
            .filter(move |(_, b)| b.is_full(block_size))
    }
}
