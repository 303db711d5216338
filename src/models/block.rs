//! Block model.
//!
//! A block is one scheduling period (typically a week): an ordered
//! sequence of posts, at most `block_size` long. Only the final block
//! of a schedule may be shorter than `block_size`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::Post;

/// An ordered group of posts sharing one scheduling period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Posts in period order.
    pub posts: Vec<Post>,
}

impl Block {
    /// Creates a block by pairing writers with editors positionally.
    ///
    /// Extra entries in the longer list are ignored.
    pub fn pair<W, E>(writers: W, editors: E) -> Self
    where
        W: IntoIterator,
        W::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        let posts = writers
            .into_iter()
            .zip(editors)
            .map(|(w, e)| Post::new(w, e))
            .collect();
        Self { posts }
    }

    /// Number of posts.
    #[inline]
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether the block has no posts.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Whether the block has exactly the nominal size.
    #[inline]
    pub fn is_full(&self, block_size: usize) -> bool {
        self.posts.len() == block_size
    }

    /// Authors writing in this block.
    pub fn writers(&self) -> HashSet<&str> {
        self.posts.iter().map(|p| p.writer.as_str()).collect()
    }

    /// Authors editing in this block.
    pub fn editors(&self) -> HashSet<&str> {
        self.posts.iter().map(|p| p.editor.as_str()).collect()
    }

    /// Whether the block contains the given post.
    pub fn contains(&self, post: &Post) -> bool {
        self.posts.contains(post)
    }

    /// Iterates posts in period order.
    pub fn iter(&self) -> std::slice::Iter<'_, Post> {
        self.posts.iter()
    }
}

impl<'a> IntoIterator for &'a Block {
    type Item = &'a Post;
    type IntoIter = std::slice::Iter<'a, Post>;

    fn into_iter(self) -> Self::IntoIter {
        self.posts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_positional() {
        let b = Block::pair(["A", "B"], ["C", "D"]);
        assert_eq!(b.posts, vec![Post::new("A", "C"), Post::new("B", "D")]);
    }

    #[test]
    fn test_pair_truncates_to_shorter() {
        let b = Block::pair(["A", "B", "E"], ["C", "D"]);
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn test_role_sets() {
        let b = Block::pair(["A", "B"], ["C", "D"]);
        assert_eq!(b.writers(), HashSet::from(["A", "B"]));
        assert_eq!(b.editors(), HashSet::from(["C", "D"]));
        assert!(b.contains(&Post::new("B", "D")));
        assert!(!b.contains(&Post::new("D", "B")));
    }

    #[test]
    fn test_is_full() {
        let b = Block::pair(["A"], ["B"]);
        assert!(b.is_full(1));
        assert!(!b.is_full(2));
        assert!(Block::default().is_empty());
    }
}
