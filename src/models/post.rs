//! Post model.
//!
//! A post is the unit of work in a rota: one author writes it and a
//! different author edits it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A writer/editor pairing.
///
/// Ordered: `(writer, editor)`. A valid post never has the same author
/// in both roles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Post {
    /// Author who writes the post.
    pub writer: String,
    /// Author who edits the post.
    pub editor: String,
}

/// Category of a post inside a full block.
///
/// Only full-size blocks are categorized; posts of a partial block
/// carry no category at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostCategory {
    /// Ordinary post.
    #[default]
    Regular,
    /// Queue post (scheduled on the first day of the block).
    Queue,
    /// Beyond post (all of a block's beyond posts share one day).
    Beyond,
}

impl Post {
    /// Creates a new post.
    pub fn new(writer: impl Into<String>, editor: impl Into<String>) -> Self {
        Self {
            writer: writer.into(),
            editor: editor.into(),
        }
    }

    /// Whether the writer also edits the post.
    #[inline]
    pub fn is_self_edited(&self) -> bool {
        self.writer == self.editor
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.writer, self.editor)
    }
}

impl PostCategory {
    /// Label used in exported tables. Regular posts have an empty label.
    pub fn label(&self) -> &'static str {
        match self {
            PostCategory::Regular => "",
            PostCategory::Queue => "queue",
            PostCategory::Beyond => "beyond",
        }
    }
}
