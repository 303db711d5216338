//! Validation for rota inputs and results.
//!
//! Three checks live here:
//! - [`validate_schedule`]: fairness and adjacency invariants of a finished
//!   schedule. Used as a predicate inside retry loops, so it reports only
//!   the first violation and never panics.
//! - [`validate_selection`]: queue/beyond selections are well-formed.
//! - [`validate_config`]: rejects structurally impossible requests before
//!   any random work starts. Reports every issue found.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::config::RotaConfig;
use crate::models::{Schedule, Selection};

/// Validation result (all issues).
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A post is written and edited by the same author.
    SelfEdit,
    /// An author writes twice in one block.
    DuplicateWriter,
    /// An author edits twice in one block.
    DuplicateEditor,
    /// An author writes in two consecutive blocks.
    ConsecutiveWrite,
    /// An author edits in two consecutive blocks.
    ConsecutiveEdit,
    /// A post names an author outside the roster.
    UnknownAuthor,
    /// An author's total writes differ from `num_writes`.
    WriteCountMismatch,
    /// An author's total edits differ from `num_writes`.
    EditCountMismatch,
    /// A selection refers to a block that is missing or not full.
    IneligibleBlock,
    /// A selected post is not part of its block.
    ForeignPost,
    /// A post is both queue and beyond, or a category has the wrong size.
    MalformedSelection,
    /// Fewer than two authors.
    TooFewAuthors,
    /// The same author is listed twice.
    DuplicateAuthor,
    /// Block size is zero.
    ZeroBlockSize,
    /// A block needs more distinct authors than the roster has.
    BlockTooWide,
    /// Queue plus beyond posts exceed the block size.
    TooManySpecialPosts,
    /// A retry budget is zero.
    ZeroBudget,
    /// Authors times `num_writes` overflows.
    TooManyPosts,
    /// Random initials cannot be generated as requested.
    ImpossibleInitials,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Checks a schedule against the rota invariants.
///
/// Checks, in order, stopping at the first failure:
/// 1. Per post: writer differs from editor, writer and editor are not
///    repeated within the block, neither repeats its role from the
///    previous block, both are on the roster.
/// 2. Every author writes exactly `num_writes` times.
/// 3. Every author edits exactly `num_writes` times.
pub fn validate_schedule(
    schedule: &Schedule,
    authors: &[String],
    num_writes: usize,
) -> Result<(), ValidationError> {
    use ValidationErrorKind::*;

    let mut write_counts: HashMap<&str, usize> =
        authors.iter().map(|a| (a.as_str(), 0)).collect();
    let mut edit_counts = write_counts.clone();

    let mut prev_writers: HashSet<&str> = HashSet::new();
    let mut prev_editors: HashSet<&str> = HashSet::new();

    for (index, block) in schedule.blocks.iter().enumerate() {
        let mut writers = HashSet::new();
        let mut editors = HashSet::new();

        for post in block {
            let (w, e) = (post.writer.as_str(), post.editor.as_str());
            if post.is_self_edited() {
                return Err(ValidationError::new(
                    SelfEdit,
                    format!("block {index}: {w} writes and edits the same post"),
                ));
            }
            if !writers.insert(w) {
                return Err(ValidationError::new(
                    DuplicateWriter,
                    format!("block {index}: {w} writes more than once"),
                ));
            }
            if !editors.insert(e) {
                return Err(ValidationError::new(
                    DuplicateEditor,
                    format!("block {index}: {e} edits more than once"),
                ));
            }
            if prev_writers.contains(w) {
                return Err(ValidationError::new(
                    ConsecutiveWrite,
                    format!("block {index}: back-to-back write by {w}"),
                ));
            }
            if prev_editors.contains(e) {
                return Err(ValidationError::new(
                    ConsecutiveEdit,
                    format!("block {index}: back-to-back edit by {e}"),
                ));
            }
            match (write_counts.get_mut(w), edit_counts.get_mut(e)) {
                (Some(wc), Some(ec)) => {
                    *wc += 1;
                    *ec += 1;
                }
                (None, _) => {
                    return Err(ValidationError::new(
                        UnknownAuthor,
                        format!("block {index}: writer {w} is not on the roster"),
                    ))
                }
                (_, None) => {
                    return Err(ValidationError::new(
                        UnknownAuthor,
                        format!("block {index}: editor {e} is not on the roster"),
                    ))
                }
            }
        }

        prev_writers = writers;
        prev_editors = editors;
    }

    for author in authors {
        let writes = write_counts[author.as_str()];
        if writes != num_writes {
            return Err(ValidationError::new(
                WriteCountMismatch,
                format!("{author} writes {writes} times, expected {num_writes}"),
            ));
        }
    }
    for author in authors {
        let edits = edit_counts[author.as_str()];
        if edits != num_writes {
            return Err(ValidationError::new(
                EditCountMismatch,
                format!("{author} edits {edits} times, expected {num_writes}"),
            ));
        }
    }

    Ok(())
}

/// Checks that every committed block selection is well-formed.
///
/// Each selection must point at a full block, pick `num_queue` queue and
/// `num_beyond` beyond posts from that block, and keep the two disjoint.
pub fn validate_selection(
    schedule: &Schedule,
    selection: &Selection,
    block_size: usize,
    num_queue: usize,
    num_beyond: usize,
) -> Result<(), ValidationError> {
    use ValidationErrorKind::*;

    for chosen in &selection.blocks {
        let index = chosen.block_index;
        let block = match schedule.blocks.get(index) {
            Some(b) if b.is_full(block_size) => b,
            _ => {
                return Err(ValidationError::new(
                    IneligibleBlock,
                    format!("block {index} is missing or not a full block"),
                ))
            }
        };

        if chosen.queue.len() != num_queue || chosen.beyond.len() != num_beyond {
            return Err(ValidationError::new(
                MalformedSelection,
                format!(
                    "block {index}: selected {} queue and {} beyond posts, expected {num_queue} and {num_beyond}",
                    chosen.queue.len(),
                    chosen.beyond.len()
                ),
            ));
        }

        if let Some(post) = chosen.special_posts().find(|p| !block.contains(p)) {
            return Err(ValidationError::new(
                ForeignPost,
                format!("block {index}: selected post {post} is not in the block"),
            ));
        }

        if let Some(post) = chosen.queue.iter().find(|p| chosen.beyond.contains(p)) {
            return Err(ValidationError::new(
                MalformedSelection,
                format!("block {index}: post {post} is both queue and beyond"),
            ));
        }
    }

    Ok(())
}

/// Validates a full scheduling request.
///
/// Checks:
/// 1. Generation inputs (see [`validate_generation`])
/// 2. Queue plus beyond posts fit in a block
/// 3. `max_trials` is positive
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_config(config: &RotaConfig, authors: &[String]) -> ValidationResult {
    let mut errors = match validate_generation(
        authors,
        config.num_writes,
        config.block_size(),
        config.max_iter,
    ) {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };

    errors.extend(
        validate_special_counts(config.block_size(), config.num_queue, config.num_beyond).err(),
    );
    errors.extend(validate_trials(config.max_trials).err());

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates the inputs of a single generation run.
///
/// Checks:
/// 1. At least two authors
/// 2. No duplicate authors
/// 3. Non-zero block size
/// 4. The first block can be filled with distinct authors: every post
///    needs its own writer and editor, so a block of `k` posts needs `2k`
///    authors
/// 5. The total post count (`authors * num_writes`) is representable
/// 6. Non-zero iteration budget
pub fn validate_generation(
    authors: &[String],
    num_writes: usize,
    block_size: usize,
    max_iter: usize,
) -> ValidationResult {
    use ValidationErrorKind::*;
    let mut errors = Vec::new();

    if authors.len() < 2 {
        errors.push(ValidationError::new(
            TooFewAuthors,
            format!(
                "at least 2 authors are required, got {}",
                authors.len()
            ),
        ));
    }

    let mut seen = HashSet::new();
    for author in authors {
        if !seen.insert(author.as_str()) {
            errors.push(ValidationError::new(
                DuplicateAuthor,
                format!("duplicate author: {author}"),
            ));
        }
    }

    if block_size == 0 {
        errors.push(ValidationError::new(ZeroBlockSize, "block_size must be at least 1"));
    }

    let total_posts = match authors.len().checked_mul(num_writes) {
        Some(total) => total,
        None => {
            errors.push(ValidationError::new(
                TooManyPosts,
                format!(
                    "{} authors writing {num_writes} posts each is too many posts",
                    authors.len()
                ),
            ));
            usize::MAX
        }
    };

    let first_block = block_size.min(total_posts);
    if authors.len() >= 2 && first_block.saturating_mul(2) > authors.len() {
        errors.push(ValidationError::new(
            BlockTooWide,
            format!(
                "a block of {first_block} posts needs {} distinct authors, only {} available",
                first_block.saturating_mul(2),
                authors.len()
            ),
        ));
    }

    if max_iter == 0 {
        errors.push(ValidationError::new(ZeroBudget, "max_iter must be at least 1"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks that at least one generation trial is allowed.
pub fn validate_trials(max_trials: usize) -> Result<(), ValidationError> {
    if max_trials == 0 {
        return Err(ValidationError::new(
            ValidationErrorKind::ZeroBudget,
            "max_trials must be at least 1",
        ));
    }
    Ok(())
}

/// Checks that `num_queue + num_beyond` posts fit in one block.
pub fn validate_special_counts(
    block_size: usize,
    num_queue: usize,
    num_beyond: usize,
) -> Result<(), ValidationError> {
    if num_queue.saturating_add(num_beyond) > block_size {
        return Err(ValidationError::new(
            ValidationErrorKind::TooManySpecialPosts,
            format!(
                "{num_queue} queue + {num_beyond} beyond posts do not fit in a block of {block_size}"
            ),
        ));
    }
    Ok(())
}
