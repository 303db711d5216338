//! Author roster loading.
//!
//! A roster file holds one identifier per entry, separated by newlines
//! or any other whitespace (typically author initials).

use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

use crate::error::{Result, RotaError};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Default roster path.
pub const DEFAULT_AUTHORS_FILE: &str = "authors.txt";

/// Upper bound on up-front allocation for generated rosters.
const PREALLOC_LIMIT: usize = 1024;

const LETTERS: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Parses whitespace-delimited author identifiers.
///
/// Keeps first-occurrence order and drops repeats.
pub fn parse_authors(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut authors = Vec::new();
    for token in text.split_whitespace() {
        if seen.insert(token) {
            authors.push(token.to_string());
        } else {
            warn!(author = token, "dropping duplicate author");
        }
    }
    authors
}

/// Reads a roster file.
pub fn load_authors(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_authors(&text))
}

/// Generates `count` distinct random initials.
///
/// Each identifier is `length` distinct uppercase letters. Fails if
/// fewer than `count` such identifiers exist.
pub fn random_authors<R: Rng>(count: usize, length: usize, rng: &mut R) -> Result<Vec<String>> {
    if length == 0 || length > LETTERS.len() || count > distinct_initials(length) {
        return Err(RotaError::InvalidConfiguration(vec![ValidationError::new(
            ValidationErrorKind::ImpossibleInitials,
            format!("cannot generate {count} distinct initials of length {length}"),
        )]));
    }

    let capacity = preallocation(count);
    let mut seen = HashSet::with_capacity(capacity);
    let mut authors = Vec::with_capacity(capacity);
    while authors.len() < count {
        let initials: String = LETTERS.choose_multiple(rng, length).collect();
        if seen.insert(initials.clone()) {
            authors.push(initials);
        }
    }
    Ok(authors)
}

/// Initial capacity for a roster of `count` generated authors.
fn preallocation(count: usize) -> usize {
    count.min(PREALLOC_LIMIT)
}

/// Number of ordered selections of `length` distinct letters.
fn distinct_initials(length: usize) -> usize {
    (0..length).fold(1usize, |acc, i| acc.saturating_mul(LETTERS.len() - i))
}
