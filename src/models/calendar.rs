//! Calendar layout models.
//!
//! Maps the posts of a block onto days of a 7-day cycle for export.
//! The mapping is cosmetic: it never affects which posts exist or who
//! writes and edits them.
//!
//! # Layout
//! For each block:
//! - Queue posts go on `first_day`.
//! - Regular posts follow on consecutive days (starting on `first_day`
//!   itself when the block has no queue posts), wrapping after Saturday.
//! - When the running day reaches `beyond_day`, all beyond posts of the
//!   block share that day and the cycle moves on by one day.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Block, BlockSelection, Post, PostCategory};

/// Day of the week.
///
/// Serializes as the full English name and deserializes through
/// [`FromStr`], so config files accept any case and three-letter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

/// Error returned when a weekday name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown weekday '{0}'")]
pub struct ParseWeekdayError(pub String);

/// One post placed on a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAssignment<'a> {
    /// Day label.
    pub day: Weekday,
    /// The placed post.
    pub post: &'a Post,
    /// Category of the post.
    pub category: PostCategory,
}

/// Day-of-week layout settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarLayout {
    /// First day of each block (queue posts land here).
    pub first_day: Weekday,
    /// Day shared by all beyond posts of a block.
    pub beyond_day: Weekday,
}

impl Weekday {
    /// All days, Sunday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Position in the week (Sunday = 0).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Day at a position, wrapping modulo 7.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Following day.
    pub fn succ(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Full English name.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = ParseWeekdayError;

    /// Accepts full names or three-letter abbreviations, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|d| {
                let name = d.name().to_ascii_lowercase();
                lower == name || (lower.len() == 3 && name.starts_with(&lower))
            })
            .ok_or_else(|| ParseWeekdayError(s.to_string()))
    }
}

impl TryFrom<String> for Weekday {
    type Error = ParseWeekdayError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Default for CalendarLayout {
    fn default() -> Self {
        Self {
            first_day: Weekday::Sunday,
            beyond_day: Weekday::Friday,
        }
    }
}

impl CalendarLayout {
    /// Creates a layout.
    pub fn new(first_day: Weekday, beyond_day: Weekday) -> Self {
        Self {
            first_day,
            beyond_day,
        }
    }

    /// Places the posts of one block on days.
    ///
    /// `selection` is the block's queue/beyond selection, if it has one.
    /// Without a selection every post is laid out as regular, starting
    /// on `first_day`.
    pub fn layout_block<'a>(
        &self,
        block: &'a Block,
        selection: Option<&'a BlockSelection>,
    ) -> Vec<DayAssignment<'a>> {
        let (queue, beyond): (&[Post], &[Post]) = match selection {
            Some(s) => (s.queue.as_slice(), s.beyond.as_slice()),
            None => (&[][..], &[][..]),
        };

        let mut placed = Vec::with_capacity(block.len());
        let mut day = self.first_day;

        if !queue.is_empty() {
            for post in queue {
                placed.push(DayAssignment {
                    day: self.first_day,
                    post,
                    category: PostCategory::Queue,
                });
            }
            day = day.succ();
        }

        let mut pending_beyond = beyond;
        for post in block
            .iter()
            .filter(|p| !queue.contains(p) && !beyond.contains(p))
        {
            if day == self.beyond_day && !pending_beyond.is_empty() {
                placed.extend(pending_beyond.iter().map(|b| DayAssignment {
                    day,
                    post: b,
                    category: PostCategory::Beyond,
                }));
                pending_beyond = &[];
                day = day.succ();
            }
            placed.push(DayAssignment {
                day,
                post,
                category: PostCategory::Regular,
            });
            day = day.succ();
        }

        // Regular posts ran out before the beyond day came round.
        placed.extend(pending_beyond.iter().map(|b| DayAssignment {
            day: self.beyond_day,
            post: b,
            category: PostCategory::Beyond,
        }));

        placed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week_block() -> Block {
        Block::pair(
            ["A", "B", "C", "D", "E", "F", "G"],
            ["H", "I", "J", "K", "L", "M", "N"],
        )
    }

    #[test]
    fn test_weekday_cycle() {
        assert_eq!(Weekday::Saturday.succ(), Weekday::Sunday);
        assert_eq!(Weekday::from_index(9), Weekday::Tuesday);
        assert_eq!(Weekday::Wednesday.index(), 3);
    }

    #[test]
    fn test_weekday_parse() {
        assert_eq!("Friday".parse::<Weekday>().unwrap(), Weekday::Friday);
        assert_eq!("fri".parse::<Weekday>().unwrap(), Weekday::Friday);
        assert_eq!(" SUNDAY ".parse::<Weekday>().unwrap(), Weekday::Sunday);
        assert!("Fr".parse::<Weekday>().is_err());
        assert!("Funday".parse::<Weekday>().is_err());
    }

    #[test]
    fn test_weekday_serde_uses_parser() {
        let day: Weekday = serde_json::from_str("\"thu\"").unwrap();
        assert_eq!(day, Weekday::Thursday);
        assert_eq!(serde_json::to_string(&Weekday::Thursday).unwrap(), "\"Thursday\"");
        assert!(serde_json::from_str::<Weekday>("\"Thurs\"").is_err());
    }

    #[test]
    fn test_layout_full_week() {
        let block = week_block();
        let selection = BlockSelection::new(
            0,
            vec![Post::new("C", "J")],
            vec![Post::new("F", "M")],
        );
        let layout = CalendarLayout::default();
        let placed = layout.layout_block(&block, Some(&selection));

        assert_eq!(placed.len(), 7);
        assert_eq!(placed[0].day, Weekday::Sunday);
        assert_eq!(placed[0].category, PostCategory::Queue);
        assert_eq!(placed[0].post.writer, "C");

        let days: Vec<Weekday> = placed.iter().map(|p| p.day).collect();
        assert_eq!(days, Weekday::ALL.to_vec());

        let friday: Vec<_> = placed.iter().filter(|p| p.day == Weekday::Friday).collect();
        assert_eq!(friday.len(), 1);
        assert_eq!(friday[0].category, PostCategory::Beyond);
        assert_eq!(friday[0].post.writer, "F");

        // Regular posts keep block order.
        let regular: Vec<&str> = placed
            .iter()
            .filter(|p| p.category == PostCategory::Regular)
            .map(|p| p.post.writer.as_str())
            .collect();
        assert_eq!(regular, vec!["A", "B", "D", "E", "G"]);
    }

    #[test]
    fn test_beyond_posts_share_one_day() {
        let block = week_block();
        let selection = BlockSelection::new(
            0,
            vec![Post::new("A", "H")],
            vec![Post::new("B", "I"), Post::new("C", "J")],
        );
        let placed = CalendarLayout::default().layout_block(&block, Some(&selection));

        assert_eq!(placed.len(), 7);
        let beyond: Vec<_> = placed
            .iter()
            .filter(|p| p.category == PostCategory::Beyond)
            .collect();
        assert_eq!(beyond.len(), 2);
        assert!(beyond.iter().all(|p| p.day == Weekday::Friday));
    }

    #[test]
    fn test_partial_block_without_selection() {
        let block = Block::pair(["A", "B"], ["C", "D"]);
        let layout = CalendarLayout::new(Weekday::Monday, Weekday::Friday);
        let placed = layout.layout_block(&block, None);

        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].day, Weekday::Monday);
        assert_eq!(placed[1].day, Weekday::Tuesday);
        assert!(placed.iter().all(|p| p.category == PostCategory::Regular));
    }

    #[test]
    fn test_beyond_flushed_when_day_not_reached() {
        let block = Block::pair(["A", "B", "C"], ["D", "E", "F"]);
        let selection = BlockSelection::new(0, vec![Post::new("A", "D")], vec![Post::new("C", "F")]);
        let placed = CalendarLayout::default().layout_block(&block, Some(&selection));

        assert_eq!(placed.len(), 3);
        let last = placed.last().unwrap();
        assert_eq!(last.category, PostCategory::Beyond);
        assert_eq!(last.day, Weekday::Friday);
    }
}
