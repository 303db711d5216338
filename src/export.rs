//! CSV export.
//!
//! Three tables, each with a header row:
//!
//! | Table | Columns |
//! |-------|---------|
//! | Calendar | `week_num, day, writer, editor, post_type` |
//! | Blocks | `block_index, writer, editor` |
//! | Pairs | `writer, editor` |
//!
//! `week_num` is 1-based, `block_index` 0-based. `post_type` is empty for
//! regular posts and `queue` or `beyond` otherwise.

use serde::Serialize;
use std::io::Write;
use tracing::debug;

use crate::error::Result;
use crate::models::{CalendarLayout, Post, Schedule};
use crate::scheduler::Rota;

#[derive(Serialize)]
struct CalendarRow<'a> {
    week_num: usize,
    day: &'static str,
    writer: &'a str,
    editor: &'a str,
    post_type: &'static str,
}

#[derive(Serialize)]
struct BlockRow<'a> {
    block_index: usize,
    writer: &'a str,
    editor: &'a str,
}

#[derive(Serialize)]
struct PairRow<'a> {
    writer: &'a str,
    editor: &'a str,
}

/// Writes the calendar table.
///
/// Blocks without a selection (partial blocks, or blocks after an
/// exhausted selection) are laid out with every post regular.
pub fn write_calendar<W: Write>(rota: &Rota, layout: &CalendarLayout, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    let mut rows = 0usize;

    for (block_index, block) in rota.schedule.blocks.iter().enumerate() {
        let selection = rota.selection.for_block(block_index);
        for placed in layout.layout_block(block, selection) {
            writer.serialize(CalendarRow {
                week_num: block_index + 1,
                day: placed.day.name(),
                writer: &placed.post.writer,
                editor: &placed.post.editor,
                post_type: placed.category.label(),
            })?;
            rows += 1;
        }
    }

    writer.flush()?;
    debug!(rows, "calendar written");
    Ok(())
}

/// Writes the block table, one row per post.
pub fn write_blocks<W: Write>(schedule: &Schedule, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for (block_index, post) in schedule.posts() {
        writer.serialize(BlockRow {
            block_index,
            writer: &post.writer,
            editor: &post.editor,
        })?;
    }
    writer.flush()?;
    debug!(rows = schedule.post_count(), "blocks written");
    Ok(())
}

/// Writes writer/editor pairs (gift exchange).
pub fn write_pairs<W: Write>(pairs: &[Post], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for post in pairs {
        writer.serialize(PairRow {
            writer: &post.writer,
            editor: &post.editor,
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Block, BlockSelection, Selection, Weekday};

    fn to_string(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    fn sample_rota() -> Rota {
        let schedule = Schedule::from_blocks(vec![
            Block::pair(["A", "B", "C"], ["D", "E", "F"]),
            Block::pair(["D", "E"], ["A", "B"]),
        ]);
        let mut selection = Selection::new();
        selection.blocks.push(BlockSelection::new(
            0,
            vec![Post::new("B", "E")],
            vec![Post::new("A", "D")],
        ));
        Rota {
            schedule,
            selection,
        }
    }

    #[test]
    fn test_write_calendar() {
        let layout = CalendarLayout::new(Weekday::Sunday, Weekday::Monday);
        let mut buf = Vec::new();
        write_calendar(&sample_rota(), &layout, &mut buf).unwrap();

        let expected = "\
week_num,day,writer,editor,post_type
1,Sunday,B,E,queue
1,Monday,A,D,beyond
1,Tuesday,C,F,
2,Sunday,D,A,
2,Monday,E,B,
";
        assert_eq!(to_string(buf), expected);
    }

    #[test]
    fn test_write_calendar_beyond_day_not_reached() {
        // Friday never comes round in a three-post block.
        let layout = CalendarLayout::default();
        let mut buf = Vec::new();
        write_calendar(&sample_rota(), &layout, &mut buf).unwrap();

        let text = to_string(buf);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines.contains(&"1,Friday,A,D,beyond"));
    }

    #[test]
    fn test_write_blocks() {
        let mut buf = Vec::new();
        write_blocks(&sample_rota().schedule, &mut buf).unwrap();

        let expected = "\
block_index,writer,editor
0,A,D
0,B,E
0,C,F
1,D,A
1,E,B
";
        assert_eq!(to_string(buf), expected);
    }

    #[test]
    fn test_write_pairs() {
        let pairs = vec![Post::new("A", "B"), Post::new("B", "C"), Post::new("C", "A")];
        let mut buf = Vec::new();
        write_pairs(&pairs, &mut buf).unwrap();
        assert_eq!(to_string(buf), "writer,editor\nA,B\nB,C\nC,A\n");
    }

    #[test]
    fn test_write_to_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        write_blocks(&sample_rota().schedule, file.reopen().unwrap()).unwrap();
        let text = std::fs::read_to_string(file.path()).unwrap();
        assert!(text.starts_with("block_index,writer,editor\n"));
        assert_eq!(text.lines().count(), 6);
    }
}
