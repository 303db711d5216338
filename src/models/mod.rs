//! Rota domain models.
//!
//! Provides the core data types for rotating writer/editor assignments:
//! posts, blocks, schedules, the author pools they are drawn from, the
//! queue/beyond selection layered on top, and the calendar layout used
//! for export.
//!
//! # Domain Mappings
//!
//! | u-rota | Editorial | Peer review | Gift exchange |
//! |--------|-----------|-------------|---------------|
//! | Post | Article | Review | Gift |
//! | writer | Author | Reviewee | Giver |
//! | editor | Editor | Reviewer | Receiver |
//! | Block | Week | Round | (single pairing) |

mod block;
mod calendar;
mod pool;
mod post;
mod schedule;
mod selection;

pub use block::Block;
pub use calendar::{CalendarLayout, DayAssignment, ParseWeekdayError, Weekday};
pub use pool::AuthorPool;
pub use post::{Post, PostCategory};
pub use schedule::Schedule;
pub use selection::{BlockSelection, Selection, SpecialTally};
