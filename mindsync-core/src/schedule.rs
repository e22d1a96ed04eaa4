//! Strategy-driven reordering and sequential time-blocking of tasks.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::strategy::Strategy;
use crate::task::Task;
use crate::time::wall_clock;

/// One time block on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    #[serde(with = "wall_clock")]
    pub start: NaiveDateTime,
    #[serde(with = "wall_clock")]
    pub end: NaiveDateTime,
}

impl Event {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Stable reorder per strategy. Equal durations keep their input order.
pub fn reorder(tasks: &[Task], strategy: Strategy) -> Vec<Task> {
    let mut ordered = tasks.to_vec();
    match strategy {
        Strategy::LongFirst => ordered.sort_by(|a, b| b.duration_minutes.cmp(&a.duration_minutes)),
        Strategy::ShortFirst => ordered.sort_by_key(|t| t.duration_minutes),
        Strategy::Neutral => {}
    }
    ordered
}

/// Lay tasks out back to back from `start`, leaving `gap_minutes` between them.
///
/// The only failure is running off the end of the calendar, which takes
/// thousands of years of tasks or gap.
pub fn layout(
    tasks: &[Task],
    start: NaiveDateTime,
    gap_minutes: u32,
) -> Result<Vec<Event>, ScheduleError> {
    let gap = Duration::minutes(gap_minutes.into());
    let mut cursor = Some(start);
    let mut events = Vec::with_capacity(tasks.len());

    for t in tasks {
        let out_of_range = || ScheduleError::ScheduleOutOfRange(t.name.clone());
        let begin = cursor.ok_or_else(out_of_range)?;
        let end = begin
            .checked_add_signed(Duration::minutes(t.duration_minutes.into()))
            .ok_or_else(out_of_range)?;
        events.push(Event {
            title: t.name.clone(),
            start: begin,
            end,
        });
        // The last task may end right at the limit; only a following task needs the gap.
        cursor = end.checked_add_signed(gap);
    }

    Ok(events)
}

/// Reorder, then lay out.
pub fn schedule(
    tasks: &[Task],
    strategy: Strategy,
    start: NaiveDateTime,
    gap_minutes: u32,
) -> Result<Vec<Event>, ScheduleError> {
    layout(&reorder(tasks, strategy), start, gap_minutes)
}
