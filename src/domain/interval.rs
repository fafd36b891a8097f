use crate::domain::time::TimeOfDay;
use serde::{Deserialize, Serialize};

/// Half-open time range within one day. `start < end` always holds for values
/// built through [`Interval::new`] or [`Interval::clamp_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl Interval {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn duration_minutes(&self) -> u32 {
        self.start.minutes_until(self.end)
    }

    /// Cuts the interval down to `window`; `None` when nothing is left.
    pub fn clamp_to(&self, window: &Interval) -> Option<Interval> {
        Interval::new(self.start.max(window.start), self.end.min(window.end))
    }
}

/// Sorts by start and coalesces overlapping or touching intervals.
pub fn merge_intervals(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort_by_key(|interval| interval.start);
    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                if interval.end > last.end {
                    last.end = interval.end;
                }
                continue;
            }
        }
        merged.push(interval);
    }
    merged
}

/// Complement of `merged_busy` inside `window`. Busy intervals must be sorted,
/// merged and already clamped to the window.
pub fn free_intervals(window: &Interval, merged_busy: &[Interval]) -> Vec<Interval> {
    let mut free = Vec::new();
    let mut cursor = window.start;
    for busy in merged_busy {
        if busy.start > cursor {
            free.push(Interval {
                start: cursor,
                end: busy.start,
            });
        }
        cursor = cursor.max(busy.end);
    }
    if cursor < window.end {
        free.push(Interval {
            start: cursor,
            end: window.end,
        });
    }
    free
}
