use crate::domain::interval::Interval;
use crate::domain::models::{DayWindows, Settings, Weekday};
use crate::domain::problems::PlanProblem;
use crate::domain::time::parse_time;
use tracing::warn;

/// The resolved work window for each day of a Monday-first week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindows([Interval; 7]);

impl WeekWindows {
    pub fn uniform(window: Interval) -> Self {
        Self([window; 7])
    }

    pub fn get(&self, weekday: Weekday) -> Interval {
        self.0[weekday.index()]
    }
}

fn parse_window(start: &str, end: &str) -> Option<Interval> {
    Interval::new(parse_time(start)?, parse_time(end)?)
}

pub fn resolve_global_window(settings: &Settings) -> Result<Interval, PlanProblem> {
    parse_window(&settings.work_start, &settings.work_end).ok_or(PlanProblem::InvalidGlobalWindow)
}

/// Picks the day's override when enabled and valid. An active but invalid
/// override falls back to `global` and is reported alongside the window.
pub fn resolve_work_window(
    weekday: Weekday,
    global: Interval,
    day_windows: &DayWindows,
) -> (Interval, Option<PlanProblem>) {
    if !day_windows.enabled {
        return (global, None);
    }
    let Some(day) = day_windows.overrides.get(&weekday).filter(|day| day.active) else {
        return (global, None);
    };
    match parse_window(&day.start, &day.end) {
        Some(window) => (window, None),
        None => {
            warn!(
                weekday = weekday.label(),
                start = %day.start,
                end = %day.end,
                "invalid day window override, using global window"
            );
            (
                global,
                Some(PlanProblem::InvalidDayWindowOverride { weekday }),
            )
        }
    }
}

pub fn resolve_week_windows(
    global: Interval,
    day_windows: &DayWindows,
) -> (WeekWindows, Vec<PlanProblem>) {
    let mut windows = WeekWindows::uniform(global);
    let mut problems = Vec::new();
    for weekday in Weekday::ALL {
        let (window, problem) = resolve_work_window(weekday, global, day_windows);
        windows.0[weekday.index()] = window;
        problems.extend(problem);
    }
    (windows, problems)
}
