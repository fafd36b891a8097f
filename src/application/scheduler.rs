use crate::domain::interval::{Interval, free_intervals, merge_intervals};
use crate::domain::models::{FreeSlot, PlannerState, RowCollection, SortMode, Weekday};
use crate::domain::problems::PlanProblem;
use crate::domain::validation::{BusyContribution, validate_rows};
use crate::domain::week::resolve_week;
use crate::domain::work_window::{resolve_global_window, resolve_week_windows};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub weekday: Weekday,
    pub label: &'static str,
    pub date: NaiveDate,
    pub window: Interval,
    pub busy: Vec<Interval>,
    pub free_slots: Vec<FreeSlot>,
}

impl DaySchedule {
    pub fn free_minutes(&self) -> u32 {
        self.free_slots.iter().map(FreeSlot::duration_minutes).sum()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTotals {
    pub slot_count: usize,
    pub free_minutes: u32,
    pub longest_slot_minutes: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyResult {
    pub week_start: NaiveDate,
    pub days: Vec<DaySchedule>,
    pub totals: WeeklyTotals,
}

impl WeeklyResult {
    /// All reported slots ordered by weekday, then start.
    pub fn slot_pool(&self) -> Vec<FreeSlot> {
        let mut pool = self
            .days
            .iter()
            .flat_map(|day| day.free_slots.iter().copied())
            .collect::<Vec<_>>();
        pool.sort_by_key(|slot| (slot.weekday, slot.start));
        pool
    }
}

/// Problems found while computing, plus the result when nothing blocked it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOutcome {
    pub problems: Vec<PlanProblem>,
    pub result: Option<WeeklyResult>,
}

impl ScheduleOutcome {
    pub fn computed(&self) -> bool {
        self.result.is_some()
    }
}

/// Recomputes the whole week from `state`. Global problems (work window,
/// minimum duration, week date) suppress the result; row and day-window
/// problems are reported next to it.
pub fn compute_week(state: &PlannerState) -> ScheduleOutcome {
    let settings = &state.settings;
    let mut problems = Vec::new();

    let global = resolve_global_window(settings)
        .map_err(|problem| problems.push(problem))
        .ok();
    let min_duration = settings.min_duration_minutes();
    if min_duration.is_none() {
        problems.push(PlanProblem::InvalidMinimumDuration);
    }
    let week = resolve_week(&settings.week_date)
        .map_err(|problem| problems.push(problem))
        .ok();

    let windows = global.map(|global| {
        let (windows, window_problems) = resolve_week_windows(global, &state.day_windows);
        problems.extend(window_problems);
        windows
    });

    let mut contributions = Vec::new();
    for collection in [RowCollection::Recurring, RowCollection::Variable] {
        let batch = validate_rows(collection, state.rows(collection), windows.as_ref());
        contributions.extend(batch.contributions);
        problems.extend(batch.problems);
    }

    let (Some(windows), Some(min_duration), Some(week)) = (windows, min_duration, week) else {
        warn!(
            problems = problems.len(),
            "global problems present, weekly computation skipped"
        );
        return ScheduleOutcome {
            problems,
            result: None,
        };
    };

    let threshold = min_duration.max(settings.display_min_minutes);
    let mut days = Vec::with_capacity(Weekday::ALL.len());
    let mut totals = WeeklyTotals::default();

    for weekday in Weekday::ALL {
        let window = windows.get(weekday);
        let date = week.date_of(weekday);
        let busy = merge_intervals(busy_for(&contributions, weekday));
        let mut free_slots = free_intervals(&window, &busy)
            .into_iter()
            .filter(|interval| interval.duration_minutes() >= threshold)
            .map(|interval| FreeSlot::new(weekday, date, interval))
            .collect::<Vec<_>>();
        if settings.sort_mode == SortMode::Length {
            free_slots.sort_by(|left, right| {
                right.duration_minutes().cmp(&left.duration_minutes())
            });
        }

        for slot in &free_slots {
            totals.slot_count += 1;
            totals.free_minutes += slot.duration_minutes();
            totals.longest_slot_minutes = totals.longest_slot_minutes.max(slot.duration_minutes());
        }
        debug!(
            weekday = weekday.label(),
            %date,
            busy = busy.len(),
            free = free_slots.len(),
            "scheduled day"
        );

        days.push(DaySchedule {
            weekday,
            label: weekday.label(),
            date,
            window,
            busy,
            free_slots,
        });
    }

    ScheduleOutcome {
        problems,
        result: Some(WeeklyResult {
            week_start: week.monday,
            days,
            totals,
        }),
    }
}

fn busy_for(contributions: &[BusyContribution], weekday: Weekday) -> Vec<Interval> {
    contributions
        .iter()
        .filter(|contribution| contribution.weekday == weekday)
        .map(|contribution| contribution.interval)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{AppointmentRow, DayWindowOverride, Settings};
    use crate::domain::problems::RowError;
    use crate::domain::time::{TimeOfDay, parse_time};
    use proptest::prelude::*;

    fn at(value: &str) -> TimeOfDay {
        parse_time(value).expect("valid time")
    }

    fn span(start: &str, end: &str) -> Interval {
        Interval::new(at(start), at(end)).expect("valid interval")
    }

    fn empty_state() -> PlannerState {
        let mut state = PlannerState {
            settings: Settings {
                week_date: "2026-02-18".to_string(),
                ..Settings::default()
            },
            recurring: Vec::new(),
            variable: Vec::new(),
            ..PlannerState::default()
        };
        state.normalize_rows();
        state
    }

    fn day<'a>(result: &'a WeeklyResult, weekday: Weekday) -> &'a DaySchedule {
        &result.days[weekday.index()]
    }

    fn ranges(day: &DaySchedule) -> Vec<(String, String)> {
        day.free_slots
            .iter()
            .map(|slot| (slot.start.to_string(), slot.end.to_string()))
            .collect()
    }

    #[test]
    fn default_state_produces_expected_monday_and_tuesday() {
        let mut state = PlannerState::default();
        state.settings.week_date = "2026-02-18".to_string();
        let outcome = compute_week(&state);
        assert!(outcome.problems.is_empty());
        let result = outcome.result.expect("computed");

        let monday = day(&result, Weekday::Monday);
        assert_eq!(monday.date.to_string(), "2026-02-16");
        assert_eq!(
            ranges(monday),
            vec![
                ("07:00".to_string(), "10:30".to_string()),
                ("12:30".to_string(), "18:00".to_string())
            ]
        );
        let tuesday = day(&result, Weekday::Tuesday);
        assert_eq!(tuesday.busy, vec![span("08:30", "10:30"), span("13:00", "15:00")]);
        assert_eq!(
            ranges(tuesday),
            vec![
                ("07:00".to_string(), "08:30".to_string()),
                ("10:30".to_string(), "13:00".to_string()),
                ("15:00".to_string(), "18:00".to_string())
            ]
        );

        // 5 untouched days of 11h, Monday 9h, Tuesday 7h.
        assert_eq!(result.totals.free_minutes, 5 * 660 + 540 + 420);
        assert_eq!(result.totals.slot_count, 5 + 2 + 3);
        assert_eq!(result.totals.longest_slot_minutes, 660);
    }

    #[test]
    fn recurring_and_variable_rows_are_merged_together() {
        let mut state = empty_state();
        state.recurring[0] = AppointmentRow::new(Weekday::Wednesday, "09:00", "10:00");
        state.variable[0] = AppointmentRow::new(Weekday::Wednesday, "10:00", "11:00");
        let result = compute_week(&state).result.expect("computed");
        assert_eq!(day(&result, Weekday::Wednesday).busy, vec![span("09:00", "11:00")]);
    }

    #[test]
    fn early_appointment_is_clamped_not_dropped() {
        let mut state = empty_state();
        state.recurring[0] = AppointmentRow::new(Weekday::Thursday, "06:00", "08:00");
        let result = compute_week(&state).result.expect("computed");
        let thursday = day(&result, Weekday::Thursday);
        assert_eq!(thursday.busy, vec![span("07:00", "08:00")]);
        assert_eq!(thursday.free_minutes(), 600);
    }

    #[test]
    fn short_slots_are_filtered_by_largest_threshold() {
        let mut state = empty_state();
        state.recurring[0] = AppointmentRow::new(Weekday::Monday, "07:20", "17:00");
        state.settings.min_duration_hours = 0.5;
        let result = compute_week(&state).result.expect("computed");
        assert_eq!(
            ranges(day(&result, Weekday::Monday)),
            vec![("17:00".to_string(), "18:00".to_string())]
        );

        state.settings.display_min_minutes = 90;
        let result = compute_week(&state).result.expect("computed");
        assert!(day(&result, Weekday::Monday).free_slots.is_empty());
    }

    #[test]
    fn length_sort_orders_by_duration_with_stable_ties() {
        let mut state = empty_state();
        state.settings.min_duration_hours = 0.25;
        state.settings.sort_mode = SortMode::Length;
        state.recurring[0] = AppointmentRow::new(Weekday::Friday, "08:00", "09:00");
        state.recurring[1] = AppointmentRow::new(Weekday::Friday, "10:00", "15:00");
        let result = compute_week(&state).result.expect("computed");
        assert_eq!(
            ranges(day(&result, Weekday::Friday)),
            vec![
                ("15:00".to_string(), "18:00".to_string()),
                ("07:00".to_string(), "08:00".to_string()),
                ("09:00".to_string(), "10:00".to_string())
            ]
        );
    }

    #[test]
    fn day_override_changes_window_and_clamping() {
        let mut state = empty_state();
        state.day_windows.enabled = true;
        state.day_windows.overrides.insert(
            Weekday::Saturday,
            DayWindowOverride {
                active: true,
                start: "05:00".to_string(),
                end: "09:00".to_string(),
            },
        );
        state.recurring[0] = AppointmentRow::new(Weekday::Saturday, "06:00", "08:00");
        let result = compute_week(&state).result.expect("computed");
        let saturday = day(&result, Weekday::Saturday);
        assert_eq!(saturday.window, span("05:00", "09:00"));
        assert_eq!(saturday.busy, vec![span("06:00", "08:00")]);
        assert_eq!(
            ranges(saturday),
            vec![
                ("05:00".to_string(), "06:00".to_string()),
                ("08:00".to_string(), "09:00".to_string())
            ]
        );
    }

    #[test]
    fn invalid_override_is_reported_without_blocking() {
        let mut state = empty_state();
        state.day_windows.enabled = true;
        state.day_windows.overrides.insert(
            Weekday::Sunday,
            DayWindowOverride {
                active: true,
                start: "12:00".to_string(),
                end: "11:00".to_string(),
            },
        );
        let outcome = compute_week(&state);
        assert_eq!(
            outcome.problems,
            vec![PlanProblem::InvalidDayWindowOverride {
                weekday: Weekday::Sunday
            }]
        );
        let result = outcome.result.expect("computed");
        assert_eq!(day(&result, Weekday::Sunday).window, span("07:00", "18:00"));
    }

    #[test]
    fn row_problems_are_reported_next_to_results() {
        let mut state = empty_state();
        state.recurring[1] = AppointmentRow::new(Weekday::Monday, "12:00", "11:00");
        state.variable[3] = AppointmentRow::new(Weekday::Monday, "12:00", "13:00");
        let outcome = compute_week(&state);
        assert_eq!(
            outcome.problems,
            vec![PlanProblem::Row {
                collection: RowCollection::Recurring,
                index: 1,
                error: RowError::InvertedInterval
            }]
        );
        let result = outcome.result.expect("computed");
        assert_eq!(day(&result, Weekday::Monday).busy, vec![span("12:00", "13:00")]);
    }

    #[test]
    fn invalid_anchor_date_blocks_computation() {
        let mut state = empty_state();
        state.settings.week_date = "not-a-date".to_string();
        let outcome = compute_week(&state);
        assert!(!outcome.computed());
        assert_eq!(
            outcome.problems,
            vec![PlanProblem::InvalidAnchorDate {
                value: "not-a-date".to_string()
            }]
        );
    }

    #[test]
    fn global_problems_block_and_rows_still_reported() {
        let mut state = empty_state();
        state.settings.work_start = "18:00".to_string();
        state.settings.work_end = "07:00".to_string();
        state.settings.min_duration_hours = 0.0;
        state.recurring[0] = AppointmentRow::new(Weekday::Monday, "bad", "10:00");
        let outcome = compute_week(&state);
        assert!(outcome.result.is_none());
        assert_eq!(outcome.problems[0], PlanProblem::InvalidGlobalWindow);
        assert_eq!(outcome.problems[1], PlanProblem::InvalidMinimumDuration);
        assert!(matches!(
            outcome.problems[2],
            PlanProblem::Row {
                error: RowError::BadTimeFormat { .. },
                ..
            }
        ));
    }

    #[test]
    fn slot_pool_is_weekday_then_start_ordered() {
        let mut state = empty_state();
        state.settings.sort_mode = SortMode::Length;
        state.recurring[0] = AppointmentRow::new(Weekday::Monday, "08:00", "10:00");
        let result = compute_week(&state).result.expect("computed");
        let pool = result.slot_pool();
        assert_eq!(pool.len(), 8);
        for pair in pool.windows(2) {
            assert!((pair[0].weekday, pair[0].start) < (pair[1].weekday, pair[1].start));
        }
    }

    fn row_strategy() -> impl Strategy<Value = AppointmentRow> {
        (0usize..7, 0u16..24, 0u16..4, 1u16..6).prop_map(|(day, hour, quarter, length)| {
            let start = hour * 60 + quarter * 15;
            let end = (start + length * 30).min(23 * 60 + 59);
            let format = |minutes: u16| {
                TimeOfDay::from_minutes(minutes)
                    .expect("in range")
                    .to_string()
            };
            AppointmentRow::new(Weekday::ALL[day], &format(start), &format(end))
        })
    }

    proptest! {
        #[test]
        fn sort_mode_only_changes_order(rows in proptest::collection::vec(row_strategy(), 0..5)) {
            let mut state = empty_state();
            state.settings.min_duration_hours = 0.25;
            for (index, row) in rows.into_iter().enumerate() {
                state.recurring[index] = row;
            }
            let chronological = compute_week(&state).result.expect("computed");
            state.settings.sort_mode = SortMode::Length;
            let by_length = compute_week(&state).result.expect("computed");

            prop_assert_eq!(chronological.totals, by_length.totals);
            for (left, right) in chronological.days.iter().zip(&by_length.days) {
                for pair in right.free_slots.windows(2) {
                    prop_assert!(pair[0].duration_minutes() >= pair[1].duration_minutes());
                }
                let mut resorted = right.free_slots.clone();
                resorted.sort_by_key(|slot| slot.start);
                prop_assert_eq!(&left.free_slots, &resorted);
            }
        }
    }
}
