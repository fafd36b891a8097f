pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::commands::{
    AppState, TaskFitResponse, compute_free_time_impl, fit_task_impl, load_planner_impl,
    reset_planner_impl, save_planner_impl, update_day_windows_impl, update_row_impl,
    update_settings_impl,
};
pub use application::scheduler::{
    DaySchedule, ScheduleOutcome, WeeklyResult, WeeklyTotals, compute_week,
};
pub use application::task_fitter::{FitOutcome, fit_slots, fit_task};
pub use domain::interval::{Interval, free_intervals, merge_intervals};
pub use domain::models::{
    AppointmentRow, DayWindowOverride, DayWindows, FreeSlot, PlannerState, RowCollection,
    Settings, SlotKey, SortMode, Weekday,
};
pub use domain::problems::{PlanProblem, RowError, RowField};
pub use domain::time::{TimeOfDay, format_duration, format_time, parse_time};
pub use domain::validation::{BusyContribution, RowBatch, validate_row, validate_rows};
pub use domain::week::{Week, WeekDay, resolve_week};
pub use domain::work_window::{WeekWindows, resolve_work_window};
pub use infrastructure::error::InfraError;
