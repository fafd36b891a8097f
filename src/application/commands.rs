use crate::application::bootstrap::bootstrap_workspace;
use crate::application::scheduler::{ScheduleOutcome, compute_week};
use crate::application::task_fitter::{FitOutcome, fit_task};
use crate::domain::models::{
    AppointmentRow, DayWindows, PlannerState, RowCollection, Settings, SlotKey,
};
use crate::domain::problems::PlanProblem;
use crate::infrastructure::config::{load_planner_state, save_planner_state};
use crate::infrastructure::error::InfraError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Workspace handle shared by every command.
pub struct AppState {
    workspace_root: PathBuf,
    config_dir: PathBuf,
}

impl AppState {
    pub fn new(workspace_root: PathBuf) -> Result<Self, InfraError> {
        let bootstrap = bootstrap_workspace(&workspace_root)?;
        Ok(Self {
            workspace_root: bootstrap.workspace_root,
            config_dir: bootstrap.config_dir,
        })
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskFitResponse {
    pub required_minutes: u32,
    /// `None` when the week could not be computed or the duration was invalid.
    pub outcome: Option<FitOutcome>,
    /// Slots the renderer marks; empty unless the task fits.
    pub highlighted: Vec<SlotKey>,
    pub problems: Vec<PlanProblem>,
}

pub fn load_planner_impl(state: &AppState) -> Result<PlannerState, InfraError> {
    load_planner_state(state.config_dir())
}

pub fn save_planner_impl(state: &AppState, planner: PlannerState) -> Result<PlannerState, InfraError> {
    save_planner_state(state.config_dir(), &planner)?;
    load_planner_impl(state)
}

pub fn update_settings_impl(state: &AppState, settings: Settings) -> Result<PlannerState, InfraError> {
    let mut planner = load_planner_impl(state)?;
    planner.settings = settings;
    save_planner_impl(state, planner)
}

pub fn update_day_windows_impl(
    state: &AppState,
    day_windows: DayWindows,
) -> Result<PlannerState, InfraError> {
    let mut planner = load_planner_impl(state)?;
    planner.day_windows = day_windows;
    save_planner_impl(state, planner)
}

pub fn update_row_impl(
    state: &AppState,
    collection: RowCollection,
    index: usize,
    row: AppointmentRow,
) -> Result<PlannerState, InfraError> {
    let mut planner = load_planner_impl(state)?;
    let rows = planner.rows_mut(collection);
    let len = rows.len();
    let Some(slot) = rows.get_mut(index) else {
        return Err(InfraError::RowIndexOutOfRange {
            collection,
            index,
            len,
        });
    };
    *slot = row;
    save_planner_impl(state, planner)
}

/// Restores the default planner state and persists it.
pub fn reset_planner_impl(state: &AppState) -> Result<PlannerState, InfraError> {
    info!(command = "reset_planner", "restoring default planner state");
    save_planner_impl(state, PlannerState::default())
}

pub fn compute_free_time_impl(state: &AppState) -> Result<ScheduleOutcome, InfraError> {
    let planner = load_planner_impl(state)?;
    let outcome = compute_week(&planner);
    match &outcome.result {
        Some(result) => info!(
            command = "compute_free_time",
            week_start = %result.week_start,
            slots = result.totals.slot_count,
            free_minutes = result.totals.free_minutes,
            problems = outcome.problems.len(),
            "computed weekly free time"
        ),
        None => warn!(
            command = "compute_free_time",
            problems = outcome.problems.len(),
            "no computation because of global problems"
        ),
    }
    Ok(outcome)
}

/// Fits a task of `task_minutes` (or the configured task duration) into the
/// current week's free slots.
pub fn fit_task_impl(
    state: &AppState,
    task_minutes: Option<u32>,
) -> Result<TaskFitResponse, InfraError> {
    let planner = load_planner_impl(state)?;
    let required_minutes = task_minutes.unwrap_or(planner.settings.task_duration_minutes);
    let ScheduleOutcome {
        mut problems,
        result,
    } = compute_week(&planner);

    let outcome = match result.as_ref().map(|result| fit_task(result, required_minutes)) {
        Some(Ok(outcome)) => Some(outcome),
        Some(Err(problem)) => {
            problems.push(problem);
            None
        }
        None => None,
    };

    let highlighted = outcome
        .as_ref()
        .map(FitOutcome::highlighted)
        .unwrap_or_default();
    info!(
        command = "fit_task",
        required_minutes,
        fitted = !highlighted.is_empty(),
        "task fit computed"
    );
    Ok(TaskFitResponse {
        required_minutes,
        outcome,
        highlighted,
        problems,
    })
}
