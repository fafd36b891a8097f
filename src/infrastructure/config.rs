use crate::domain::models::PlannerState;
use crate::infrastructure::error::InfraError;
use serde::Serialize;
use std::fs;
use std::path::Path;

pub const PLANNER_JSON: &str = "planner.json";
const SCHEMA_VERSION: u64 = 1;

#[derive(Debug, Serialize)]
struct PlannerFile<'a> {
    schema: u64,
    #[serde(flatten)]
    state: &'a PlannerState,
}

/// Writes the default planner state unless a planner file already exists.
pub fn ensure_default_configs(config_dir: &Path) -> Result<(), InfraError> {
    let path = config_dir.join(PLANNER_JSON);
    if !path.exists() {
        write_planner(&path, &PlannerState::default())?;
    }
    Ok(())
}

fn read_config(path: &Path) -> Result<serde_json::Value, InfraError> {
    let raw = fs::read_to_string(path)?;
    let parsed: serde_json::Value = serde_json::from_str(&raw)?;
    let schema = parsed
        .get("schema")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| InfraError::InvalidConfig(format!("missing schema in {}", path.display())))?;
    if schema != SCHEMA_VERSION {
        return Err(InfraError::InvalidConfig(format!(
            "unsupported schema {} in {}",
            schema,
            path.display()
        )));
    }
    Ok(parsed)
}

/// Loads the planner state. Missing settings fall back to defaults field by
/// field and both row collections are brought to their fixed lengths.
pub fn load_planner_state(config_dir: &Path) -> Result<PlannerState, InfraError> {
    let parsed = read_config(&config_dir.join(PLANNER_JSON))?;
    let mut state: PlannerState = serde_json::from_value(parsed)?;
    state.normalize_rows();
    Ok(state)
}

pub fn save_planner_state(config_dir: &Path, state: &PlannerState) -> Result<(), InfraError> {
    let mut normalized = state.clone();
    normalized.normalize_rows();
    write_planner(&config_dir.join(PLANNER_JSON), &normalized)
}

fn write_planner(path: &Path, state: &PlannerState) -> Result<(), InfraError> {
    let file = PlannerFile {
        schema: SCHEMA_VERSION,
        state,
    };
    let formatted = serde_json::to_string_pretty(&file)?;
    fs::write(path, format!("{formatted}\n"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{
        AppointmentRow, RECURRING_ROW_COUNT, SortMode, VARIABLE_ROW_COUNT, Weekday,
    };
    use tempfile::TempDir;

    #[test]
    fn defaults_are_written_once() {
        let dir = TempDir::new().expect("temp dir");
        ensure_default_configs(dir.path()).expect("write defaults");
        let first = fs::read_to_string(dir.path().join(PLANNER_JSON)).expect("read planner");
        assert!(first.contains("\"schema\": 1"));

        let mut state = load_planner_state(dir.path()).expect("load planner");
        state.settings.work_start = "08:00".to_string();
        save_planner_state(dir.path(), &state).expect("save planner");
        ensure_default_configs(dir.path()).expect("keep existing");

        let reloaded = load_planner_state(dir.path()).expect("reload planner");
        assert_eq!(reloaded.settings.work_start, "08:00");
    }

    #[test]
    fn missing_fields_and_short_collections_are_normalized() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(
            dir.path().join(PLANNER_JSON),
            r#"{
                "schema": 1,
                "settings": { "weekDate": "2026-02-18", "sortMode": "length" },
                "recurring": [
                    { "active": true, "weekday": "friday", "start": "09:00", "end": "10:00" }
                ]
            }"#,
        )
        .expect("write planner");

        let state = load_planner_state(dir.path()).expect("load planner");
        assert_eq!(state.settings.week_date, "2026-02-18");
        assert_eq!(state.settings.sort_mode, SortMode::Length);
        assert_eq!(state.settings.work_end, "18:00");
        assert_eq!(state.recurring.len(), RECURRING_ROW_COUNT);
        assert_eq!(state.variable.len(), VARIABLE_ROW_COUNT);
        assert_eq!(
            state.recurring[0],
            AppointmentRow::new(Weekday::Friday, "09:00", "10:00")
        );
        assert!(state.recurring[1].is_blank());
    }

    #[test]
    fn unsupported_schema_is_rejected() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join(PLANNER_JSON), r#"{ "schema": 2 }"#).expect("write planner");
        match load_planner_state(dir.path()) {
            Err(InfraError::InvalidConfig(message)) => {
                assert!(message.contains("unsupported schema 2"));
            }
            other => panic!("expected invalid config error, got {other:?}"),
        }
    }

    #[test]
    fn missing_schema_and_malformed_json_are_errors() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join(PLANNER_JSON);
        fs::write(&path, r#"{ "settings": {} }"#).expect("write planner");
        assert!(matches!(
            load_planner_state(dir.path()),
            Err(InfraError::InvalidConfig(_))
        ));
        fs::write(&path, "{ not json").expect("write planner");
        assert!(matches!(load_planner_state(dir.path()), Err(InfraError::Json(_))));
    }
}
