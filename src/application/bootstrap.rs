use crate::infrastructure::config::{PLANNER_JSON, ensure_default_configs, load_planner_state};
use crate::infrastructure::error::InfraError;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct BootstrapResult {
    pub workspace_root: PathBuf,
    pub config_dir: PathBuf,
    pub planner_path: PathBuf,
}

/// Creates `config/` under the workspace and a default planner file if needed.
pub fn bootstrap_workspace(workspace_root: &Path) -> Result<BootstrapResult, InfraError> {
    let config_dir = workspace_root.join("config");
    fs::create_dir_all(&config_dir)?;

    ensure_default_configs(&config_dir)?;
    let _ = load_planner_state(&config_dir)?;

    Ok(BootstrapResult {
        workspace_root: workspace_root.to_path_buf(),
        planner_path: config_dir.join(PLANNER_JSON),
        config_dir,
    })
}
