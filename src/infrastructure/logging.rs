use crate::infrastructure::error::InfraError;
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

static LOGGER_INIT: OnceLock<()> = OnceLock::new();

pub const DEFAULT_LOG_DIRECTIVES: &str = "info";

/// Installs a stderr fmt subscriber filtered by `RUST_LOG`, falling back to
/// `default_directives`. Later calls are no-ops.
pub fn init_logging(default_directives: &str) -> Result<(), InfraError> {
    if LOGGER_INIT.get().is_some() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives))
        .map_err(|error| InfraError::Logging(format!("invalid log directives: {error}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|error| InfraError::Logging(error.to_string()))?;

    let _ = LOGGER_INIT.set(());
    Ok(())
}
