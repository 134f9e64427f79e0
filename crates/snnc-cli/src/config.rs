//! Run configuration loading

use std::path::Path;

use snnc_compiler::RunConfig;

use crate::error::{CliError, CliResult};

/// Load a run configuration; `.json` files are read as JSON, everything else as TOML
pub fn load_run_config(path: &Path) -> CliResult<RunConfig> {
    if !path.exists() {
        return Err(CliError::config(format!("No run configuration at {}", path.display())));
    }
    let content = std::fs::read_to_string(path)?;
    let config: RunConfig = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content)?,
        _ => toml::from_str(&content)?,
    };
    config.validate()?;
    Ok(config)
}
