//! Full experiment run

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::config::load_run_config;
use crate::error::CliResult;

/// Run compile, simulate and compare for one configuration
#[derive(Args, Debug)]
pub struct RunCommand {
    /// Run configuration (TOML, or JSON by extension)
    pub config: PathBuf,

    /// Also write the result payload to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Exit with an error when any variant fails the comparison
    #[arg(long)]
    pub strict: bool,
}

impl RunCommand {
    pub async fn execute(self) -> CliResult<()> {
        let config = load_run_config(&self.config)?;
        info!("Running {}", self.config.display());

        let outcome = snnc_compiler::run_experiment(&config)?;
        let json = serde_json::to_string_pretty(&outcome.results)?;
        println!("{}", json);

        if let Some(path) = &self.output {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &json)?;
            info!("Wrote results to {}", path.display());
        }

        let failed: Vec<&str> = outcome
            .results
            .iter()
            .filter(|(_, r)| !r.passed)
            .map(|(v, _)| v.result_key())
            .collect();
        if failed.is_empty() {
            info!("All {} variants match the reference", outcome.results.len());
        } else if self.strict {
            return Err(crate::error::CliError::invalid_args(format!(
                "--strict: variants differ from the reference: {}",
                failed.join(", ")
            )));
        } else {
            info!("Variants differing from the reference: {}", failed.join(", "));
        }
        Ok(())
    }
}
