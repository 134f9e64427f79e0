//! Graph inspection

use std::path::PathBuf;

use clap::Args;
use snnc_compiler::{build_graphs, run_experiment, GraphVariant};
use tracing::info;

use crate::config::load_run_config;
use crate::error::{CliError, CliResult};

/// Print one graph variant of a run in canonical text form
#[derive(Args, Debug)]
pub struct InspectCommand {
    /// Run configuration (TOML, or JSON by extension)
    pub config: PathBuf,

    /// Graph name, e.g. snn_algo_graph or rad_adapted_snn_graph
    #[arg(short, long, default_value = "snn_algo_graph")]
    pub graph: String,

    /// 1 = as built, 2 = after simulation and comparison
    #[arg(short, long, default_value_t = 1)]
    pub stage: u8,
}

impl InspectCommand {
    pub async fn execute(self) -> CliResult<()> {
        let variant: GraphVariant = self.graph.parse()?;
        let config = load_run_config(&self.config)?;

        let mut graphs = match self.stage {
            1 => build_graphs(&config)?.graphs,
            2 => run_experiment(&config)?.graphs,
            other => return Err(CliError::invalid_args(format!("--stage must be 1 or 2, got {}", other))),
        };
        let graph = graphs
            .remove(&variant)
            .ok_or_else(|| CliError::config(format!("{} is not produced by this configuration", variant)))?;

        info!(
            "{} after stage {}: {} neurons, {} synapses",
            variant,
            self.stage,
            graph.neuron_count(),
            graph.synapse_count()
        );
        print!("{}", graph.to_text());
        Ok(())
    }
}
