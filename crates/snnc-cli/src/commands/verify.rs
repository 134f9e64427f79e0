//! Graph file verification

use std::path::PathBuf;

use clap::Args;

use crate::error::CliResult;

/// Parse a graph in canonical text form and verify it at its stored timestep
#[derive(Args, Debug)]
pub struct VerifyCommand {
    /// Graph file as printed by `snnc inspect`
    pub input: PathBuf,
}

impl VerifyCommand {
    pub async fn execute(self) -> CliResult<()> {
        let text = std::fs::read_to_string(&self.input)?;
        let graph = snnc_ir::parse_text(&text)?;
        snnc_compiler::verify_graph(&graph, graph.timestep)?;
        println!(
            "Verification OK: {} ({} neurons, {} synapses, t={})",
            self.input.display(),
            graph.neuron_count(),
            graph.synapse_count(),
            graph.timestep
        );
        Ok(())
    }
}
