//! CLI command implementations for snnc

use clap::{Parser, Subcommand};

use crate::error::CliResult;

pub mod algorithms;
pub mod inspect;
pub mod run;
pub mod verify;

/// snnc - compile graph algorithms into spiking networks and check them
#[derive(Parser, Debug)]
#[command(
    name = "snnc",
    version,
    about = "Compile MDSA into a spiking network, simulate it and compare with the reference",
    long_about = "snnc builds the MDSA spiking network for a catalogue input graph, optionally \
                  adds redundant counter neurons and injects neuron death, simulates every \
                  variant and checks the counter readout against the reference algorithm."
)]
pub struct SnncCli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every stage for a run configuration and print the result payload
    Run(run::RunCommand),

    /// Print one graph variant in canonical text form
    Inspect(inspect::InspectCommand),

    /// Check a graph file in canonical text form
    Verify(verify::VerifyCommand),

    /// List compilable algorithms and their parameters
    #[command(alias = "algs")]
    Algorithms(algorithms::AlgorithmsCommand),
}

impl SnncCli {
    /// Execute the CLI command
    pub async fn execute(self) -> CliResult<()> {
        match self.command {
            Commands::Run(cmd) => cmd.execute().await,
            Commands::Inspect(cmd) => cmd.execute().await,
            Commands::Verify(cmd) => cmd.execute().await,
            Commands::Algorithms(cmd) => cmd.execute().await,
        }
    }
}
