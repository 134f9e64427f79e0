//! Algorithm registry listing

use clap::Args;
use snnc_compiler::list_algorithms;

use crate::error::CliResult;

/// List compilable algorithms
#[derive(Args, Debug)]
pub struct AlgorithmsCommand {
    /// Show parameter docs
    #[arg(short, long)]
    pub detailed: bool,
}

impl AlgorithmsCommand {
    pub async fn execute(self) -> CliResult<()> {
        println!("Registered algorithms:");
        for alg in list_algorithms() {
            if self.detailed {
                println!("- {} // {}", alg.name, alg.doc);
                for p in alg.params {
                    let required = if p.required { "" } else { "?" };
                    println!("    {}{}: {} // {}", p.name, required, p.kind.name(), p.doc);
                }
            } else {
                let params: Vec<String> = alg
                    .params
                    .iter()
                    .map(|p| format!("{}{}: {}", p.name, if p.required { "" } else { "?" }, p.kind.name()))
                    .collect();
                println!("- {} {{ {} }}", alg.name, params.join(", "));
            }
        }
        Ok(())
    }
}
