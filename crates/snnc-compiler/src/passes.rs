//! Pass framework over attributed SNN graphs
//!
//! Passes own their input: a caller that still needs the original graph
//! clones it before handing it over.

use snnc_ir::SnnGraph;

use crate::{Result, STAGE_BUILT};

/// A graph-to-graph transform applied after compilation
pub trait Pass {
    /// Human-readable pass name
    fn name(&self) -> &'static str;
    /// Consume a graph and return the transformed one
    fn apply(&self, graph: SnnGraph) -> Result<SnnGraph>;
}

/// Runs passes in sequence
#[derive(Default)]
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create an empty pass manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pass to the pipeline
    pub fn add(&mut self, pass: Box<dyn Pass>) {
        self.passes.push(pass);
    }

    /// Names of the registered passes, in order
    pub fn names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Run all passes in order; the graph carries stage 1 afterwards.
    /// The first failing pass aborts the run.
    pub fn run(&self, mut graph: SnnGraph) -> Result<SnnGraph> {
        for p in &self.passes {
            log::debug!("running pass '{}'", p.name());
            graph = p.apply(graph)?;
        }
        graph.mark_stage_completed(STAGE_BUILT)?;
        Ok(graph)
    }
}
